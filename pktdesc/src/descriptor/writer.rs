use core::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::span::Bitmask;
use super::layout::{self, BitField, HEADER_LEN, MAX_RECORDS};
use super::{descriptor_len, Endian, Header, L2Type, TxFlags};

/// Write a descriptor by packing each header word at once.
///
/// Returns the number of octets written, the header plus one word per record. Fails with
/// `Error::Overflow` for more than [`MAX_RECORDS`] records and with `Error::Exhausted` when `out`
/// is too short, leaving `out` untouched in both cases.
///
/// [`MAX_RECORDS`]: constant.MAX_RECORDS.html
pub fn write_fast(header: &Header, records: &[u32], out: &mut [u8], endian: Endian)
    -> Result<usize>
{
    match endian {
        Endian::Big => write_fast_in::<BigEndian>(header, records, out),
        Endian::Little => write_fast_in::<LittleEndian>(header, records, out),
    }
}

/// Write a descriptor through the field setters of a [`FieldWriter`].
///
/// Produces the same bytes and errors as [`write_fast`].
///
/// [`FieldWriter`]: struct.FieldWriter.html
/// [`write_fast`]: fn.write_fast.html
pub fn write_layout(header: &Header, records: &[u32], out: &mut [u8], endian: Endian)
    -> Result<usize>
{
    match endian {
        Endian::Big => write_layout_in::<BigEndian>(header, records, out),
        Endian::Little => write_layout_in::<LittleEndian>(header, records, out),
    }
}

fn checked_len(records: &[u32], out: &[u8]) -> Result<usize> {
    if records.len() > MAX_RECORDS {
        return Err(Error::Overflow);
    }
    let len = descriptor_len(records.len());
    if out.len() < len {
        return Err(Error::Exhausted);
    }
    Ok(len)
}

fn write_fast_in<E: ByteOrder>(header: &Header, records: &[u32], out: &mut [u8])
    -> Result<usize>
{
    let len = checked_len(records, out)?;
    let flags = header.tx_flags;

    let word2 = layout::CAPLEN.pack(header.capture_len.into())
        | layout::RX_PORT.pack(header.rx_port.into())
        | layout::TX_PORT.pack(header.tx_port.into());
    let word3 = layout::WIRELEN.pack(header.wire_len.into())
        | layout::TX_NOW.pack(flags.now.into())
        | layout::TX_IGNORE.pack(flags.ignore.into())
        | layout::TX_CRC_OVERRIDE.pack(flags.crc_override.into())
        | layout::TX_SET_CLOCK.pack(flags.set_clock.into())
        | layout::L2_TYPE.pack(u8::from(header.l2_type).into())
        | layout::RECORD_COUNT.pack(records.len() as u32);
    let word4 = layout::HASH24.pack(header.hash)
        | layout::HASH_TYPE.pack(header.hash_type.into())
        | layout::L3_IS_FRAG.pack(header.is_fragment.into())
        | layout::L3_LAST_FRAG.pack(header.is_last_fragment.into());

    E::write_u64(&mut out[layout::TIMESTAMP..layout::WORD2], header.timestamp);
    E::write_u32(&mut out[layout::WORD2..layout::WORD3], word2);
    E::write_u32(&mut out[layout::WORD3..layout::WORD4], word3);
    E::write_u32(&mut out[layout::WORD4..layout::WORD5], word4);
    E::write_u32(&mut out[layout::WORD5..HEADER_LEN], header.bitmask.bits());
    E::write_u32_into(records, &mut out[HEADER_LEN..len]);
    Ok(len)
}

fn write_layout_in<E: ByteOrder>(header: &Header, records: &[u32], out: &mut [u8])
    -> Result<usize>
{
    checked_len(records, out)?;
    let mut writer = FieldWriter::<E>::new(out)?;
    writer.set_timestamp(header.timestamp);
    writer.set_capture_len(header.capture_len);
    writer.set_rx_port(header.rx_port);
    writer.set_tx_port(header.tx_port);
    writer.set_wire_len(header.wire_len);
    writer.set_tx_flags(header.tx_flags);
    writer.set_l2_type(header.l2_type);
    writer.set_hash_type(header.hash_type);
    writer.set_fragment(header.is_fragment, header.is_last_fragment);
    writer.set_hash(header.hash);
    writer.set_bitmask(header.bitmask);
    writer.set_records(records)
}

/// Named setters for the fields of a descriptor header.
///
/// Each setter only changes the bits of its own field. The header is cleared on construction so a
/// writer can be filled in any order.
#[derive(Debug)]
pub struct FieldWriter<'d, E: ByteOrder> {
    buffer: &'d mut [u8],
    order: PhantomData<E>,
}

impl<'d, E: ByteOrder> FieldWriter<'d, E> {
    /// Start writing a descriptor at the front of `buffer`.
    ///
    /// Fails with `Error::Exhausted` if the buffer can not hold the fixed header.
    pub fn new(buffer: &'d mut [u8]) -> Result<Self> {
        let header = buffer.get_mut(..HEADER_LEN).ok_or(Error::Exhausted)?;
        for byte in header.iter_mut() {
            *byte = 0;
        }
        Ok(FieldWriter { buffer, order: PhantomData })
    }

    fn set_field(&mut self, field: BitField, value: u32) {
        let bytes = &mut self.buffer[field.word..field.word + 4];
        let word = E::read_u32(bytes);
        E::write_u32(bytes, field.replace(word, value));
    }

    /// Set the timestamp.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        E::write_u64(&mut self.buffer[layout::TIMESTAMP..layout::WORD2], timestamp);
    }

    /// Set the capture length.
    pub fn set_capture_len(&mut self, len: u16) {
        self.set_field(layout::CAPLEN, len.into())
    }

    /// Set the receive port, 6 bits.
    pub fn set_rx_port(&mut self, port: u8) {
        self.set_field(layout::RX_PORT, port.into())
    }

    /// Set the transmit port, 6 bits.
    pub fn set_tx_port(&mut self, port: u8) {
        self.set_field(layout::TX_PORT, port.into())
    }

    /// Set the wire length.
    pub fn set_wire_len(&mut self, len: u16) {
        self.set_field(layout::WIRELEN, len.into())
    }

    /// Set all four transmit control flags.
    pub fn set_tx_flags(&mut self, flags: TxFlags) {
        self.set_field(layout::TX_NOW, flags.now.into());
        self.set_field(layout::TX_IGNORE, flags.ignore.into());
        self.set_field(layout::TX_CRC_OVERRIDE, flags.crc_override.into());
        self.set_field(layout::TX_SET_CLOCK, flags.set_clock.into());
    }

    /// Set the link layer framing.
    pub fn set_l2_type(&mut self, l2_type: L2Type) {
        self.set_field(layout::L2_TYPE, u8::from(l2_type).into())
    }

    /// Set the hash type, 4 bits.
    pub fn set_hash_type(&mut self, hash_type: u8) {
        self.set_field(layout::HASH_TYPE, hash_type.into())
    }

    /// Set the number of span words.
    ///
    /// This does not write any span, see [`set_records`].
    ///
    /// [`set_records`]: #method.set_records
    pub fn set_record_count(&mut self, count: u8) {
        self.set_field(layout::RECORD_COUNT, count.into())
    }

    /// Set the fragmentation flags.
    pub fn set_fragment(&mut self, is_fragment: bool, is_last_fragment: bool) {
        self.set_field(layout::L3_IS_FRAG, is_fragment.into());
        self.set_field(layout::L3_LAST_FRAG, is_last_fragment.into());
    }

    /// Set the flow hash, 24 bits.
    pub fn set_hash(&mut self, hash: u32) {
        self.set_field(layout::HASH24, hash)
    }

    /// Set the protocol bitmask.
    pub fn set_bitmask(&mut self, bitmask: Bitmask) {
        self.set_field(layout::BITMASK, bitmask.bits())
    }

    /// Write the span words after the header and set their count.
    ///
    /// Returns the total descriptor length.
    pub fn set_records(&mut self, records: &[u32]) -> Result<usize> {
        let len = checked_len(records, self.buffer)?;
        E::write_u32_into(records, &mut self.buffer[HEADER_LEN..len]);
        self.set_record_count(records.len() as u8);
        Ok(len)
    }
}
