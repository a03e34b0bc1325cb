//! The binary descriptor of a dissected packet.
//!
//! A descriptor is a fixed 24 octet header of scalars and the protocol bitmask, followed by one
//! packed word per recorded [`Span`]. The positions of all fields are kept in the [`layout`]
//! table. Every word is stored in the byte order chosen by the consumer of the descriptor, which
//! is unrelated to the network byte order of the packet itself.
//!
//! There are two writers that produce identical bytes: [`write_fast`] packs whole words in
//! registers and stores each once, [`write_layout`] goes through the named field setters of a
//! [`FieldWriter`]. A written descriptor can be read back with [`Descriptor`].
//!
//! [`Span`]: ../span/struct.Span.html
//! [`layout`]: layout/index.html
//! [`write_fast`]: fn.write_fast.html
//! [`write_layout`]: fn.write_layout.html
//! [`FieldWriter`]: struct.FieldWriter.html
//! [`Descriptor`]: struct.Descriptor.html
use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::span::{Bitmask, Span, SPAN_WORD_SIZE};

pub mod layout;
mod writer;

pub use self::layout::{HEADER_LEN, MAX_DESCRIPTOR_LEN, MAX_RECORDS};
pub use self::writer::{write_fast, write_layout, FieldWriter};

use self::layout::BitField;

/// The byte order of the words of a descriptor.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum Endian {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

impl Endian {
    /// The byte order of the compilation target.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }
}

enum_with_unknown! {
    /// The kind of link layer framing the packet was found in.
    pub doc enum L2Type(u8) {
        /// Ethernet II with an ethertype.
        Ethernet  = 0,
        /// 802.3 with an 802.2 LLC header.
        Llc       = 1,
        /// 802.3 with LLC and SNAP headers.
        Snap      = 2,
        /// 802.3 carrying IPX directly.
        NovellRaw = 3,
        /// No link layer, the capture starts with the IP header.
        RawIp     = 4,
    }
}

impl Default for L2Type {
    fn default() -> Self {
        L2Type::Ethernet
    }
}

/// Transmit control flags for a packet handed back to a sending interface.
#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub struct TxFlags {
    /// Send immediately, ignoring the timestamp.
    pub now: bool,
    /// Do not send the packet.
    pub ignore: bool,
    /// Keep the frame check sequence of the packet instead of computing it.
    pub crc_override: bool,
    /// Set the interface clock to the timestamp.
    pub set_clock: bool,
}

/// The scalar content of a descriptor header.
///
/// Fields are stored with the widths of the [`layout`] table, higher bits of the ports, the hash
/// and the hash type are dropped when written.
///
/// [`layout`]: layout/index.html
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Header {
    /// Capture timestamp, in a unit agreed with the consumer.
    pub timestamp: u64,
    /// Number of captured octets.
    pub capture_len: u16,
    /// Number of octets of the frame on the wire.
    pub wire_len: u16,
    /// Receiving interface port.
    pub rx_port: u8,
    /// Transmitting interface port.
    pub tx_port: u8,
    /// Transmit control.
    pub tx_flags: TxFlags,
    /// Link layer framing.
    pub l2_type: L2Type,
    /// Flow hash, 24 bits.
    pub hash: u32,
    /// The algorithm that computed the hash, 4 bits.
    pub hash_type: u8,
    /// The network layer packet is a fragment.
    pub is_fragment: bool,
    /// The fragment is the last one of its datagram.
    pub is_last_fragment: bool,
    /// Protocols found in the packet.
    pub bitmask: Bitmask,
}

/// The length of a descriptor with `records` span words.
pub fn descriptor_len(records: usize) -> usize {
    HEADER_LEN + records * SPAN_WORD_SIZE
}

/// A read-only view of a written descriptor.
#[derive(Debug, Clone, Copy)]
pub struct Descriptor<'d> {
    bytes: &'d [u8],
    endian: Endian,
}

impl<'d> Descriptor<'d> {
    /// Interpret `bytes` as a descriptor stored in `endian` order.
    ///
    /// Returns `Err(Error::Truncated)` if the buffer does not hold the header and all the span
    /// words announced by the record count. Trailing octets are ignored.
    pub fn new_checked(bytes: &'d [u8], endian: Endian) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::Truncated);
        }
        let descriptor = Descriptor { bytes, endian };
        let len = descriptor_len(descriptor.record_count());
        if bytes.len() < len {
            return Err(Error::Truncated);
        }
        Ok(Descriptor { bytes: &bytes[..len], endian })
    }

    fn word(&self, offset: usize) -> u32 {
        let bytes = &self.bytes[offset..offset + 4];
        match self.endian {
            Endian::Big => BigEndian::read_u32(bytes),
            Endian::Little => LittleEndian::read_u32(bytes),
        }
    }

    fn field(&self, field: BitField) -> u32 {
        field.unpack(self.word(field.word))
    }

    fn flag(&self, field: BitField) -> bool {
        self.field(field) != 0
    }

    /// The total length of the descriptor in octets.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// The byte order of the descriptor words.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Return the timestamp.
    pub fn timestamp(&self) -> u64 {
        let bytes = &self.bytes[layout::TIMESTAMP..layout::WORD2];
        match self.endian {
            Endian::Big => BigEndian::read_u64(bytes),
            Endian::Little => LittleEndian::read_u64(bytes),
        }
    }

    /// Return the captured length.
    pub fn capture_len(&self) -> u16 {
        self.field(layout::CAPLEN) as u16
    }

    /// Return the wire length.
    pub fn wire_len(&self) -> u16 {
        self.field(layout::WIRELEN) as u16
    }

    /// Return the receive port.
    pub fn rx_port(&self) -> u8 {
        self.field(layout::RX_PORT) as u8
    }

    /// Return the transmit port.
    pub fn tx_port(&self) -> u8 {
        self.field(layout::TX_PORT) as u8
    }

    /// Return the transmit control flags.
    pub fn tx_flags(&self) -> TxFlags {
        TxFlags {
            now: self.flag(layout::TX_NOW),
            ignore: self.flag(layout::TX_IGNORE),
            crc_override: self.flag(layout::TX_CRC_OVERRIDE),
            set_clock: self.flag(layout::TX_SET_CLOCK),
        }
    }

    /// Return the link layer framing.
    pub fn l2_type(&self) -> L2Type {
        L2Type::from(self.field(layout::L2_TYPE) as u8)
    }

    /// Return the flow hash.
    pub fn hash(&self) -> u32 {
        self.field(layout::HASH24)
    }

    /// Return the hash type.
    pub fn hash_type(&self) -> u8 {
        self.field(layout::HASH_TYPE) as u8
    }

    /// Query whether the packet is a fragment.
    pub fn is_fragment(&self) -> bool {
        self.flag(layout::L3_IS_FRAG)
    }

    /// Query whether the packet is the last fragment.
    pub fn is_last_fragment(&self) -> bool {
        self.flag(layout::L3_LAST_FRAG)
    }

    /// Return the protocol bitmask.
    pub fn bitmask(&self) -> Bitmask {
        Bitmask(self.field(layout::BITMASK))
    }

    /// Return the number of span words.
    pub fn record_count(&self) -> usize {
        self.field(layout::RECORD_COUNT) as usize
    }

    /// Collect all scalar fields.
    pub fn header(&self) -> Header {
        Header {
            timestamp: self.timestamp(),
            capture_len: self.capture_len(),
            wire_len: self.wire_len(),
            rx_port: self.rx_port(),
            tx_port: self.tx_port(),
            tx_flags: self.tx_flags(),
            l2_type: self.l2_type(),
            hash: self.hash(),
            hash_type: self.hash_type(),
            is_fragment: self.is_fragment(),
            is_last_fragment: self.is_last_fragment(),
            bitmask: self.bitmask(),
        }
    }

    /// Return the span at `index` of the record table.
    pub fn span(&self, index: usize) -> Option<Span> {
        if index >= self.record_count() {
            return None;
        }
        Some(Span::decode(self.word(HEADER_LEN + index * SPAN_WORD_SIZE)))
    }

    /// Iterate over the recorded spans in table order.
    pub fn spans(&self) -> Spans<'d> {
        Spans {
            words: self.bytes[HEADER_LEN..].chunks_exact(SPAN_WORD_SIZE),
            endian: self.endian,
        }
    }
}

/// Iterator over the spans of a [`Descriptor`].
///
/// [`Descriptor`]: struct.Descriptor.html
#[derive(Debug, Clone)]
pub struct Spans<'d> {
    words: core::slice::ChunksExact<'d, u8>,
    endian: Endian,
}

impl Iterator for Spans<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let bytes = self.words.next()?;
        let word = match self.endian {
            Endian::Big => BigEndian::read_u32(bytes),
            Endian::Little => LittleEndian::read_u32(bytes),
        };
        Some(Span::decode(word))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.words.size_hint()
    }
}

impl ExactSizeIterator for Spans<'_> { }

#[cfg(test)]
mod test {
    use super::*;
    use crate::id::ProtocolId;

    fn sample() -> (Header, [u32; 2]) {
        let header = Header {
            timestamp: 0x0102_0304_0506_0708,
            capture_len: 70,
            wire_len: 1518,
            rx_port: 3,
            tx_port: 63,
            tx_flags: TxFlags { now: true, ignore: false, crc_override: true, set_clock: false },
            l2_type: L2Type::Snap,
            hash: 0x00ab_cdef,
            hash_type: 9,
            is_fragment: true,
            is_last_fragment: false,
            bitmask: Bitmask::EMPTY.set(ProtocolId::ETHERNET).set(ProtocolId::IPV4),
        };
        let records = [
            Span::new(ProtocolId::ETHERNET, 0, 14).encode().unwrap(),
            Span::new(ProtocolId::IPV4, 14, 20).encode().unwrap(),
        ];
        (header, records)
    }

    #[test]
    fn read_back() {
        let (header, records) = sample();
        for &endian in [Endian::Big, Endian::Little].iter() {
            let mut buffer = [0xaa; MAX_DESCRIPTOR_LEN];
            let len = write_fast(&header, &records, &mut buffer, endian).unwrap();
            assert_eq!(len, HEADER_LEN + 8);

            let descriptor = Descriptor::new_checked(&buffer, endian).unwrap();
            assert_eq!(descriptor.len(), len);
            assert_eq!(descriptor.header(), header);
            assert_eq!(descriptor.record_count(), 2);
            assert_eq!(descriptor.span(1), Some(Span::new(ProtocolId::IPV4, 14, 20)));
            assert_eq!(descriptor.span(2), None);
            assert_eq!(descriptor.spans().len(), 2);
            assert!(descriptor.spans().map(|span| span.offset).eq([0, 14].iter().cloned()));
        }
    }

    #[test]
    fn byte_orders_differ() {
        let (header, records) = sample();
        let mut big = [0; MAX_DESCRIPTOR_LEN];
        let mut little = [0; MAX_DESCRIPTOR_LEN];
        write_fast(&header, &records, &mut big, Endian::Big).unwrap();
        write_fast(&header, &records, &mut little, Endian::Little).unwrap();
        assert_eq!(big[..8], [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(little[..8], [8, 7, 6, 5, 4, 3, 2, 1]);
        // Every word after the timestamp is swapped on its own.
        for word in 2..(HEADER_LEN + 8) / 4 {
            let mut reversed = [0; 4];
            reversed.copy_from_slice(&little[word * 4..][..4]);
            reversed.reverse();
            assert_eq!(big[word * 4..][..4], reversed);
        }
    }

    #[test]
    fn truncated_table() {
        let (header, records) = sample();
        let mut buffer = [0; MAX_DESCRIPTOR_LEN];
        let len = write_fast(&header, &records, &mut buffer, Endian::Little).unwrap();
        assert_eq!(Descriptor::new_checked(&buffer[..len - 1], Endian::Little).unwrap_err(),
            Error::Truncated);
        assert_eq!(Descriptor::new_checked(&buffer[..HEADER_LEN - 1], Endian::Little).unwrap_err(),
            Error::Truncated);
    }
}
