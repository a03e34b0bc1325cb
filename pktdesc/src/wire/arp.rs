use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};

/// Length of the fixed part of an ARP packet, before the addresses.
pub const FIXED_LEN: usize = 8;

byte_wrapper! {
    /// A byte sequence representing an ARP or RARP packet.
    #[derive(Debug, PartialEq, Eq)]
    pub struct arp([u8]);
}

mod field {
    use crate::wire::field::Field;

    pub(crate) const HTYPE: Field = 0..2;
    pub(crate) const PTYPE: Field = 2..4;
    pub(crate) const HLEN:  usize = 4;
    pub(crate) const PLEN:  usize = 5;
    pub(crate) const OPER:  Field = 6..8;
}

impl arp {
    /// Imbue a captured byte sequence with ARP structure.
    ///
    /// Only the fixed part is checked, the addresses need [`header_len`] octets in total.
    ///
    /// [`header_len`]: #method.header_len
    pub fn new_checked(data: &[u8]) -> Result<&arp> {
        if data.len() < FIXED_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }

    /// Return the hardware type field.
    pub fn hardware_type(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::HTYPE])
    }

    /// Return the protocol type field.
    pub fn protocol_type(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::PTYPE])
    }

    /// Return the hardware address length field.
    pub fn hardware_len(&self) -> u8 {
        self.0[field::HLEN]
    }

    /// Return the protocol address length field.
    pub fn protocol_len(&self) -> u8 {
        self.0[field::PLEN]
    }

    /// Return the operation field.
    pub fn operation(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::OPER])
    }

    /// The length of the packet including both address pairs.
    pub fn header_len(&self) -> usize {
        FIXED_LEN + 2*(usize::from(self.hardware_len()) + usize::from(self.protocol_len()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static PACKET_BYTES: [u8; 28] =
        [0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01,
         0x00, 0x07, 0x0d, 0xaf, 0xf4, 0x54,
         0x18, 0xa6, 0xac, 0x01,
         0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
         0x18, 0xa6, 0xad, 0x9f];

    #[test]
    fn test_deconstruct() {
        let packet = arp::new_checked(&PACKET_BYTES[..]).unwrap();
        assert_eq!(packet.hardware_type(), 1);
        assert_eq!(packet.protocol_type(), 0x0800);
        assert_eq!(packet.hardware_len(), 6);
        assert_eq!(packet.protocol_len(), 4);
        assert_eq!(packet.operation(), 1);
        assert_eq!(packet.header_len(), 28);
    }
}
