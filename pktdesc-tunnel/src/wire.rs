//! Header views of the tunnel protocols.
// Field names follow RFC 7348, RFC 8926 and RFC 4303.
#![allow(missing_docs)]

use byteorder::{ByteOrder, NetworkEndian};
use pktdesc::byte_wrapper;
use pktdesc::{Error, Result};

mod field {
    type Field = core::ops::Range<usize>;

    pub(crate) const VXLAN_FLAGS: usize = 0;
    pub(crate) const VXLAN_VNI: Field = 4..7;

    pub(crate) const GENEVE_VER_OPT_LEN: usize = 0;
    pub(crate) const GENEVE_FLAGS: usize = 1;
    pub(crate) const GENEVE_PROTOCOL: Field = 2..4;
    pub(crate) const GENEVE_VNI: Field = 4..7;

    pub(crate) const ESP_SPI: Field = 0..4;
    pub(crate) const ESP_SEQUENCE: Field = 4..8;
}

/// Length of the VXLAN header.
pub const VXLAN_HEADER_LEN: usize = 8;

/// Length of the Geneve header without options.
pub const GENEVE_HEADER_LEN: usize = 8;

/// Length of the ESP header, the part that is not encrypted.
pub const ESP_HEADER_LEN: usize = 8;

byte_wrapper! {
    /// A byte sequence representing a VXLAN header.
    #[derive(Debug, PartialEq, Eq)]
    pub struct vxlan([u8]);
}

impl vxlan {
    /// The VNI is valid.
    pub const FLAG_VNI: u8 = 0x08;

    /// Imbue a captured byte sequence with VXLAN structure.
    pub fn new_checked(data: &[u8]) -> Result<&Self> {
        if data.len() < VXLAN_HEADER_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }

    pub fn flags(&self) -> u8 {
        self.0[field::VXLAN_FLAGS]
    }

    /// Query whether the header announces a valid network identifier.
    pub fn has_vni(&self) -> bool {
        self.flags() & Self::FLAG_VNI != 0
    }

    pub fn vni(&self) -> u32 {
        NetworkEndian::read_u24(&self.0[field::VXLAN_VNI])
    }
}

byte_wrapper! {
    /// A byte sequence representing a Geneve header.
    #[derive(Debug, PartialEq, Eq)]
    pub struct geneve([u8]);
}

impl geneve {
    /// The only version defined.
    pub const VERSION: u8 = 0;

    /// The packet carries control traffic.
    pub const FLAG_OAM: u8 = 0x80;

    /// Imbue a captured byte sequence with Geneve structure.
    ///
    /// Only the fixed part must be captured, the options are checked by the caller against
    /// `header_len`.
    pub fn new_checked(data: &[u8]) -> Result<&Self> {
        if data.len() < GENEVE_HEADER_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }

    pub fn version(&self) -> u8 {
        self.0[field::GENEVE_VER_OPT_LEN] >> 6
    }

    /// The length of the options in units of four octets.
    pub fn options_len(&self) -> u8 {
        self.0[field::GENEVE_VER_OPT_LEN] & 0x3f
    }

    pub fn flags(&self) -> u8 {
        self.0[field::GENEVE_FLAGS]
    }

    /// The ethertype of the payload.
    pub fn protocol_type(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::GENEVE_PROTOCOL])
    }

    pub fn vni(&self) -> u32 {
        NetworkEndian::read_u24(&self.0[field::GENEVE_VNI])
    }

    /// The length of the header including its options.
    pub fn header_len(&self) -> usize {
        GENEVE_HEADER_LEN + 4*usize::from(self.options_len())
    }
}

byte_wrapper! {
    /// A byte sequence representing an ESP header.
    #[derive(Debug, PartialEq, Eq)]
    pub struct esp([u8]);
}

impl esp {
    /// Imbue a captured byte sequence with ESP structure.
    pub fn new_checked(data: &[u8]) -> Result<&Self> {
        if data.len() < ESP_HEADER_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }

    pub fn spi(&self) -> u32 {
        NetworkEndian::read_u32(&self.0[field::ESP_SPI])
    }

    pub fn sequence_number(&self) -> u32 {
        NetworkEndian::read_u32(&self.0[field::ESP_SEQUENCE])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static GENEVE_WITH_OPTION: [u8; 16] = [
        0x02, 0x00, 0x65, 0x58,
        0x00, 0x12, 0x34, 0x00,
        // One option, class 0x0102, type 0x80, length one word.
        0x01, 0x02, 0x80, 0x01,
        0xde, 0xad, 0xbe, 0xef,
    ];

    #[test]
    fn vxlan_fields() {
        let bytes = [0x08, 0, 0, 0, 0x00, 0x00, 0x2a, 0x00];
        let header = vxlan::new_checked(&bytes).unwrap();
        assert!(header.has_vni());
        assert_eq!(header.vni(), 42);
        assert_eq!(vxlan::new_checked(&bytes[..7]), Err(Error::Truncated));
    }

    #[test]
    fn geneve_options() {
        let header = geneve::new_checked(&GENEVE_WITH_OPTION).unwrap();
        assert_eq!(header.version(), 0);
        assert_eq!(header.options_len(), 2);
        assert_eq!(header.header_len(), 16);
        assert_eq!(header.protocol_type(), 0x6558);
        assert_eq!(header.vni(), 0x1234);
        assert_eq!(header.flags() & geneve::FLAG_OAM, 0);
    }

    #[test]
    fn esp_fields() {
        let bytes = [0x00, 0x00, 0x10, 0x01, 0x00, 0x00, 0x00, 0x07, 0xff];
        let header = esp::new_checked(&bytes).unwrap();
        assert_eq!(header.spi(), 0x1001);
        assert_eq!(header.sequence_number(), 7);
    }
}
