use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};
use super::IpProtocol as Protocol;

/// Length of the IPv4 header without options.
pub const HEADER_LEN: usize = 20;

enum_with_unknown! {
    /// The type octet of an IPv4 option: copied flag, class and number.
    ///
    /// The option number in the low five bits is unique among the registered options, the
    /// dissector derives span ids from it.
    pub enum OptionType(u8) {
        EndOfList       = 0x00,
        NoOperation     = 0x01,
        RecordRoute     = 0x07,
        Timestamp       = 0x44,
        LooseRoute      = 0x83,
        Security        = 0x82,
        StreamId        = 0x88,
        StrictRoute     = 0x89,
        RouterAlert     = 0x94,
    }
}

impl OptionType {
    /// Whether the option is a single octet without a length field.
    pub fn is_single_octet(self) -> bool {
        match self {
            OptionType::EndOfList | OptionType::NoOperation => true,
            _ => false,
        }
    }

    /// The option number, the low five bits of the type.
    pub fn number(self) -> u8 {
        u8::from(self) & 0x1f
    }
}

byte_wrapper! {
    /// A byte sequence representing an IPv4 packet.
    #[derive(Debug, PartialEq, Eq)]
    pub struct ipv4([u8]);
}

mod field {
    use crate::wire::field::Field;

    pub(crate) const VER_IHL:  usize = 0;
    pub(crate) const LENGTH:   Field = 2..4;
    pub(crate) const FLG_OFF:  Field = 6..8;
    pub(crate) const PROTOCOL: usize = 9;
}

impl ipv4 {
    /// Imbue a captured byte sequence with IPv4 structure.
    ///
    /// Checks that the fixed header is captured. Options, if any, are not checked.
    pub fn new_checked(data: &[u8]) -> Result<&ipv4> {
        if data.len() < HEADER_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }

    /// Return the version field.
    #[inline]
    pub fn version(&self) -> u8 {
        self.0[field::VER_IHL] >> 4
    }

    /// Return the header length, in octets.
    #[inline]
    pub fn header_len(&self) -> usize {
        usize::from(self.0[field::VER_IHL] & 0x0f) * 4
    }

    /// Return the total length field.
    #[inline]
    pub fn total_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::LENGTH])
    }

    /// Return the "more fragments" flag.
    #[inline]
    pub fn more_frags(&self) -> bool {
        NetworkEndian::read_u16(&self.0[field::FLG_OFF]) & 0x2000 != 0
    }

    /// Return the fragment offset, in octets.
    #[inline]
    pub fn frag_offset(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::FLG_OFF]) << 3
    }

    /// Query whether the datagram is a fragment of a larger one.
    pub fn is_fragment(&self) -> bool {
        self.more_frags() || self.frag_offset() != 0
    }

    /// Return the protocol field.
    #[inline]
    pub fn protocol(&self) -> Protocol {
        Protocol::from(self.0[field::PROTOCOL])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static PACKET_BYTES: [u8; 24] =
        [0x46, 0x00, 0x00, 0x18,
         0x00, 0x00, 0x20, 0x01,
         0x40, 0x06, 0x00, 0x00,
         0x11, 0x12, 0x13, 0x14,
         0x21, 0x22, 0x23, 0x24,
         0x01, 0x01, 0x01, 0x00];

    #[test]
    fn test_deconstruct() {
        let packet = ipv4::new_checked(&PACKET_BYTES[..]).unwrap();
        assert_eq!(packet.version(), 4);
        assert_eq!(packet.header_len(), 24);
        assert_eq!(packet.total_len(), 24);
        assert!(packet.more_frags());
        assert_eq!(packet.frag_offset(), 8);
        assert!(packet.is_fragment());
        assert_eq!(packet.protocol(), Protocol::Tcp);
    }

    #[test]
    fn test_option_numbers() {
        assert_eq!(OptionType::from(0x94).number(), 20);
        assert_eq!(OptionType::RecordRoute.number(), 7);
        assert!(OptionType::NoOperation.is_single_octet());
        assert!(!OptionType::Unknown(0x9e).is_single_octet());
    }
}
