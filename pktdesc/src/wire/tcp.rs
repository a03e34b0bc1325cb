use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};

/// Length of the TCP header without options.
pub const HEADER_LEN: usize = 20;

enum_with_unknown! {
    /// The kind octet of a TCP option.
    pub enum OptionKind(u8) {
        EndOfList     = 0,
        NoOperation   = 1,
        MaxSegmentSize = 2,
        WindowScale   = 3,
        SackPermitted = 4,
        SackRange     = 5,
        Timestamp     = 8,
        FastOpen      = 34,
    }
}

impl OptionKind {
    /// Whether the option is a single octet without a length field.
    pub fn is_single_octet(self) -> bool {
        match self {
            OptionKind::EndOfList | OptionKind::NoOperation => true,
            _ => false,
        }
    }
}

byte_wrapper! {
    /// A byte sequence representing a TCP segment.
    #[derive(Debug, PartialEq, Eq)]
    pub struct tcp([u8]);
}

mod field {
    use crate::wire::field::Field;

    pub(crate) const SRC_PORT: Field = 0..2;
    pub(crate) const DST_PORT: Field = 2..4;
    pub(crate) const DATA_OFF: usize = 12;
}

/// Offset of the length octet within an option.
pub const OPTION_LENGTH_FIELD: usize = 1;

impl tcp {
    /// Imbue a captured byte sequence with TCP structure.
    pub fn new_checked(data: &[u8]) -> Result<&tcp> {
        if data.len() < HEADER_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }

    /// Return the source port field.
    #[inline]
    pub fn src_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::SRC_PORT])
    }

    /// Return the destination port field.
    #[inline]
    pub fn dst_port(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::DST_PORT])
    }

    /// Return the header length, in octets.
    #[inline]
    pub fn header_len(&self) -> usize {
        usize::from(self.0[field::DATA_OFF] >> 4) * 4
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static SEGMENT_BYTES: [u8; 20] =
        [0x04, 0x8a, 0x17, 0x70, 0x4e, 0x14, 0xd0, 0xa9,
         0x4d, 0x3d, 0x54, 0xb9, 0x80, 0x18, 0x70, 0xf8,
         0x10, 0xb8, 0x00, 0x00];

    #[test]
    fn test_deconstruct() {
        let segment = tcp::new_checked(&SEGMENT_BYTES[..]).unwrap();
        assert_eq!(segment.src_port(), 1162);
        assert_eq!(segment.dst_port(), 6000);
        assert_eq!(segment.header_len(), 32);
    }

    #[test]
    fn test_option_kinds() {
        assert_eq!(OptionKind::from(34), OptionKind::FastOpen);
        assert!(OptionKind::EndOfList.is_single_octet());
        assert!(!OptionKind::Timestamp.is_single_octet());
    }
}
