use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};

/// Length of the GRE header without optional fields.
pub const HEADER_LEN: usize = 4;

/// The checksum (and reserved) field is present.
pub const FLAG_CHECKSUM: u16 = 0x8000;

/// The key field is present.
pub const FLAG_KEY: u16 = 0x2000;

/// The sequence number field is present.
pub const FLAG_SEQUENCE: u16 = 0x1000;

byte_wrapper! {
    /// A byte sequence representing a GRE header.
    #[derive(Debug, PartialEq, Eq)]
    pub struct gre([u8]);
}

mod field {
    use crate::wire::field::Field;

    pub(crate) const FLAGS_VER: Field = 0..2;
    pub(crate) const PROTOCOL:  Field = 2..4;
}

impl gre {
    /// Imbue a captured byte sequence with GRE structure.
    pub fn new_checked(data: &[u8]) -> Result<&gre> {
        if data.len() < HEADER_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }

    /// Return the flags and version field.
    #[inline]
    pub fn flags(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::FLAGS_VER])
    }

    /// Return the protocol type, an ethertype.
    #[inline]
    pub fn protocol_type(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::PROTOCOL])
    }

    /// The header length including the optional fields announced by the flags.
    pub fn header_len(&self) -> usize {
        header_len(self.flags())
    }
}

/// Header length for the given flags: four octets plus four per optional field.
///
/// The fields follow in the order checksum, key, sequence number.
pub fn header_len(flags: u16) -> usize {
    [FLAG_CHECKSUM, FLAG_KEY, FLAG_SEQUENCE]
        .iter()
        .filter(|&&flag| flags & flag != 0)
        .count() * 4 + HEADER_LEN
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flag_dependent_length() {
        assert_eq!(header_len(0x0000), 4);
        assert_eq!(header_len(FLAG_CHECKSUM), 8);
        assert_eq!(header_len(FLAG_KEY | FLAG_SEQUENCE), 12);
        assert_eq!(header_len(FLAG_CHECKSUM | FLAG_KEY | FLAG_SEQUENCE), 16);
        // Routing present and version bits do not count.
        assert_eq!(header_len(0x4007), 4);
    }

    #[test]
    fn test_deconstruct() {
        let bytes = [0x20, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x2a];
        let header = gre::new_checked(&bytes[..]).unwrap();
        assert_eq!(header.protocol_type(), 0x0800);
        assert_eq!(header.header_len(), 8);
    }
}
