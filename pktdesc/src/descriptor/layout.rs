//! Offsets and bit fields of the descriptor header.
//!
//! Both writers and the reader take every position from this table. The header consists of one
//! 64-bit word and four 32-bit words, each stored whole in the byte order requested for the
//! descriptor:
//!
//! ```text
//! octet  0..8   timestamp
//! octet  8..12  word 2: capture length (0..16) rx port (16..22) tx port (22..28)
//! octet 12..16  word 3: wire length (0..16) tx now (16) tx ignore (17) tx crc override (18)
//!                       tx set clock (19) l2 type (20..25) record count (26..32)
//! octet 16..20  word 4: hash (0..24) hash type (24..28) is fragment (28) is last fragment (29)
//! octet 20..24  word 5: protocol bitmask
//! octet 24..    span words
//! ```
// The fields are named in the table above.
#![allow(missing_docs)]

use crate::span::SPAN_WORD_SIZE;

/// Maximum number of spans recorded for one packet.
pub const MAX_RECORDS: usize = 32;

/// Octet offset of the 64-bit timestamp.
pub const TIMESTAMP: usize = 0;

/// Octet offset of the capture length and port word.
pub const WORD2: usize = 8;

/// Octet offset of the wire length, flags and record count word.
pub const WORD3: usize = 12;

/// Octet offset of the hash and fragmentation word.
pub const WORD4: usize = 16;

/// Octet offset of the protocol bitmask.
pub const WORD5: usize = 20;

/// Length of the fixed header, also the offset of the first span word.
pub const HEADER_LEN: usize = 24;

/// Length of a descriptor with a full span table.
pub const MAX_DESCRIPTOR_LEN: usize = HEADER_LEN + MAX_RECORDS * SPAN_WORD_SIZE;

/// A field of `width` bits starting at bit `shift` of the 32-bit word at octet `word`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    /// Octet offset of the containing word.
    pub word: usize,
    /// Bit index of the least significant field bit.
    pub shift: u32,
    /// Number of bits.
    pub width: u32,
}

impl BitField {
    const fn new(word: usize, shift: u32, width: u32) -> Self {
        BitField { word, shift, width }
    }

    /// The largest value representable in the field.
    pub const fn max(self) -> u32 {
        ((1u64 << self.width) - 1) as u32
    }

    /// Position `value` within its word, dropping bits beyond the width.
    #[inline]
    pub fn pack(self, value: u32) -> u32 {
        (value & self.max()) << self.shift
    }

    /// Clear the field in `word` and insert `value`.
    #[inline]
    pub fn replace(self, word: u32, value: u32) -> u32 {
        (word & !(self.max() << self.shift)) | self.pack(value)
    }

    /// Extract the field from its word.
    #[inline]
    pub fn unpack(self, word: u32) -> u32 {
        (word >> self.shift) & self.max()
    }
}

pub const CAPLEN:          BitField = BitField::new(WORD2,  0, 16);
pub const RX_PORT:         BitField = BitField::new(WORD2, 16,  6);
pub const TX_PORT:         BitField = BitField::new(WORD2, 22,  6);

pub const WIRELEN:         BitField = BitField::new(WORD3,  0, 16);
pub const TX_NOW:          BitField = BitField::new(WORD3, 16,  1);
pub const TX_IGNORE:       BitField = BitField::new(WORD3, 17,  1);
pub const TX_CRC_OVERRIDE: BitField = BitField::new(WORD3, 18,  1);
pub const TX_SET_CLOCK:    BitField = BitField::new(WORD3, 19,  1);
pub const L2_TYPE:         BitField = BitField::new(WORD3, 20,  5);
pub const RECORD_COUNT:    BitField = BitField::new(WORD3, 26,  6);

pub const HASH24:          BitField = BitField::new(WORD4,  0, 24);
pub const HASH_TYPE:       BitField = BitField::new(WORD4, 24,  4);
pub const L3_IS_FRAG:      BitField = BitField::new(WORD4, 28,  1);
pub const L3_LAST_FRAG:    BitField = BitField::new(WORD4, 29,  1);

pub const BITMASK:         BitField = BitField::new(WORD5,  0, 32);

#[cfg(test)]
mod test {
    use super::*;

    const WORDS: [&[BitField]; 4] = [
        &[CAPLEN, RX_PORT, TX_PORT],
        &[WIRELEN, TX_NOW, TX_IGNORE, TX_CRC_OVERRIDE, TX_SET_CLOCK, L2_TYPE, RECORD_COUNT],
        &[HASH24, HASH_TYPE, L3_IS_FRAG, L3_LAST_FRAG],
        &[BITMASK],
    ];

    #[test]
    fn fields_do_not_overlap() {
        for fields in WORDS.iter() {
            let mut used = 0u32;
            for field in fields.iter() {
                assert_eq!(field.word, fields[0].word);
                assert!(field.shift + field.width <= 32);
                let bits = field.max() << field.shift;
                assert_eq!(used & bits, 0, "{:?} overlaps", field);
                used |= bits;
            }
        }
    }

    #[test]
    fn record_count_fits() {
        assert!(RECORD_COUNT.max() as usize >= MAX_RECORDS);
        assert_eq!(MAX_DESCRIPTOR_LEN, 152);
    }

    #[test]
    fn replace_keeps_neighbours() {
        let word = RX_PORT.pack(0x3f) | CAPLEN.pack(60);
        let word = TX_PORT.replace(word, 5);
        assert_eq!(CAPLEN.unpack(word), 60);
        assert_eq!(RX_PORT.unpack(word), 0x3f);
        assert_eq!(TX_PORT.unpack(word), 5);
        assert_eq!(BITMASK.max(), !0);
    }
}
