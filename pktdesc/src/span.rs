//! Packing of spans into words and the 32-bit protocol sets.
//!
//! A span word is a `u32` laid out as follows, bit 0 being the least significant:
//!
//! ```text
//!  31        25 24              13 12               0
//! +------------+------------------+------------------+
//! |  id (7)    |   length (12)    |   offset (13)    |
//! +------------+------------------+------------------+
//! ```
//!
//! Offsets up to 8191 cover every header located within a jumbo frame, lengths up to 4095 cover
//! the longest header the dissector computes. Spans outside of these ranges are not encodable and
//! encoding reports `Error::Overflow` instead of truncating any field.
use core::{fmt, ops};

use crate::error::{Error, Result};
use crate::id::{ProtocolId, ORDINAL_BITS};

/// Octets occupied by one encoded span in a descriptor.
pub const SPAN_WORD_SIZE: usize = 4;

const OFFSET_BITS: u32 = 13;
const LENGTH_BITS: u32 = 12;
const LENGTH_SHIFT: u32 = OFFSET_BITS;
const ID_SHIFT: u32 = OFFSET_BITS + LENGTH_BITS;

/// The largest encodable span offset.
pub const MAX_OFFSET: usize = (1 << OFFSET_BITS) - 1;

/// The largest encodable span length.
pub const MAX_LENGTH: usize = (1 << LENGTH_BITS) - 1;

/// A header or option found at some range of the captured packet.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub struct Span {
    /// The protocol, option or extension header found.
    pub id: ProtocolId,
    /// Octet offset from the start of the capture.
    pub offset: usize,
    /// Number of octets, zero for markers.
    pub length: usize,
}

impl Span {
    /// Create a span of `length` octets at `offset`.
    pub fn new(id: ProtocolId, offset: usize, length: usize) -> Self {
        Span { id, offset, length }
    }

    /// The first octet after the span, `None` on arithmetic overflow.
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.length)
    }

    /// The octets of the capture covered by the span.
    pub fn range(&self) -> ops::Range<usize> {
        self.offset..self.offset + self.length
    }

    /// Pack the span into a single word.
    ///
    /// Returns `Err(Error::Overflow)` when offset or length exceed their bit budget.
    pub fn encode(&self) -> Result<u32> {
        if self.offset > MAX_OFFSET || self.length > MAX_LENGTH {
            return Err(Error::Overflow);
        }
        Ok(u32::from(self.id.raw()) << ID_SHIFT
            | (self.length as u32) << LENGTH_SHIFT
            | self.offset as u32)
    }

    /// Unpack a span word.
    ///
    /// Every word decodes to some span, decoding is the inverse of [`encode`].
    ///
    /// [`encode`]: #method.encode
    pub fn decode(word: u32) -> Self {
        Span {
            id: ProtocolId::from_raw_masked((word >> ID_SHIFT) as u8),
            offset: (word & MAX_OFFSET as u32) as usize,
            length: ((word >> LENGTH_SHIFT) & MAX_LENGTH as u32) as usize,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@{}+{}", self.id, self.offset, self.length)
    }
}

/// Extract the set index of the protocol recorded in a span word.
pub fn decode_ordinal(word: u32) -> u8 {
    ((word >> ID_SHIFT) & ((1 << ORDINAL_BITS) - 1)) as u8
}

/// A 32-bit set of protocol id ordinals.
#[derive(Hash, PartialEq, Eq, Clone, Copy, Default)]
pub struct Bitmask(pub u32);

impl Bitmask {
    /// The set containing nothing.
    pub const EMPTY: Bitmask = Bitmask(0);

    /// The set containing every ordinal.
    pub const ALL: Bitmask = Bitmask(!0);

    /// Return the set with the ordinal of `id` added.
    #[must_use]
    pub fn set(self, id: ProtocolId) -> Self {
        Bitmask(self.0 | 1 << id.ordinal())
    }

    /// Query whether the ordinal of `id` is in the set.
    pub fn test(self, id: ProtocolId) -> bool {
        self.0 & 1 << id.ordinal() != 0
    }

    /// Add the ordinal of `id` in place.
    pub fn insert(&mut self, id: ProtocolId) {
        *self = self.set(id);
    }

    /// The raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Query whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Bitmask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Bitmask({:#010x})", self.0)
    }
}

impl From<u32> for Bitmask {
    fn from(bits: u32) -> Self {
        Bitmask(bits)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::id::Class;

    #[test]
    fn encode_decode() {
        let classes = [Class::Protocol, Class::Ipv4Option, Class::Ipv6Extension, Class::TcpOption];
        for &class in classes.iter() {
            for &ordinal in [0u8, 1, 17, 31].iter() {
                let id = ProtocolId::new(class, ordinal);
                for &(offset, length) in [(0, 0), (14, 20), (MAX_OFFSET, MAX_LENGTH)].iter() {
                    let span = Span::new(id, offset, length);
                    let word = span.encode().unwrap();
                    assert_eq!(Span::decode(word), span);
                    assert_eq!(decode_ordinal(word), ordinal);
                }
            }
        }
    }

    #[test]
    fn encode_rejects_overflow() {
        let id = ProtocolId::TCP;
        assert_eq!(Span::new(id, MAX_OFFSET + 1, 0).encode(), Err(Error::Overflow));
        assert_eq!(Span::new(id, 0, MAX_LENGTH + 1).encode(), Err(Error::Overflow));
    }

    #[test]
    fn word_layout() {
        let word = Span::new(ProtocolId::IPV4, 14, 20).encode().unwrap();
        assert_eq!(word, 4 << 25 | 20 << 13 | 14);
    }

    #[test]
    fn bitmask_membership() {
        let mask = Bitmask::EMPTY
            .set(ProtocolId::ETHERNET)
            .set(ProtocolId::ARP);
        assert_eq!(mask.bits(), 0b1001);
        assert!(mask.test(ProtocolId::ARP));
        assert!(!mask.test(ProtocolId::IPV4));
        assert!(Bitmask::ALL.test(ProtocolId::extension(15)));
        assert!(Bitmask::EMPTY.is_empty());
    }
}
