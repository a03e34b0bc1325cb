//! The error type shared by span encoding, descriptor handling and the extension registry.
use core::fmt;

/// The error type for span encoding and descriptor handling.
///
/// Dissection itself never reports an error to its caller. A truncated or malformed packet
/// produces a descriptor with fewer spans instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A value does not fit into the bits reserved for it.
    ///
    /// Returned when encoding a span whose id, offset or length exceeds the packed word layout.
    /// The dissector treats such a span as rejected, like one exceeding the capture.
    Overflow,

    /// A fixed capacity was exhausted.
    ///
    /// The descriptor buffer is shorter than the descriptor to be written, or the extension
    /// registry has no free slot left.
    Exhausted,

    /// A buffer ends before the structure it should contain.
    ///
    /// Within dissection this only stops the current branch and never leaves the dissector. When
    /// reading a descriptor it means the span table is shorter than its declared record count.
    Truncated,

    #[doc(hidden)]
    __Nonexhaustive(Private),
}

#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Private { private: () }

/// The result type for span and descriptor operations.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Overflow  => write!(f, "value exceeds its field width"),
            Error::Exhausted => write!(f, "capacity exhausted"),
            Error::Truncated => write!(f, "buffer truncated"),
            Error::__Nonexhaustive(_) => unreachable!()
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
