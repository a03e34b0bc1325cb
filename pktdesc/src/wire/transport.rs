//! Fixed length headers: UDP, SCTP common header and IPX.
use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};

/// Length of the UDP header.
pub const UDP_HEADER_LEN: usize = 8;

/// Length of the SCTP common header.
pub const SCTP_HEADER_LEN: usize = 12;

/// Length of the IPX header.
pub const IPX_HEADER_LEN: usize = 30;

byte_wrapper! {
    /// A byte sequence representing a UDP datagram.
    #[derive(Debug, PartialEq, Eq)]
    pub struct udp([u8]);
}

byte_wrapper! {
    /// A byte sequence representing an SCTP packet.
    #[derive(Debug, PartialEq, Eq)]
    pub struct sctp([u8]);
}

byte_wrapper! {
    /// A byte sequence representing an IPX packet.
    #[derive(Debug, PartialEq, Eq)]
    pub struct ipx([u8]);
}

mod field {
    use crate::wire::field::Field;

    pub(crate) const SRC_PORT: Field = 0..2;
    pub(crate) const DST_PORT: Field = 2..4;
}

impl udp {
    /// Imbue a captured byte sequence with UDP structure.
    pub fn new_checked(data: &[u8]) -> Result<&udp> {
        if data.len() < UDP_HEADER_LEN {
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
}

impl sctp {
    /// Imbue a captured byte sequence with SCTP structure.
    pub fn new_checked(data: &[u8]) -> Result<&sctp> {
        if data.len() < SCTP_HEADER_LEN {
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
}

impl ipx {
    /// Imbue a captured byte sequence with IPX structure.
    pub fn new_checked(data: &[u8]) -> Result<&ipx> {
        if data.len() < IPX_HEADER_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }
}
