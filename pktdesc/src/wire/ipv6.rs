use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};
use super::IpProtocol as Protocol;

/// Length of the fixed IPv6 header.
pub const HEADER_LEN: usize = 40;

/// Length of the fragment extension header.
pub const FRAGMENT_HEADER_LEN: usize = 8;

byte_wrapper! {
    /// A byte sequence representing an IPv6 packet.
    #[derive(Debug, PartialEq, Eq)]
    pub struct ipv6([u8]);
}

mod field {
    use crate::wire::field::Field;

    pub(crate) const VER_TC_FLOW: usize = 0;
    pub(crate) const LENGTH:      Field = 4..6;
    pub(crate) const NXT_HDR:     usize = 6;

    // Relative to the start of an extension header.
    pub(crate) const EXT_NXT_HDR: usize = 0;
    pub(crate) const EXT_LENGTH:  usize = 1;
    pub(crate) const FRAG_OFF_M:  core::ops::Range<usize> = 2..4;
}

impl ipv6 {
    /// Imbue a captured byte sequence with IPv6 structure.
    pub fn new_checked(data: &[u8]) -> Result<&ipv6> {
        if data.len() < HEADER_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }

    /// Return the version field.
    #[inline]
    pub fn version(&self) -> u8 {
        self.0[field::VER_TC_FLOW] >> 4
    }

    /// Return the payload length field.
    #[inline]
    pub fn payload_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::LENGTH])
    }

    /// Return the next header field.
    #[inline]
    pub fn next_header(&self) -> Protocol {
        Protocol::from(self.0[field::NXT_HDR])
    }
}

/// The way an extension header declares its own length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionLength {
    /// Always exactly eight octets.
    Fixed,
    /// Length octet in 8-octet units, not counting the first 8 octets.
    Units8,
}

/// Classify a next header value as an extension header that continues the chain.
///
/// Returns `None` for upper layer protocols, for "no next header" and for the encapsulating
/// security payload whose content can not be walked.
pub fn extension_length(next_header: Protocol) -> Option<ExtensionLength> {
    match next_header {
        Protocol::Ipv6Frag => Some(ExtensionLength::Fixed),
        Protocol::HopByHop
        | Protocol::Ah
        | Protocol::Ipv6Route
        | Protocol::Ipv6Opts
        | Protocol::Mobility
        | Protocol::Hip
        | Protocol::Shim6 => Some(ExtensionLength::Units8),
        _ => None,
    }
}

/// Read the next header and total length of the extension header at the start of `ext`.
///
/// Needs the first two octets of the extension to be captured.
pub fn extension_header(ext: &[u8], kind: ExtensionLength) -> Option<(Protocol, usize)> {
    let next = Protocol::from(*ext.get(field::EXT_NXT_HDR)?);
    let declared = usize::from(*ext.get(field::EXT_LENGTH)?);
    let len = match kind {
        ExtensionLength::Fixed => FRAGMENT_HEADER_LEN,
        ExtensionLength::Units8 => declared * 8 + 8,
    };
    Some((next, len))
}

/// Read the fragment offset, in octets, and the "more fragments" flag of a fragment header.
pub fn fragment_offset_more(ext: &[u8]) -> Option<(u16, bool)> {
    let raw = ext.get(field::FRAG_OFF_M).map(NetworkEndian::read_u16)?;
    Some((raw & 0xfff8, raw & 0x1 != 0))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extension_lengths() {
        let hop = [0x06, 0x00, 0x01, 0x04, 0x00, 0x00, 0x00, 0x00];
        let kind = extension_length(Protocol::HopByHop).unwrap();
        assert_eq!(extension_header(&hop, kind), Some((Protocol::Tcp, 8)));

        let route = [0x3a, 0x02];
        let kind = extension_length(Protocol::Ipv6Route).unwrap();
        assert_eq!(extension_header(&route, kind), Some((Protocol::Icmpv6, 24)));

        let frag = [0x11, 0xff];
        assert_eq!(extension_header(&frag, ExtensionLength::Fixed), Some((Protocol::Udp, 8)));

        // The authentication header counts in 8-octet units like the others.
        let auth = [0x06, 0x04];
        let kind = extension_length(Protocol::Ah).unwrap();
        assert_eq!(kind, ExtensionLength::Units8);
        assert_eq!(extension_header(&auth, kind), Some((Protocol::Tcp, 40)));

        assert_eq!(extension_length(Protocol::Tcp), None);
        assert_eq!(extension_length(Protocol::Esp), None);
        assert_eq!(extension_length(Protocol::Ipv6NoNxt), None);
        assert_eq!(extension_header(&[0x06], ExtensionLength::Units8), None);
    }

    #[test]
    fn fragment_fields() {
        let frag = [0x11, 0x00, 0x00, 0xb9, 0x00, 0x00, 0x00, 0x01];
        assert_eq!(fragment_offset_more(&frag), Some((0xb8, true)));
    }
}
