use core::fmt;

use crate::error::{Error, Result};

/// Length of the ICMPv4 header including the rest-of-header word.
pub const ICMPV4_HEADER_LEN: usize = 8;

/// Length of the common ICMPv6 header: type, code and checksum.
pub const ICMPV6_HEADER_LEN: usize = 4;

enum_with_unknown! {
    /// Internet protocol control message type, version 6.
    pub doc enum Icmpv6Type(u8) {
        /// Destination unreachable
        DstUnreachable  =   1,
        /// Packet too big
        PacketTooBig    =   2,
        /// Time exceeded
        TimeExceeded    =   3,
        /// Parameter problem
        ParamProblem    =   4,
        /// Echo request
        EchoRequest     = 128,
        /// Echo reply
        EchoReply       = 129,
        /// Multicast listener query
        MldQuery        = 130,
        /// Multicast listener report
        MldReport       = 131,
        /// Multicast listener done
        MldDone         = 132,
        /// Router solicitation
        RouterSolicit   = 133,
        /// Router advertisement
        RouterAdvert    = 134,
        /// Neighbor solicitation
        NeighborSolicit = 135,
        /// Neighbor advertisement
        NeighborAdvert  = 136,
        /// Redirect
        Redirect        = 137,
        /// Router renumbering
        RouterRenumber  = 138,
        /// Node information query
        NodeInfoQuery   = 139,
        /// Node information response
        NodeInfoReply   = 140,
        /// Inverse neighbor discovery solicitation
        InverseSolicit  = 141,
        /// Inverse neighbor discovery advertisement
        InverseAdvert   = 142,
        /// Home agent address discovery request
        HomeAgentRequest = 144,
        /// Home agent address discovery reply
        HomeAgentReply  = 145,
        /// Mobile prefix solicitation
        MobilePrefixSolicit = 146,
        /// Mobile prefix advertisement
        MobilePrefixAdvert = 147,
    }
}

/// What follows an ICMPv6 message header of some type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icmpv6Layout {
    /// The header spans the given length and is followed by the leading part of the offending
    /// datagram.
    Embedded(usize),
    /// The header spans the given length, nothing further is dissected.
    Fixed(usize),
}

impl Icmpv6Type {
    /// The dissected layout of a message of this type, `None` when the type is not recognized.
    ///
    /// Neighbor discovery options are not walked, the length covers the fixed message part only.
    pub fn layout(self) -> Option<Icmpv6Layout> {
        use Icmpv6Type::*;
        let layout = match self {
            DstUnreachable | TimeExceeded | ParamProblem => Icmpv6Layout::Embedded(8),
            EchoRequest | EchoReply => Icmpv6Layout::Fixed(8),
            RouterSolicit => Icmpv6Layout::Fixed(8),
            RouterAdvert => Icmpv6Layout::Fixed(16),
            NeighborSolicit | NeighborAdvert => Icmpv6Layout::Fixed(24),
            Redirect => Icmpv6Layout::Fixed(40),
            PacketTooBig
            | MldQuery | MldReport | MldDone
            | RouterRenumber | NodeInfoQuery | NodeInfoReply
            | InverseSolicit | InverseAdvert
            | HomeAgentRequest | HomeAgentReply
            | MobilePrefixSolicit | MobilePrefixAdvert => Icmpv6Layout::Fixed(ICMPV6_HEADER_LEN),
            Unknown(_) => return None,
        };
        Some(layout)
    }
}

impl fmt::Display for Icmpv6Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Icmpv6Type::Unknown(id) => write!(f, "{}", id),
            other => write!(f, "{:?}", other),
        }
    }
}

byte_wrapper! {
    /// A byte sequence representing an ICMP message of either version.
    #[derive(Debug, PartialEq, Eq)]
    pub struct icmp([u8]);
}

mod field {
    pub(crate) const TYPE: usize = 0;
    pub(crate) const CODE: usize = 1;
}

impl icmp {
    /// Imbue a captured byte sequence with ICMP structure.
    ///
    /// Requires the common four octet header.
    pub fn new_checked(data: &[u8]) -> Result<&icmp> {
        if data.len() < ICMPV6_HEADER_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }

    /// Return the message type field.
    #[inline]
    pub fn msg_type(&self) -> u8 {
        self.0[field::TYPE]
    }

    /// Return the message code field.
    #[inline]
    pub fn msg_code(&self) -> u8 {
        self.0[field::CODE]
    }

    /// The number of captured octets of the message.
    pub fn captured_len(&self) -> usize {
        self.0.len()
    }
}
