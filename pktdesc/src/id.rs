//! The protocol id space.
//!
//! Every span carries a 7-bit protocol id. The high two bits select a [`Class`], the low five
//! bits are the *ordinal* within that class. Ordinals are what the 32-bit sets index: the
//! protocol bitmask of a descriptor holds ordinals of the `Protocol` class while each
//! disable-bitmask holds ordinals of one option class.
//!
//! The tables here are immutable and shared by every dissector.
//!
//! [`Class`]: enum.Class.html
use core::fmt;

use crate::wire::{IpProtocol, Ipv4OptionType, TcpOptionKind};

/// Number of bits of a protocol id.
pub const ID_BITS: u32 = 7;

/// Number of bits of the ordinal part of a protocol id.
pub const ORDINAL_BITS: u32 = 5;

const ORDINAL_MASK: u8 = (1 << ORDINAL_BITS) - 1;

/// The first ordinal of the `Protocol` class left to extension modules.
pub const EXTENSION_ORDINAL_BASE: u8 = 16;

/// The kind of header a protocol id refers to.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Class {
    /// A complete protocol header, recorded in the protocol bitmask.
    Protocol = 0,
    /// An IPv4 option.
    Ipv4Option = 1,
    /// An IPv6 extension header.
    Ipv6Extension = 2,
    /// A TCP option.
    TcpOption = 3,
}

/// Identifies the protocol, option or extension header of a span.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct ProtocolId(u8);

impl ProtocolId {
    /// MAC header, including any 802.1Q/802.1ad tags.
    pub const ETHERNET: ProtocolId = ProtocolId(0);
    /// 802.2 logical link control header.
    pub const LLC:      ProtocolId = ProtocolId(1);
    /// Subnetwork access protocol header following LLC.
    pub const SNAP:     ProtocolId = ProtocolId(2);
    /// ARP and RARP.
    pub const ARP:      ProtocolId = ProtocolId(3);
    /// IPv4 header including its options.
    pub const IPV4:     ProtocolId = ProtocolId(4);
    /// IPv6 header including its extension header chain.
    pub const IPV6:     ProtocolId = ProtocolId(5);
    /// Novell IPX header.
    pub const IPX:      ProtocolId = ProtocolId(6);
    /// TCP header including its options.
    pub const TCP:      ProtocolId = ProtocolId(7);
    /// UDP header.
    pub const UDP:      ProtocolId = ProtocolId(8);
    /// ICMPv4 message header.
    pub const ICMPV4:   ProtocolId = ProtocolId(9);
    /// ICMPv6 message header.
    pub const ICMPV6:   ProtocolId = ProtocolId(10);
    /// GRE header including its optional fields.
    pub const GRE:      ProtocolId = ProtocolId(11);
    /// SCTP common header.
    pub const SCTP:     ProtocolId = ProtocolId(12);

    /// Compose an id from its class and ordinal.
    ///
    /// Only the low five bits of `ordinal` are used.
    pub const fn new(class: Class, ordinal: u8) -> Self {
        ProtocolId(((class as u8) << ORDINAL_BITS) | (ordinal & ORDINAL_MASK))
    }

    /// An id of the protocol class reserved for extension modules.
    ///
    /// Extensions own the ordinals from [`EXTENSION_ORDINAL_BASE`] upwards, `index` is relative to
    /// that base and only its low four bits are used.
    ///
    /// [`EXTENSION_ORDINAL_BASE`]: constant.EXTENSION_ORDINAL_BASE.html
    pub const fn extension(index: u8) -> Self {
        ProtocolId::new(Class::Protocol, EXTENSION_ORDINAL_BASE | (index & 0x0f))
    }

    /// Reinterpret a raw id value, `None` if it has more than [`ID_BITS`] bits.
    ///
    /// [`ID_BITS`]: constant.ID_BITS.html
    pub fn from_raw(raw: u8) -> Option<Self> {
        if u32::from(raw) >> ID_BITS == 0 {
            Some(ProtocolId(raw))
        } else {
            None
        }
    }

    /// Reinterpret the low [`ID_BITS`] bits of a raw value.
    ///
    /// [`ID_BITS`]: constant.ID_BITS.html
    pub(crate) fn from_raw_masked(raw: u8) -> Self {
        ProtocolId(raw & ((1 << ID_BITS) - 1))
    }

    /// The raw id value.
    pub fn raw(self) -> u8 {
        self.0
    }

    /// The bit index of this id within a 32-bit set.
    pub fn ordinal(self) -> u8 {
        self.0 & ORDINAL_MASK
    }

    /// The class of header identified.
    pub fn class(self) -> Class {
        match self.0 >> ORDINAL_BITS {
            0 => Class::Protocol,
            1 => Class::Ipv4Option,
            2 => Class::Ipv6Extension,
            _ => Class::TcpOption,
        }
    }

    /// The id of an IPv4 option, keyed by its option number.
    pub fn ipv4_option(kind: Ipv4OptionType) -> Self {
        ProtocolId::new(Class::Ipv4Option, kind.number())
    }

    /// The id of an IPv6 extension header, `None` when `next_header` is not an extension.
    pub fn ipv6_extension(next_header: IpProtocol) -> Option<Self> {
        let ordinal = match next_header {
            IpProtocol::HopByHop  => 0,
            IpProtocol::Ipv6Route => 1,
            IpProtocol::Ipv6Frag  => 2,
            IpProtocol::Ipv6Opts  => 3,
            IpProtocol::Ah        => 4,
            IpProtocol::Mobility  => 5,
            IpProtocol::Hip       => 6,
            IpProtocol::Shim6     => 7,
            _ => return None,
        };
        Some(ProtocolId::new(Class::Ipv6Extension, ordinal))
    }

    /// The id of a recorded TCP option, `None` for kinds that are skipped.
    pub fn tcp_option(kind: TcpOptionKind) -> Option<Self> {
        let ordinal = match kind {
            TcpOptionKind::EndOfList      => 0,
            TcpOptionKind::NoOperation    => 1,
            TcpOptionKind::MaxSegmentSize => 2,
            TcpOptionKind::WindowScale    => 3,
            TcpOptionKind::SackRange      => 5,
            TcpOptionKind::Timestamp      => 8,
            TcpOptionKind::FastOpen       => 30,
            _ => return None,
        };
        Some(ProtocolId::new(Class::TcpOption, ordinal))
    }

    fn name(self) -> Option<&'static str> {
        let name = match self {
            ProtocolId::ETHERNET => "ETHER",
            ProtocolId::LLC      => "LLC",
            ProtocolId::SNAP     => "SNAP",
            ProtocolId::ARP      => "ARP",
            ProtocolId::IPV4     => "IPv4",
            ProtocolId::IPV6     => "IPv6",
            ProtocolId::IPX      => "IPX",
            ProtocolId::TCP      => "TCP",
            ProtocolId::UDP      => "UDP",
            ProtocolId::ICMPV4   => "ICMPv4",
            ProtocolId::ICMPV6   => "ICMPv6",
            ProtocolId::GRE      => "GRE",
            ProtocolId::SCTP     => "SCTP",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(name) = self.name() {
            return f.write_str(name);
        }
        match self.class() {
            Class::Protocol => write!(f, "EXT-{}", self.ordinal()),
            Class::Ipv4Option => write!(f, "IPv4-OPT-{}", self.ordinal()),
            Class::Ipv6Extension => write!(f, "IPv6-EXT-{}", self.ordinal()),
            Class::TcpOption => write!(f, "TCP-OPT-{}", self.ordinal()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn class_and_ordinal() {
        let id = ProtocolId::new(Class::TcpOption, 8);
        assert_eq!(id.class(), Class::TcpOption);
        assert_eq!(id.ordinal(), 8);
        assert_eq!(ProtocolId::from_raw(id.raw()), Some(id));
        assert_eq!(ProtocolId::from_raw(0x80), None);
    }

    #[test]
    fn option_maps_are_distinct() {
        let ids = [
            ProtocolId::tcp_option(TcpOptionKind::EndOfList),
            ProtocolId::tcp_option(TcpOptionKind::NoOperation),
            ProtocolId::tcp_option(TcpOptionKind::MaxSegmentSize),
            ProtocolId::tcp_option(TcpOptionKind::WindowScale),
            ProtocolId::tcp_option(TcpOptionKind::SackRange),
            ProtocolId::tcp_option(TcpOptionKind::Timestamp),
            ProtocolId::tcp_option(TcpOptionKind::FastOpen),
        ];
        for (i, a) in ids.iter().enumerate() {
            assert!(a.is_some());
            for b in &ids[i+1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(ProtocolId::tcp_option(TcpOptionKind::SackPermitted), None);
        assert_eq!(ProtocolId::tcp_option(TcpOptionKind::Unknown(254)), None);
    }

    #[test]
    fn ipv4_option_ids() {
        let rr = ProtocolId::ipv4_option(Ipv4OptionType::RecordRoute);
        assert_eq!(rr.class(), Class::Ipv4Option);
        assert_eq!(rr.ordinal(), 7);
        assert_eq!(ProtocolId::ipv4_option(Ipv4OptionType::from(0x9e)).ordinal(), 30);
    }

    #[test]
    fn extension_ids() {
        let ext = ProtocolId::extension(1);
        assert_eq!(ext.class(), Class::Protocol);
        assert_eq!(ext.ordinal(), 17);
        assert!(ProtocolId::IPV4 < ext);
    }

    #[test]
    fn display_names() {
        assert_eq!(ProtocolId::IPV6.to_string(), "IPv6");
        assert_eq!(ProtocolId::extension(0).to_string(), "EXT-16");
        let hop = ProtocolId::ipv6_extension(IpProtocol::HopByHop).unwrap();
        assert_eq!(hop.to_string(), "IPv6-EXT-0");
    }
}
