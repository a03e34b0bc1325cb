use core::fmt;

/// Internet protocol version.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Version {
    Ipv4,
    Ipv6,
}

impl Version {
    /// Return the version of an IP packet starting with the given octet.
    ///
    /// Other versions are not dissected and result in `None`.
    pub fn of_first_octet(octet: u8) -> Option<Version> {
        match octet >> 4 {
            4 => Some(Version::Ipv4),
            6 => Some(Version::Ipv6),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Version::Ipv4 => write!(f, "IPv4"),
            Version::Ipv6 => write!(f, "IPv6"),
        }
    }
}

enum_with_unknown! {
    /// IP datagram encapsulated protocol, also the IPv6 next header.
    pub enum Protocol(u8) {
        HopByHop  = 0x00,
        Icmp      = 0x01,
        IpInIp    = 0x04,
        Tcp       = 0x06,
        Udp       = 0x11,
        Ipv6      = 0x29,
        Ipv6Route = 0x2b,
        Ipv6Frag  = 0x2c,
        Gre       = 0x2f,
        Esp       = 0x32,
        Ah        = 0x33,
        Icmpv6    = 0x3a,
        Ipv6NoNxt = 0x3b,
        Ipv6Opts  = 0x3c,
        IpxInIp   = 0x6f,
        Sctp      = 0x84,
        Mobility  = 0x87,
        Hip       = 0x8b,
        Shim6     = 0x8c,
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Protocol::HopByHop    => write!(f, "Hop-by-Hop"),
            Protocol::Icmp        => write!(f, "ICMP"),
            Protocol::IpInIp      => write!(f, "IPv4-in-IP"),
            Protocol::Tcp         => write!(f, "TCP"),
            Protocol::Udp         => write!(f, "UDP"),
            Protocol::Ipv6        => write!(f, "IPv6-in-IP"),
            Protocol::Ipv6Route   => write!(f, "IPv6-Route"),
            Protocol::Ipv6Frag    => write!(f, "IPv6-Frag"),
            Protocol::Gre         => write!(f, "GRE"),
            Protocol::Esp         => write!(f, "ESP"),
            Protocol::Ah          => write!(f, "AH"),
            Protocol::Icmpv6      => write!(f, "ICMPv6"),
            Protocol::Ipv6NoNxt   => write!(f, "IPv6-NoNxt"),
            Protocol::Ipv6Opts    => write!(f, "IPv6-Opts"),
            Protocol::IpxInIp     => write!(f, "IPX-in-IP"),
            Protocol::Sctp        => write!(f, "SCTP"),
            Protocol::Mobility    => write!(f, "Mobility"),
            Protocol::Hip         => write!(f, "HIP"),
            Protocol::Shim6       => write!(f, "Shim6"),
            Protocol::Unknown(id) => write!(f, "0x{:02x}", id)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn version_nibble() {
        assert_eq!(Version::of_first_octet(0x45), Some(Version::Ipv4));
        assert_eq!(Version::of_first_octet(0x60), Some(Version::Ipv6));
        assert_eq!(Version::of_first_octet(0x50), None);
    }

    #[test]
    fn protocol_roundtrip_unknown() {
        assert_eq!(Protocol::from(0x2f), Protocol::Gre);
        assert_eq!(Protocol::from(0xfd), Protocol::Unknown(0xfd));
        assert_eq!(u8::from(Protocol::Unknown(0xfd)), 0xfd);
    }
}
