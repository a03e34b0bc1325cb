use crate::id::{Class, ProtocolId};
use crate::span::Bitmask;

/// The framing at the start of a capture.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum LinkType {
    /// Ethernet II, or 802.3 with LLC, SNAP or Novell raw framing.
    Ethernet,
    /// The capture starts directly with an IPv4 or IPv6 header.
    RawIp,
}

/// Recording policy of a [`Dissector`].
///
/// The configuration is a plain value. It can be replaced between two packets, the new default
/// bitmask then applies from the next `reset`.
///
/// [`Dissector`]: struct.Dissector.html
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Config {
    /// The link layer of the captures.
    pub link: LinkType,

    /// The bitmask each packet starts with.
    pub default_bitmask: Bitmask,

    /// Record spans for IPv4 options, IPv6 extension headers and TCP options.
    ///
    /// The headers containing them are recorded either way.
    pub record_extensions: bool,

    /// IPv4 options not to record, by option ordinal.
    pub ipv4_disable: Bitmask,

    /// IPv6 extension headers not to record, by extension ordinal.
    pub ipv6_disable: Bitmask,

    /// TCP options not to record, by option ordinal.
    pub tcp_disable: Bitmask,

    /// How many encapsulated packets may be entered below the outermost one.
    ///
    /// Embedded ICMPv6 datagrams, GRE payloads, IP-in-IP and tunnels found by extensions each
    /// count as one level.
    pub max_depth: u8,
}

impl Config {
    /// The default configuration for the given link layer.
    pub fn new(link: LinkType) -> Self {
        Config {
            link,
            default_bitmask: Bitmask::EMPTY,
            record_extensions: true,
            ipv4_disable: Bitmask::EMPTY,
            ipv6_disable: Bitmask::EMPTY,
            tcp_disable: Bitmask::EMPTY,
            max_depth: 4,
        }
    }

    /// Report every protocol as present in every descriptor.
    pub fn disable_bitmask_recording(&mut self) {
        self.default_bitmask = Bitmask::ALL;
    }

    /// Stop recording spans for options and extension headers of all classes.
    pub fn disable_extension_recording_for_all(&mut self) {
        self.record_extensions = false;
    }

    /// Stop recording spans for some options or extension headers of one class.
    ///
    /// An empty list of `ids` disables the whole class. Ids of other classes are ignored, the
    /// `Protocol` class has no disable mask and is ignored altogether.
    pub fn disable_extension(&mut self, class: Class, ids: &[ProtocolId]) {
        let mask = match class {
            Class::Ipv4Option => &mut self.ipv4_disable,
            Class::Ipv6Extension => &mut self.ipv6_disable,
            Class::TcpOption => &mut self.tcp_disable,
            Class::Protocol => return,
        };

        if ids.is_empty() {
            *mask = Bitmask::ALL;
            return;
        }

        for &id in ids.iter().filter(|id| id.class() == class) {
            mask.insert(id);
        }
    }

    /// The disable mask applying to ids of `class`.
    pub(crate) fn disabled(&self, class: Class) -> Bitmask {
        match class {
            Class::Ipv4Option => self.ipv4_disable,
            Class::Ipv6Extension => self.ipv6_disable,
            Class::TcpOption => self.tcp_disable,
            Class::Protocol => Bitmask::EMPTY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(LinkType::Ethernet)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::wire::{IpProtocol, TcpOptionKind};

    #[test]
    fn disable_selected() {
        let mut config = Config::default();
        let sack = ProtocolId::tcp_option(TcpOptionKind::SackRange).unwrap();
        let hop = ProtocolId::ipv6_extension(IpProtocol::HopByHop).unwrap();
        config.disable_extension(Class::TcpOption, &[sack, hop]);
        assert!(config.tcp_disable.test(sack));
        assert_eq!(config.tcp_disable.bits(), 1 << 5);
        assert!(config.ipv6_disable.is_empty());
        assert_eq!(config.disabled(Class::TcpOption), config.tcp_disable);
    }

    #[test]
    fn disable_class() {
        let mut config = Config::default();
        config.disable_extension(Class::Ipv4Option, &[]);
        assert_eq!(config.ipv4_disable, Bitmask::ALL);
        config.disable_extension(Class::Protocol, &[]);
        assert_eq!(config.disabled(Class::Protocol), Bitmask::EMPTY);
        assert!(config.record_extensions);
        config.disable_extension_recording_for_all();
        assert!(!config.record_extensions);
    }
}
