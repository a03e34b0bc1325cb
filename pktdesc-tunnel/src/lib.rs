//! Tunnel protocols for `pktdesc`.
//!
//! The core dissector stops at the payload of a UDP datagram or at an IP protocol number it does
//! not know. This crate contributes [`Extension`]s for the common overlay and IPsec encapsulations
//! on top of that:
//!
//! * [`Vxlan`] on UDP port 4789, continuing with the encapsulated Ethernet frame.
//! * [`Geneve`] on UDP port 6081, continuing with the payload selected by its protocol type.
//! * [`Esp`] as IP protocol 50 and, for NAT traversal, on UDP port 4500. The payload is
//!   encrypted so only the SPI and sequence number are recorded.
//!
//! Each gets an id from the extension range of the protocol class, so their presence shows up in
//! the bitmask of a descriptor.
//!
//! ```
//! use pktdesc::{Config, Dissector, Registry};
//!
//! let mut registry = Registry::new();
//! pktdesc_tunnel::register(&mut registry).unwrap();
//! let dissector = Dissector::with_extensions(Config::default(), &registry);
//! ```
//!
//! [`Extension`]: ../pktdesc/extension/trait.Extension.html
//! [`Vxlan`]: struct.Vxlan.html
//! [`Geneve`]: struct.Geneve.html
//! [`Esp`]: struct.Esp.html
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod wire;

use pktdesc::{Extension, ProtocolId, Recorder, Registry, Result};

use crate::wire::{esp, geneve, vxlan, ESP_HEADER_LEN, VXLAN_HEADER_LEN};

/// Id of a VXLAN header span.
pub const VXLAN: ProtocolId = ProtocolId::extension(0);

/// Id of a Geneve header span, options included.
pub const GENEVE: ProtocolId = ProtocolId::extension(1);

/// Id of an ESP header span.
pub const ESP: ProtocolId = ProtocolId::extension(2);

/// The IANA assigned VXLAN port.
pub const VXLAN_PORT: u16 = 4789;

/// The IANA assigned Geneve port.
pub const GENEVE_PORT: u16 = 6081;

/// The port of UDP encapsulated ESP.
pub const IPSEC_NAT_T_PORT: u16 = 4500;

const IP_PROTOCOL_ESP: u16 = 50;

static VXLAN_MODULE: Vxlan = Vxlan::new();
static GENEVE_MODULE: Geneve = Geneve::new();
static ESP_MODULE: Esp = Esp;

/// Register all modules of this crate with their default ports.
///
/// Takes five slots of the registry: VXLAN and Geneve under `UDP`, ESP under `IPV4`, `IPV6` and
/// `UDP`.
pub fn register(registry: &mut Registry<'_>) -> Result<()> {
    registry.register(ProtocolId::UDP, &VXLAN_MODULE)?;
    registry.register(ProtocolId::UDP, &GENEVE_MODULE)?;
    registry.register(ProtocolId::IPV4, &ESP_MODULE)?;
    registry.register(ProtocolId::IPV6, &ESP_MODULE)?;
    registry.register(ProtocolId::UDP, &ESP_MODULE)?;
    Ok(())
}

/// Virtual extensible LAN, RFC 7348.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vxlan {
    port: u16,
}

/// Generic network virtualization encapsulation, RFC 8926.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geneve {
    port: u16,
}

/// IPsec encapsulating security payload, RFC 4303.
///
/// Recognized as an IP protocol when registered under `IPV4` or `IPV6` and within UDP on port
/// 4500 when registered under `UDP`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Esp;

impl Vxlan {
    /// Recognize VXLAN on its assigned port.
    pub const fn new() -> Self {
        Vxlan::with_port(VXLAN_PORT)
    }

    /// Recognize VXLAN on a custom destination port.
    pub const fn with_port(port: u16) -> Self {
        Vxlan { port }
    }
}

impl Geneve {
    /// Recognize Geneve on its assigned port.
    pub const fn new() -> Self {
        Geneve::with_port(GENEVE_PORT)
    }

    /// Recognize Geneve on a custom destination port.
    pub const fn with_port(port: u16) -> Self {
        Geneve { port }
    }
}

impl Default for Vxlan {
    fn default() -> Self {
        Vxlan::new()
    }
}

impl Default for Geneve {
    fn default() -> Self {
        Geneve::new()
    }
}

impl Extension for Vxlan {
    fn dissect_ports(
        &self,
        recorder: &mut dyn Recorder,
        data: &[u8],
        offset: usize,
        _: ProtocolId,
        _: u16,
        dst_port: u16,
    ) {
        if dst_port != self.port {
            return;
        }

        let header = match vxlan::new_checked(tail(data, offset)) {
            Ok(header) => header,
            Err(_) => return,
        };

        if header.has_vni() && recorder.add_span(VXLAN, offset, VXLAN_HEADER_LEN) {
            recorder.dissect_ethernet(data, offset + VXLAN_HEADER_LEN);
        }
    }
}

impl Extension for Geneve {
    fn dissect_ports(
        &self,
        recorder: &mut dyn Recorder,
        data: &[u8],
        offset: usize,
        _: ProtocolId,
        _: u16,
        dst_port: u16,
    ) {
        if dst_port != self.port {
            return;
        }

        let header = match geneve::new_checked(tail(data, offset)) {
            Ok(header) => header,
            Err(_) => return,
        };

        if header.version() != geneve::VERSION {
            return;
        }

        // Fails when the options were not captured completely.
        let len = header.header_len();
        if recorder.add_span(GENEVE, offset, len) {
            recorder.dissect_ethertype(data, offset + len, header.protocol_type());
        }
    }
}

impl Esp {
    fn record(recorder: &mut dyn Recorder, data: &[u8], offset: usize) {
        match esp::new_checked(tail(data, offset)) {
            // A zero SPI marks IKE traffic sharing the NAT traversal port.
            Ok(header) if header.spi() != 0 => {
                recorder.add_span(ESP, offset, ESP_HEADER_LEN);
            },
            _ => (),
        }
    }
}

impl Extension for Esp {
    fn dissect_ports(
        &self,
        recorder: &mut dyn Recorder,
        data: &[u8],
        offset: usize,
        id: ProtocolId,
        src_port: u16,
        dst_port: u16,
    ) {
        let nat_traversal = src_port == IPSEC_NAT_T_PORT || dst_port == IPSEC_NAT_T_PORT;
        if id == ProtocolId::UDP && nat_traversal {
            Esp::record(recorder, data, offset);
        }
    }

    fn dissect_next_header(
        &self,
        recorder: &mut dyn Recorder,
        data: &[u8],
        offset: usize,
        _: ProtocolId,
        next_header: u16,
    ) {
        if next_header == IP_PROTOCOL_ESP {
            Esp::record(recorder, data, offset);
        }
    }
}

fn tail(data: &[u8], offset: usize) -> &[u8] {
    data.get(offset..).unwrap_or(&[])
}
