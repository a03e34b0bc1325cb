/*! Protocol constants and bounds-checked header views.

The `wire` module knows the binary formats the dissector walks through. It provides two things:

 * Tag enumerations for the type fields that select the next header, e.g. [`EtherType`] or
   [`IpProtocol`]. They are open: every value the dissector does not act on is kept as `Unknown`
   so it can be forwarded to an extension.
 * Lowercase header views, e.g. [`ipv4_packet`] or [`tcp_packet`], wrapping the captured bytes
   starting at the header. The only way to get one is `new_checked` which fails with
   `Error::Truncated` unless the fixed part of the header is captured. Afterwards no accessor of
   the fixed part will panic. Accessors for the variable part (options, extension chains) are not
   provided; the dissector scans those itself with explicit bounds.

Every multi-octet field is read in network byte order, independent of the byte order requested
for the descriptor.

[`EtherType`]: enum.EtherType.html
[`IpProtocol`]: enum.IpProtocol.html
[`ipv4_packet`]: struct.ipv4_packet.html
[`tcp_packet`]: struct.tcp_packet.html
*/
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// Field layouts in parts from `smoltcp` originally distributed under 0-clause BSD

// Field names follow the RFCs, documenting each of them adds nothing.
#![allow(missing_docs)]

use byteorder::{ByteOrder, NetworkEndian};

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
}

pub mod arp;
pub mod ethernet;
pub mod gre;
pub mod icmp;
pub mod ip;
pub mod ipv4;
pub mod ipv6;
pub mod tcp;
pub mod transport;

pub use self::ethernet::{
    frame as ethernet_frame,
    EtherType};

pub use self::arp::arp as arp_packet;

pub use self::ip::Protocol as IpProtocol;

pub use self::ipv4::{
    ipv4 as ipv4_packet,
    OptionType as Ipv4OptionType};

pub use self::ipv6::ipv6 as ipv6_packet;

pub use self::tcp::{
    tcp as tcp_packet,
    OptionKind as TcpOptionKind};

pub use self::transport::{
    udp as udp_packet,
    sctp as sctp_packet,
    ipx as ipx_packet};

pub use self::gre::gre as gre_packet;

pub use self::icmp::{
    icmp as icmp_packet,
    Icmpv6Type};

/// The captured bytes from `offset` onwards, empty when `offset` lies beyond the capture.
pub(crate) fn tail(data: &[u8], offset: usize) -> &[u8] {
    data.get(offset..).unwrap_or(&[])
}

/// Read one octet, `None` when it was not captured.
pub(crate) fn read_u8(data: &[u8], offset: usize) -> Option<u8> {
    data.get(offset).copied()
}

/// Read a network endian `u16`, `None` when it was not fully captured.
pub(crate) fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    data.get(offset..end).map(NetworkEndian::read_u16)
}
