//! Single-pass packet dissection into a compact binary descriptor.
//!
//! ## Table of contents
//!
//! 1. [Overview](#overview)
//! 2. [The wire module](wire/index.html)
//! 3. [Protocol ids](id/index.html)
//! 4. [Spans and bitmasks](span/index.html)
//! 5. [The dissector](dissect/index.html)
//! 6. [Extensions](extension/index.html)
//! 7. [The descriptor format](descriptor/index.html)
//!
//! ## Overview
//!
//! A capture loop hands each packet to a [`Dissector`] once. It walks the headers from the link
//! layer inwards (Ethernet with its 802.3, LLC and SNAP variants, VLAN tags, ARP, IPv4 with
//! options, IPv6 with its extension header chain, IPX, TCP with options, UDP, SCTP, ICMP and GRE)
//! and records each as a [`Span`]: a protocol id with the offset and length of the header within
//! the capture. The spans and a few scalars are then written into a descriptor of at most
//! [`MAX_DESCRIPTOR_LEN`] octets that later stages use to find any header without parsing the
//! packet again.
//!
//! Protocols outside of this set are contributed by [`Extension`]s, for example the tunnel
//! protocols of `pktdesc-tunnel`.
//!
//! Nothing within `pktdesc` allocates memory. The record table has a fixed capacity, the
//! extension registry holds references, and encapsulated packets are entered up to a configured
//! depth only. Malformed and truncated packets are never an error: dissection stops at the first
//! header that was not captured and keeps what it found so far.
//!
//! [`Dissector`]: dissect/struct.Dissector.html
//! [`Span`]: span/struct.Span.html
//! [`MAX_DESCRIPTOR_LEN`]: descriptor/constant.MAX_DESCRIPTOR_LEN.html
//! [`Extension`]: extension/trait.Extension.html
#![warn(missing_docs)]
#![warn(unreachable_pub)]

// tests should be able to use `std`
#![cfg_attr(all(
    not(feature = "std"),
    not(test)),
no_std)]

#[macro_use] mod macros;
pub mod descriptor;
pub mod dissect;
pub mod error;
pub mod extension;
pub mod id;
pub mod span;
pub mod wire;

pub use self::descriptor::{Descriptor, Endian};
pub use self::dissect::{Config, Dissector, LinkType};
pub use self::error::{Error, Result};
pub use self::extension::{Extension, Recorder, Registry};
pub use self::id::ProtocolId;
pub use self::span::{Bitmask, Span};
