use super::Dissector;
use crate::error::{Error, Result};
use crate::id::ProtocolId;
use crate::wire::ip::Version;
use crate::wire::ipv6::{self, ExtensionLength};
use crate::wire::transport::IPX_HEADER_LEN;
use crate::wire::{ipv4, ipv4_packet, ipv6_packet, ipx_packet, IpProtocol, Ipv4OptionType};
use crate::wire::{read_u8, tail};

/// The outcome of walking an IPv6 extension header chain.
struct Chain {
    /// The header following the chain.
    next: IpProtocol,
    /// Octets covered by the chain.
    len: usize,
    /// No fragment header, or one with offset zero.
    first_fragment: bool,
    /// The chain ended at a non-extension header instead of the end of the capture.
    complete: bool,
}

impl Dissector<'_> {
    /// An IP packet of either version, selected by its first nibble.
    pub(super) fn ip(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let first = read_u8(data, offset).ok_or(Error::Truncated)?;
        match Version::of_first_octet(first) {
            Some(Version::Ipv4) => self.ipv4(data, offset),
            Some(Version::Ipv6) => self.ipv6(data, offset),
            None => {
                net_debug!("no IP version in octet {:#04x} at {}", first, offset);
                Ok(())
            },
        }
    }

    pub(super) fn ipv4(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let packet = ipv4_packet::new_checked(tail(data, offset))?;
        let header_len = packet.header_len();
        if header_len < ipv4::HEADER_LEN {
            net_debug!("IPv4 header length {} at {} is malformed", header_len, offset);
            return Ok(());
        }
        // Options of a header that was not captured completely are not scanned.
        if tail(data, offset).len() < header_len {
            return Err(Error::Truncated);
        }

        self.add_span(ProtocolId::IPV4, offset, header_len);
        self.ipv4_options(data, offset + ipv4::HEADER_LEN, offset + header_len);

        if packet.is_fragment() {
            self.set_fragment(!packet.more_frags());
        }
        // Only the first fragment carries the transport header.
        if packet.frag_offset() != 0 {
            return Ok(());
        }

        self.ip_payload(data, offset + header_len, packet.protocol(), ProtocolId::IPV4)
    }

    /// Scan the options between `start` and the end of the header at `end`.
    ///
    /// The scan stops at the first option overrunning the header or with a malformed length.
    fn ipv4_options(&mut self, data: &[u8], start: usize, end: usize) {
        let mut offset = start;
        while offset < end {
            let kind = match read_u8(data, offset) {
                Some(kind) => Ipv4OptionType::from(kind),
                None => return,
            };

            let len = if kind.is_single_octet() {
                1
            } else {
                match read_u8(data, offset + 1) {
                    Some(len) if len >= 2 => usize::from(len),
                    _ => return,
                }
            };

            if offset + len > end {
                return;
            }

            self.record_option(ProtocolId::ipv4_option(kind), offset, len);
            offset += len;
        }
    }

    /// An IPv6 packet and its extension header chain.
    ///
    /// The IPv6 span is recorded before the chain is known and afterwards widened to cover it.
    pub(super) fn ipv6(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let packet = ipv6_packet::new_checked(tail(data, offset))?;
        let base = self.record_base(offset);
        let start = offset + ipv6::HEADER_LEN;
        let chain = self.ipv6_chain(data, start, packet.next_header());

        if let Some(index) = base {
            if chain.len > 0 {
                self.update_span(index, ProtocolId::IPV6, offset, ipv6::HEADER_LEN + chain.len);
            }
        }

        if !chain.complete {
            return Err(Error::Truncated);
        }
        if !chain.first_fragment {
            return Ok(());
        }

        self.ip_payload(data, start + chain.len, chain.next, ProtocolId::IPV6)
    }

    fn record_base(&mut self, offset: usize) -> Option<usize> {
        let index = self.record_count();
        if self.add_span(ProtocolId::IPV6, offset, ipv6::HEADER_LEN) {
            Some(index)
        } else {
            None
        }
    }

    fn ipv6_chain(&mut self, data: &[u8], start: usize, mut next: IpProtocol) -> Chain {
        let mut len = 0;
        let mut first_fragment = true;

        while let Some(kind) = ipv6::extension_length(next) {
            let offset = start + len;
            let ext = tail(data, offset);
            let (following, ext_len) = match ipv6::extension_header(ext, kind) {
                Some(header) => header,
                None => return Chain { next, len, first_fragment, complete: false },
            };

            if kind == ExtensionLength::Fixed {
                if let Some((frag_offset, more)) = ipv6::fragment_offset_more(ext) {
                    self.set_fragment(!more);
                    first_fragment = frag_offset == 0;
                }
            } else if let Some(id) = ProtocolId::ipv6_extension(next) {
                self.record_option(id, offset, ext_len);
            }

            len += ext_len;
            next = following;
        }

        Chain { next, len, first_fragment, complete: true }
    }

    pub(super) fn ipx(&mut self, data: &[u8], offset: usize) -> Result<()> {
        ipx_packet::new_checked(tail(data, offset))?;
        self.add_span(ProtocolId::IPX, offset, IPX_HEADER_LEN);
        Ok(())
    }
}
