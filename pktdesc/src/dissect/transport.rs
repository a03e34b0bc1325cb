use super::Dissector;
use crate::error::{Error, Result};
use crate::id::ProtocolId;
use crate::wire::icmp::{Icmpv6Layout, ICMPV4_HEADER_LEN};
use crate::wire::tcp::{self, OPTION_LENGTH_FIELD};
use crate::wire::transport::{SCTP_HEADER_LEN, UDP_HEADER_LEN};
use crate::wire::{gre_packet, icmp_packet, sctp_packet, tcp_packet, udp_packet};
use crate::wire::{EtherType, Icmpv6Type, IpProtocol, TcpOptionKind};
use crate::wire::{read_u8, tail};

impl Dissector<'_> {
    /// Dispatch the payload of an IP header or extension header chain.
    ///
    /// `parent` is the header whose protocol field is `protocol`, extensions for unrecognized
    /// protocols are looked up under it.
    pub(super) fn ip_payload(
        &mut self,
        data: &[u8],
        offset: usize,
        protocol: IpProtocol,
        parent: ProtocolId,
    ) -> Result<()> {
        match protocol {
            IpProtocol::Tcp => self.tcp(data, offset),
            IpProtocol::Udp => self.udp(data, offset),
            IpProtocol::Icmp => self.icmpv4(data, offset),
            IpProtocol::Icmpv6 => self.icmpv6(data, offset),
            IpProtocol::Gre => self.gre(data, offset),
            IpProtocol::Sctp => self.sctp(data, offset),
            IpProtocol::IpxInIp => self.ipx(data, offset),
            IpProtocol::IpInIp => self.nested(|this| this.ipv4(data, offset)),
            IpProtocol::Ipv6 => self.nested(|this| this.ipv6(data, offset)),
            IpProtocol::Ipv6NoNxt => Ok(()),
            other => {
                self.next_header(parent, data, offset, u8::from(other).into());
                Ok(())
            },
        }
    }

    fn tcp(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let segment = tcp_packet::new_checked(tail(data, offset))?;
        let header_len = segment.header_len();
        if header_len < tcp::HEADER_LEN {
            net_debug!("TCP header length {} at {} is malformed", header_len, offset);
            return Ok(());
        }
        if tail(data, offset).len() < header_len {
            return Err(Error::Truncated);
        }

        self.add_span(ProtocolId::TCP, offset, header_len);
        self.tcp_options(data, offset + tcp::HEADER_LEN, offset + header_len);

        let (src, dst) = (segment.src_port(), segment.dst_port());
        self.ports(ProtocolId::TCP, data, offset + header_len, src, dst);
        Ok(())
    }

    /// Scan the options between `start` and the end of the header at `end`.
    ///
    /// Kinds without an id are skipped by their length. The scan stops at the first option
    /// overrunning the header or with a malformed length.
    fn tcp_options(&mut self, data: &[u8], start: usize, end: usize) {
        let mut offset = start;
        while offset < end {
            let kind = match read_u8(data, offset) {
                Some(kind) => TcpOptionKind::from(kind),
                None => return,
            };

            let len = if kind.is_single_octet() {
                1
            } else {
                match read_u8(data, offset + OPTION_LENGTH_FIELD) {
                    Some(len) if len >= 2 => usize::from(len),
                    _ => return,
                }
            };

            if offset + len > end {
                return;
            }

            if let Some(id) = ProtocolId::tcp_option(kind) {
                self.record_option(id, offset, len);
            }
            offset += len;
        }
    }

    fn udp(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let datagram = udp_packet::new_checked(tail(data, offset))?;
        self.add_span(ProtocolId::UDP, offset, UDP_HEADER_LEN);

        let (src, dst) = (datagram.src_port(), datagram.dst_port());
        self.ports(ProtocolId::UDP, data, offset + UDP_HEADER_LEN, src, dst);
        Ok(())
    }

    fn sctp(&mut self, data: &[u8], offset: usize) -> Result<()> {
        sctp_packet::new_checked(tail(data, offset))?;
        self.add_span(ProtocolId::SCTP, offset, SCTP_HEADER_LEN);
        Ok(())
    }

    fn icmpv4(&mut self, data: &[u8], offset: usize) -> Result<()> {
        if tail(data, offset).len() < ICMPV4_HEADER_LEN {
            return Err(Error::Truncated);
        }
        self.add_span(ProtocolId::ICMPV4, offset, ICMPV4_HEADER_LEN);
        Ok(())
    }

    /// An ICMPv6 message, error messages continue with the datagram they quote.
    fn icmpv6(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let message = icmp_packet::new_checked(tail(data, offset))?;
        let msg_type = Icmpv6Type::from(message.msg_type());
        let layout = match msg_type.layout() {
            Some(layout) => layout,
            None => {
                net_trace!("ICMPv6 type {} at {} not dissected", msg_type, offset);
                return Ok(());
            },
        };

        let (len, embedded) = match layout {
            Icmpv6Layout::Embedded(len) => (len, true),
            Icmpv6Layout::Fixed(len) => (len, false),
        };
        if message.captured_len() < len {
            return Err(Error::Truncated);
        }

        self.add_span(ProtocolId::ICMPV6, offset, len);
        if embedded {
            self.nested(|this| this.ip(data, offset + len))
        } else {
            Ok(())
        }
    }

    /// A GRE header, its payload is typed by an ethertype.
    fn gre(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let header = gre_packet::new_checked(tail(data, offset))?;
        let len = header.header_len();
        let protocol = EtherType::from(header.protocol_type());
        if tail(data, offset).len() < len {
            return Err(Error::Truncated);
        }

        self.add_span(ProtocolId::GRE, offset, len);
        self.nested(|this| this.ethertype(data, offset + len, protocol))
    }
}
