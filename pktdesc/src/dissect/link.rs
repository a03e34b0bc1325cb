use super::{Dissector, LinkType};
use crate::descriptor::L2Type;
use crate::error::{Error, Result};
use crate::id::ProtocolId;
use crate::wire::{arp_packet, ethernet_frame, EtherType};
use crate::wire::ethernet::{self, LLC_HEADER_LEN, LLC_SAP_IPX, LLC_SAP_SNAP, SNAP_HEADER_LEN};
use crate::wire::{read_u16, tail};

/// Offset of the ethertype within the SNAP header, after the organization code.
const SNAP_ETHERTYPE: usize = 3;

impl Dissector<'_> {
    pub(super) fn link(&mut self, data: &[u8]) -> Result<()> {
        match self.config.link {
            LinkType::Ethernet => self.ethernet(data, 0),
            LinkType::RawIp => {
                self.set_l2_type(L2Type::RawIp);
                self.ip(data, 0)
            },
        }
    }

    /// An Ethernet II or 802.3 frame, VLAN tags are part of the Ethernet span.
    pub(super) fn ethernet(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let frame = ethernet_frame::new_checked(tail(data, offset))?;
        if frame.is_8023() {
            let novell = frame.is_novell_raw();
            let saps = frame.llc_saps();
            return self.ieee8023(data, offset, novell, saps);
        }

        let mut len = ethernet::HEADER_LEN;
        let mut ethertype = EtherType::from(frame.type_len());
        while let EtherType::Vlan | EtherType::QinQ = ethertype {
            // The tag control information precedes the inner type.
            match read_u16(data, offset + len + 2) {
                Some(inner) => {
                    len += ethernet::VLAN_TAG_LEN;
                    ethertype = EtherType::from(inner);
                },
                None => {
                    self.add_span(ProtocolId::ETHERNET, offset, len);
                    return Err(Error::Truncated);
                },
            }
        }

        self.add_span(ProtocolId::ETHERNET, offset, len);
        self.ethertype(data, offset + len, ethertype)
    }

    fn ieee8023(&mut self, data: &[u8], offset: usize, novell: bool, saps: Option<(u8, u8)>)
        -> Result<()>
    {
        self.add_span(ProtocolId::ETHERNET, offset, ethernet::HEADER_LEN);
        let llc = offset + ethernet::HEADER_LEN;

        if novell {
            self.set_l2_type(L2Type::NovellRaw);
            return self.ipx(data, llc);
        }

        if tail(data, llc).len() < LLC_HEADER_LEN {
            return Err(Error::Truncated);
        }
        let (dsap, ssap) = saps.ok_or(Error::Truncated)?;
        self.set_l2_type(L2Type::Llc);
        self.add_span(ProtocolId::LLC, llc, LLC_HEADER_LEN);

        let snap = llc + LLC_HEADER_LEN;
        match (dsap, ssap) {
            (LLC_SAP_SNAP, LLC_SAP_SNAP) => {
                let ethertype = read_u16(data, snap + SNAP_ETHERTYPE)
                    .ok_or(Error::Truncated)?;
                self.set_l2_type(L2Type::Snap);
                self.add_span(ProtocolId::SNAP, snap, SNAP_HEADER_LEN);
                self.ethertype(data, snap + SNAP_HEADER_LEN, EtherType::from(ethertype))
            },
            (LLC_SAP_IPX, _) => self.ipx(data, snap),
            _ => Ok(()),
        }
    }

    /// Dispatch the payload of a link layer or GRE header.
    pub(super) fn ethertype(&mut self, data: &[u8], offset: usize, ethertype: EtherType)
        -> Result<()>
    {
        match ethertype {
            EtherType::Ipv4 => self.ipv4(data, offset),
            EtherType::Ipv6 => self.ipv6(data, offset),
            EtherType::Arp | EtherType::Rarp => self.arp(data, offset),
            EtherType::Ipx => self.ipx(data, offset),
            EtherType::TransparentBridging => self.nested(|this| this.ethernet(data, offset)),
            other => {
                self.next_header(ProtocolId::ETHERNET, data, offset, other.into());
                Ok(())
            },
        }
    }

    fn arp(&mut self, data: &[u8], offset: usize) -> Result<()> {
        let packet = arp_packet::new_checked(tail(data, offset))?;
        self.add_span(ProtocolId::ARP, offset, packet.header_len());
        Ok(())
    }
}
