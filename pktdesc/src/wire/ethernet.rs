use core::fmt;
use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};

enum_with_unknown! {
    /// Ethernet protocol type.
    pub enum EtherType(u16) {
        Ipv4 = 0x0800,
        Arp  = 0x0806,
        TransparentBridging = 0x6558,
        Rarp = 0x8035,
        Vlan = 0x8100,
        Ipx  = 0x8137,
        Ipv6 = 0x86DD,
        QinQ = 0x88A8,
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EtherType::Ipv4 => write!(f, "IPv4"),
            EtherType::Ipv6 => write!(f, "IPv6"),
            EtherType::Arp  => write!(f, "ARP"),
            EtherType::Rarp => write!(f, "RARP"),
            EtherType::Ipx  => write!(f, "IPX"),
            EtherType::Vlan => write!(f, "802.1Q"),
            EtherType::QinQ => write!(f, "802.1ad"),
            EtherType::TransparentBridging => write!(f, "TEB"),
            EtherType::Unknown(id) => write!(f, "0x{:04x}", id)
        }
    }
}

/// Length of the Ethernet II header without tags.
pub const HEADER_LEN: usize = 14;

/// Length of one 802.1Q or 802.1ad tag.
pub const VLAN_TAG_LEN: usize = 4;

/// Largest value of the type field that is an 802.3 length instead of an ethertype.
pub const MAX_8023_LENGTH: u16 = 1500;

/// The two octets following the 802.3 length of a Novell raw IPX frame.
pub const NOVELL_RAW_MARKER: u16 = 0xffff;

/// Length of an 802.2 LLC header with an unnumbered control field.
pub const LLC_HEADER_LEN: usize = 3;

/// Length of the SNAP extension following an LLC header.
pub const SNAP_HEADER_LEN: usize = 5;

/// DSAP and SSAP of an LLC header followed by SNAP.
pub const LLC_SAP_SNAP: u8 = 0xaa;

/// DSAP of an LLC header carrying IPX.
pub const LLC_SAP_IPX: u8 = 0xe0;

byte_wrapper! {
    /// A byte sequence representing an Ethernet II or 802.3 frame.
    #[derive(Debug, PartialEq, Eq)]
    pub struct frame([u8]);
}

mod field {
    use crate::wire::field::Field;

    pub(crate) const DESTINATION: Field =  0..6;
    pub(crate) const SOURCE:      Field =  6..12;
    pub(crate) const ETHERTYPE:   Field = 12..14;
    pub(crate) const LLC_DSAP:    usize = 14;
    pub(crate) const LLC_SSAP:    usize = 15;
    pub(crate) const NOVELL_RAW:  Field = 14..16;
}

impl frame {
    /// Imbue a captured byte sequence with Ethernet structure.
    ///
    /// Returns `Err(Error::Truncated)` if the header is not fully captured.
    pub fn new_checked(data: &[u8]) -> Result<&frame> {
        if data.len() < HEADER_LEN {
            return Err(Error::Truncated);
        }
        Ok(Self::__from_macro_new_unchecked(data))
    }

    /// Return the destination address field.
    pub fn dst_addr(&self) -> [u8; 6] {
        let mut addr = [0; 6];
        addr.copy_from_slice(&self.0[field::DESTINATION]);
        addr
    }

    /// Return the source address field.
    pub fn src_addr(&self) -> [u8; 6] {
        let mut addr = [0; 6];
        addr.copy_from_slice(&self.0[field::SOURCE]);
        addr
    }

    /// Return the raw type/length field.
    ///
    /// Values up to [`MAX_8023_LENGTH`] are an 802.3 payload length.
    ///
    /// [`MAX_8023_LENGTH`]: constant.MAX_8023_LENGTH.html
    pub fn type_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.0[field::ETHERTYPE])
    }

    /// Query whether the type field is an 802.3 length.
    pub fn is_8023(&self) -> bool {
        self.type_len() <= MAX_8023_LENGTH
    }

    /// Return the LLC service access points, if captured.
    pub fn llc_saps(&self) -> Option<(u8, u8)> {
        let dsap = *self.0.get(field::LLC_DSAP)?;
        let ssap = *self.0.get(field::LLC_SSAP)?;
        Some((dsap, ssap))
    }

    /// Query whether an 802.3 frame is a Novell raw IPX frame.
    pub fn is_novell_raw(&self) -> bool {
        self.0.get(field::NOVELL_RAW)
            .map(NetworkEndian::read_u16)
            == Some(NOVELL_RAW_MARKER)
    }
}

impl AsRef<[u8]> for frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static FRAME_BYTES: [u8; 16] =
        [0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
         0x00, 0x07, 0x0d, 0xaf, 0xf4, 0x54,
         0x08, 0x06,
         0x00, 0x01];

    #[test]
    fn test_deconstruct() {
        let eth = frame::new_checked(&FRAME_BYTES[..]).unwrap();
        assert_eq!(eth.dst_addr(), [0xff; 6]);
        assert_eq!(eth.src_addr(), [0x00, 0x07, 0x0d, 0xaf, 0xf4, 0x54]);
        assert_eq!(EtherType::from(eth.type_len()), EtherType::Arp);
        assert!(!eth.is_8023());
    }

    #[test]
    fn test_truncated() {
        assert_eq!(frame::new_checked(&FRAME_BYTES[..13]), Err(Error::Truncated));
    }

    #[test]
    fn test_novell_raw() {
        let mut bytes = FRAME_BYTES;
        bytes[12..14].copy_from_slice(&[0x00, 0x40]);
        bytes[14..16].copy_from_slice(&[0xff, 0xff]);
        let eth = frame::new_checked(&bytes[..]).unwrap();
        assert!(eth.is_8023());
        assert!(eth.is_novell_raw());
        assert_eq!(eth.llc_saps(), Some((0xff, 0xff)));
    }
}
