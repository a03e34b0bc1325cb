//! The dissection engine.
//!
//! A [`Dissector`] walks the headers of one captured packet from the link layer inwards and
//! records a [`Span`] for every header, option and extension header it identifies. Next to the
//! spans it keeps the scalar state that ends up in the descriptor: lengths, timestamp, ports,
//! fragmentation flags and the protocol bitmask.
//!
//! ## Lifecycle
//!
//! A dissector is meant to be reused. Call [`reset`] before each packet, optionally set the
//! externally known scalars (ports, hash, transmit flags), then [`dissect`] the packet and write
//! the descriptor with [`write_descriptor`]. Nothing is allocated during any of these steps.
//!
//! ```
//! use pktdesc::descriptor::{Endian, MAX_DESCRIPTOR_LEN};
//! use pktdesc::dissect::{Config, Dissector};
//!
//! let frame = [0u8; 60];
//! let mut dissector = Dissector::new(Config::default());
//! let mut descriptor = [0; MAX_DESCRIPTOR_LEN];
//!
//! dissector.reset();
//! dissector.dissect(&frame, frame.len(), frame.len(), 0);
//! let len = dissector.write_descriptor(&mut descriptor, Endian::native()).unwrap();
//! assert_eq!(len, 24 + 4 * dissector.record_count());
//! ```
//!
//! ## Malformed packets
//!
//! Every header is checked against the captured length before it is read. A header that was not
//! fully captured ends the dissection of its branch, the spans recorded up to this point remain
//! valid. No span ever extends past the capture. Once the record table is full further spans are
//! dropped while the walk itself continues for the scalar state.
//!
//! [`Dissector`]: struct.Dissector.html
//! [`Span`]: ../span/struct.Span.html
//! [`reset`]: struct.Dissector.html#method.reset
//! [`dissect`]: struct.Dissector.html#method.dissect
//! [`write_descriptor`]: struct.Dissector.html#method.write_descriptor
use core::convert::TryFrom;

use crate::descriptor::{self, Endian, Header, L2Type, TxFlags, MAX_RECORDS};
use crate::error::Result;
use crate::extension::{Recorder, Registry};
use crate::id::{Class, ProtocolId};
use crate::span::{Bitmask, Span};
use crate::wire::EtherType;

mod config;
mod link;
mod network;
mod transport;


pub use self::config::{Config, LinkType};

/// Walks packets and records their structure.
///
/// See the [module documentation] for the intended use.
///
/// [module documentation]: index.html
pub struct Dissector<'a> {
    config: Config,
    extensions: Option<&'a Registry<'a>>,
    header: Header,
    capture_len: usize,
    wire_len: usize,
    records: [u32; MAX_RECORDS],
    count: usize,
    depth: u8,
}

impl<'a> Dissector<'a> {
    /// Create a dissector without extensions.
    pub fn new(config: Config) -> Self {
        Dissector {
            config,
            extensions: None,
            header: Header {
                bitmask: config.default_bitmask,
                ..Header::default()
            },
            capture_len: 0,
            wire_len: 0,
            records: [0; MAX_RECORDS],
            count: 0,
            depth: 0,
        }
    }

    /// Create a dissector consulting the extensions of `registry`.
    pub fn with_extensions(config: Config, registry: &'a Registry<'a>) -> Self {
        Dissector {
            extensions: Some(registry),
            ..Dissector::new(config)
        }
    }

    /// The recording policy.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the recording policy.
    ///
    /// A changed default bitmask applies from the next `reset`.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Report every protocol as present, from the current packet on.
    pub fn disable_bitmask_recording(&mut self) {
        self.config.disable_bitmask_recording();
        self.header.bitmask = self.config.default_bitmask;
    }

    /// Clear all state of the previous packet.
    ///
    /// The bitmask is set to the default bitmask of the configuration.
    pub fn reset(&mut self) {
        self.header = Header {
            bitmask: self.config.default_bitmask,
            ..Header::default()
        };
        self.capture_len = 0;
        self.wire_len = 0;
        self.records = [0; MAX_RECORDS];
        self.count = 0;
        self.depth = 0;
    }

    /// Dissect one packet.
    ///
    /// The first `capture_len` octets of `buffer` are the capture, the frame was `wire_len`
    /// octets long on the wire. Span offsets are relative to the start of `buffer`. The dissector
    /// should be `reset` before, otherwise the spans are appended to those of the previous
    /// packet.
    ///
    /// # Panics
    ///
    /// This function panics if `capture_len` exceeds the buffer or `wire_len` is smaller than
    /// `capture_len`.
    pub fn dissect(&mut self, buffer: &[u8], capture_len: usize, wire_len: usize, timestamp: u64) {
        assert!(capture_len <= buffer.len(),
            "capture length {} exceeds the buffer of {} octets", capture_len, buffer.len());
        assert!(wire_len >= capture_len,
            "wire length {} is shorter than the capture length {}", wire_len, capture_len);

        let data = &buffer[..capture_len];
        self.capture_len = capture_len;
        self.wire_len = wire_len;
        self.header.timestamp = timestamp;

        if let Err(err) = self.link(data) {
            net_trace!("dissection of {} octet capture stopped: {}", capture_len, err);
        }
    }

    /// Record a span.
    ///
    /// Returns `false` and records nothing if the table is full, if the span extends past the
    /// capture or if it does not fit the span word. A recorded id of the `Protocol` class is
    /// added to the bitmask.
    pub fn add_span(&mut self, id: ProtocolId, offset: usize, length: usize) -> bool {
        self.record(Span::new(id, offset, length)).is_some()
    }

    /// Replace the span at `index` of the table.
    ///
    /// Fails like `add_span`, in addition when `index` is not occupied.
    pub fn update_span(&mut self, index: usize, id: ProtocolId, offset: usize, length: usize)
        -> bool
    {
        if index >= self.count {
            return false;
        }
        let span = Span::new(id, offset, length);
        match self.admit(span) {
            Some(word) => {
                self.records[index] = word;
                true
            },
            None => false,
        }
    }

    /// Set the flow hash and the algorithm that computed it.
    pub fn set_hash(&mut self, hash: u32, hash_type: u8) {
        self.header.hash = hash;
        self.header.hash_type = hash_type;
    }

    /// Set the port the packet was received on.
    pub fn set_rx_port(&mut self, port: u8) {
        self.header.rx_port = port;
    }

    /// Set the port the packet should be sent on.
    pub fn set_tx_port(&mut self, port: u8) {
        self.header.tx_port = port;
    }

    /// Set the transmit control flags.
    pub fn set_tx_flags(&mut self, flags: TxFlags) {
        self.header.tx_flags = flags;
    }

    /// The number of recorded spans.
    pub fn record_count(&self) -> usize {
        self.count
    }

    /// The recorded span words.
    pub fn records(&self) -> &[u32] {
        &self.records[..self.count]
    }

    /// Iterate over the recorded spans.
    pub fn spans(&self) -> impl Iterator<Item=Span> + '_ {
        self.records().iter().map(|&word| Span::decode(word))
    }

    /// The protocols found so far.
    pub fn bitmask(&self) -> Bitmask {
        self.header.bitmask
    }

    /// The number of captured octets.
    pub fn capture_len(&self) -> usize {
        self.capture_len
    }

    /// The number of octets of the frame on the wire.
    pub fn wire_len(&self) -> usize {
        self.wire_len
    }

    /// The link layer framing found.
    pub fn l2_type(&self) -> L2Type {
        self.header.l2_type
    }

    /// Query whether the packet is an IP fragment.
    pub fn is_fragment(&self) -> bool {
        self.header.is_fragment
    }

    /// Query whether the packet is the last fragment of its datagram.
    pub fn is_last_fragment(&self) -> bool {
        self.header.is_last_fragment
    }

    /// The scalar descriptor content.
    ///
    /// Lengths beyond the 16 bit descriptor fields are reported as `u16::MAX`.
    pub fn header(&self) -> Header {
        Header {
            capture_len: saturate(self.capture_len),
            wire_len: saturate(self.wire_len),
            ..self.header
        }
    }

    /// Write the descriptor with the field setters.
    ///
    /// Returns the number of octets written, see [`descriptor::write_layout`].
    ///
    /// [`descriptor::write_layout`]: ../descriptor/fn.write_layout.html
    pub fn write_descriptor(&self, out: &mut [u8], endian: Endian) -> Result<usize> {
        descriptor::write_layout(&self.header(), self.records(), out, endian)
    }

    /// Write the descriptor by packing whole words.
    ///
    /// Produces the same bytes as [`write_descriptor`].
    ///
    /// [`write_descriptor`]: #method.write_descriptor
    pub fn write_descriptor_fast(&self, out: &mut [u8], endian: Endian) -> Result<usize> {
        descriptor::write_fast(&self.header(), self.records(), out, endian)
    }

    fn admit(&self, span: Span) -> Option<u32> {
        match span.end() {
            Some(end) if end <= self.capture_len => (),
            _ => {
                net_debug!("span {} exceeds the capture of {} octets", span, self.capture_len);
                return None;
            }
        }

        match span.encode() {
            Ok(word) => Some(word),
            Err(err) => {
                net_debug!("span {} rejected: {}", span, err);
                None
            }
        }
    }

    /// Append a span, returning its index in the table.
    fn record(&mut self, span: Span) -> Option<usize> {
        if self.count == MAX_RECORDS {
            net_debug!("span {} dropped, record table full", span);
            return None;
        }

        let word = self.admit(span)?;
        let index = self.count;
        self.records[index] = word;
        self.count += 1;

        if span.id.class() == Class::Protocol {
            self.header.bitmask.insert(span.id);
        }

        Some(index)
    }

    /// Record an option or extension header unless its class or id is disabled.
    fn record_option(&mut self, id: ProtocolId, offset: usize, length: usize) {
        if self.config.record_extensions && !self.config.disabled(id.class()).test(id) {
            self.add_span(id, offset, length);
        }
    }

    fn set_l2_type(&mut self, l2_type: L2Type) {
        // Encapsulated frames do not change the framing of the capture.
        if self.depth == 0 {
            self.header.l2_type = l2_type;
        }
    }

    fn set_fragment(&mut self, is_last: bool) {
        self.header.is_fragment = true;
        self.header.is_last_fragment = is_last;
    }

    /// Run `inner` one encapsulation level deeper.
    fn nested<F>(&mut self, inner: F) -> Result<()>
        where F: FnOnce(&mut Self) -> Result<()>
    {
        if self.depth >= self.config.max_depth {
            net_debug!("encapsulation depth {} reached", self.depth);
            return Ok(());
        }

        self.depth += 1;
        let result = inner(self);
        self.depth -= 1;
        result
    }

    /// Offer a transport payload to the extensions registered for `id`.
    fn ports(&mut self, id: ProtocolId, data: &[u8], offset: usize, src: u16, dst: u16) {
        let registry = match self.extensions {
            Some(registry) => registry,
            None => return,
        };

        for extension in registry.handlers(id) {
            extension.dissect_ports(&mut *self, data, offset, id, src, dst);
        }
    }

    /// Offer a payload of an unrecognized type to the extensions registered for `id`.
    fn next_header(&mut self, id: ProtocolId, data: &[u8], offset: usize, value: u16) {
        let registry = match self.extensions {
            Some(registry) => registry,
            None => {
                net_trace!("no handler for type {:#x} below {}", value, id);
                return;
            },
        };

        for extension in registry.handlers(id) {
            extension.dissect_next_header(&mut *self, data, offset, id, value);
        }
    }
}

impl Recorder for Dissector<'_> {
    fn capture_len(&self) -> usize {
        self.capture_len
    }

    fn add_span(&mut self, id: ProtocolId, offset: usize, length: usize) -> bool {
        Dissector::add_span(self, id, offset, length)
    }

    fn dissect_ethernet(&mut self, data: &[u8], offset: usize) {
        let data = &data[..data.len().min(self.capture_len)];
        if let Err(err) = self.nested(|this| this.ethernet(data, offset)) {
            net_trace!("encapsulated frame at {} stopped: {}", offset, err);
        }
    }

    fn dissect_ethertype(&mut self, data: &[u8], offset: usize, ethertype: u16) {
        let data = &data[..data.len().min(self.capture_len)];
        let ethertype = EtherType::from(ethertype);
        if let Err(err) = self.nested(|this| this.ethertype(data, offset, ethertype)) {
            net_trace!("encapsulated {} payload at {} stopped: {}", ethertype, offset, err);
        }
    }
}

fn saturate(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::max_value())
}
