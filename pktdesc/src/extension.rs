//! Dissection of protocols outside the core.
//!
//! The dissector only knows the protocols of the [`id`] table. Everything else is handed to
//! [`Extension`]s registered in a [`Registry`] under the id of the header whose field selected
//! them. There are two points where the dissector consults the registry:
//!
//! * After a UDP or TCP header, with its ports. Handlers registered under `UDP` or `TCP` may
//!   recognize a tunnel by a well-known port.
//! * When a type field has a value the dissector has no handling for. Handlers registered under
//!   `ETHERNET` get unknown ethertypes, those registered under `IPV4` and `IPV6` unknown protocol
//!   numbers.
//!
//! Handlers get a [`Recorder`] to add their own spans. Ids for them are allocated with
//! [`ProtocolId::extension`].
//!
//! The registry is fixed in size and holds references, so it is usually built once at startup
//! from extensions living in statics or on the stack of the capture loop.
//!
//! [`id`]: ../id/index.html
//! [`Extension`]: trait.Extension.html
//! [`Registry`]: struct.Registry.html
//! [`Recorder`]: trait.Recorder.html
//! [`ProtocolId::extension`]: ../id/struct.ProtocolId.html#method.extension
use crate::error::{Error, Result};
use crate::id::ProtocolId;

/// Number of handlers a registry can hold.
pub const MAX_EXTENSIONS: usize = 16;

/// Access to the dissection of the current packet.
pub trait Recorder {
    /// The number of captured octets.
    fn capture_len(&self) -> usize;

    /// Record a span, see [`Dissector::add_span`].
    ///
    /// [`Dissector::add_span`]: ../dissect/struct.Dissector.html#method.add_span
    fn add_span(&mut self, id: ProtocolId, offset: usize, length: usize) -> bool;

    /// Dissect an encapsulated Ethernet frame at `offset`.
    ///
    /// `data` must be the capture handed to the extension. Does nothing once the nesting depth of
    /// the configuration is reached.
    fn dissect_ethernet(&mut self, data: &[u8], offset: usize);

    /// Dissect an encapsulated payload typed by `ethertype` at `offset`.
    ///
    /// Same as `dissect_ethernet` otherwise, the bridged Ethernet type `0x6558` is equivalent to
    /// it.
    fn dissect_ethertype(&mut self, data: &[u8], offset: usize, ethertype: u16);
}

/// A protocol module contributing to dissection.
///
/// Both methods default to doing nothing. `data` is the whole capture, `offset` the first octet
/// after the header that triggered the call and `id` the id the handler was registered under.
pub trait Extension {
    /// Inspect the payload of a transport header with the given ports.
    fn dissect_ports(
        &self,
        recorder: &mut dyn Recorder,
        data: &[u8],
        offset: usize,
        id: ProtocolId,
        src_port: u16,
        dst_port: u16,
    ) {
        let _ = (recorder, data, offset, id, src_port, dst_port);
    }

    /// Inspect a payload whose type the dissector did not recognize.
    ///
    /// `next_header` is the raw ethertype or IP protocol number.
    fn dissect_next_header(
        &self,
        recorder: &mut dyn Recorder,
        data: &[u8],
        offset: usize,
        id: ProtocolId,
        next_header: u16,
    ) {
        let _ = (recorder, data, offset, id, next_header);
    }
}

/// Extensions keyed by the protocol id they attach to.
///
/// Several handlers may share an id, they are all called in registration order.
#[derive(Clone, Copy)]
pub struct Registry<'a> {
    entries: [Option<(ProtocolId, &'a dyn Extension)>; MAX_EXTENSIONS],
    len: usize,
}

impl<'a> Registry<'a> {
    /// An empty registry.
    pub fn new() -> Self {
        Registry {
            entries: [None; MAX_EXTENSIONS],
            len: 0,
        }
    }

    /// Attach `extension` to `id`.
    ///
    /// Fails with `Error::Exhausted` when all slots are taken.
    pub fn register(&mut self, id: ProtocolId, extension: &'a dyn Extension) -> Result<()> {
        let slot = self.entries.get_mut(self.len).ok_or(Error::Exhausted)?;
        *slot = Some((id, extension));
        self.len += 1;
        Ok(())
    }

    /// The handlers attached to `id`.
    pub fn handlers(&self, id: ProtocolId) -> impl Iterator<Item=&'a dyn Extension> + '_ {
        self.entries[..self.len].iter()
            .filter_map(|entry| *entry)
            .filter(move |&(key, _)| key == id)
            .map(|(_, extension)| extension)
    }

    /// The number of registered handlers.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Query whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Registry<'_> {
    fn default() -> Self {
        Registry::new()
    }
}

impl core::fmt::Debug for Registry<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries[..self.len].iter().filter_map(|entry| entry.map(|(id, _)| id)))
            .finish()
    }
}
