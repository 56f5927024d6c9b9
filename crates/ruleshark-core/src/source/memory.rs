use std::collections::VecDeque;

use super::{PacketEvent, PacketSource, SourceError};

/// Source backed by events prepared in memory.
///
/// # Examples
/// ```
/// use ruleshark_core::{Linktype, MemorySource, PacketEvent, PacketSource};
///
/// let mut source = MemorySource::new(vec![PacketEvent {
///     ts: Some(1.0),
///     linktype: Linktype::ETHERNET,
///     data: vec![0u8; 14],
/// }]);
/// assert!(source.next_packet()?.is_some());
/// assert!(source.next_packet()?.is_none());
/// # Ok::<(), ruleshark_core::SourceError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    events: VecDeque<PacketEvent>,
}

impl MemorySource {
    pub fn new(events: impl IntoIterator<Item = PacketEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: PacketEvent) {
        self.events.push_back(event);
    }
}

impl PacketSource for MemorySource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        Ok(self.events.pop_front())
    }
}
