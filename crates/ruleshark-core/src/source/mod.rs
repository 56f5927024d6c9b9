//! Packet sources.
//!
//! A source yields raw link-layer frames in capture order. Decoding happens
//! elsewhere; sources only deal with container formats and I/O.

mod memory;
pub(crate) mod pcap;

pub use memory::MemorySource;
pub use pcap::PcapFileSource;

use pcap_parser::Linktype;
use thiserror::Error;

/// One captured frame as read from a source.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// Capture timestamp in seconds since the Unix epoch, when known.
    pub ts: Option<f64>,
    /// Link type of `data`.
    pub linktype: Linktype,
    /// Captured bytes, starting at the link layer.
    pub data: Vec<u8>,
}

pub trait PacketSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error: {0}")]
    Pcap(String),
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
        }
    }
}
