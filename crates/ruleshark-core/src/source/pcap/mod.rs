//! PCAP/PCAPNG source implementation.
//!
//! Provides a `PacketSource` backed by capture files. The container format is
//! picked from the file magic; link types and timestamp resolution come from
//! the legacy header or from PCAPNG interface description blocks.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
