//! ruleshark core library: per-packet rule evaluation over capture files.
//!
//! Packet sources yield raw frames, the decoder turns each frame into an
//! ordered list of typed layers, and a rule inspects the resulting
//! `PacketView` to emit a line of text or leave the packet unhandled. The
//! engine ties these together and counts what happened in a `RunSummary`.
//! All I/O lives in `source` and in the engine's output sink; decoding and
//! rules are pure.
//!
//! Invariants:
//! - Layers appear in decode order, outermost first, at most one per name.
//! - A rule is evaluated exactly once per decoded packet, with no state
//!   carried between packets.
//! - Every packet lands in exactly one summary bucket (emitted, unhandled,
//!   decode error, rule error).
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use ruleshark_core::{RunOptions, rules, run_pcap_file};
//!
//! let rule = rules::by_name("ipv4-tcp-or-udp").expect("built-in rule");
//! let mut stdout = std::io::stdout().lock();
//! let summary = run_pcap_file(
//!     Path::new("capture.pcapng"),
//!     rule.as_ref(),
//!     RunOptions::default(),
//!     &mut stdout,
//! )?;
//! eprintln!("{} packets, {} lines", summary.packets_total, summary.emitted);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod config;
mod decode;
mod engine;
mod format;
mod packet;
pub mod rules;
mod source;

pub use config::{Config, ConfigError};
pub use decode::{DecodeError, decode_packet};
pub use engine::{EngineError, RunOptions, run_pcap_file, run_source};
pub use format::{hardware_addr_string, hexdump};
pub use packet::{
    EthernetInfo, IcmpInfo, Ipv4Info, Ipv6Info, Layer, LayerError, LayerInfo, LayerKind, Packet,
    PacketMeta, PacketView, PayloadInfo, TcpInfo, TransportPorts, UdpInfo, UnknownLayerName,
};
pub use pcap_parser::Linktype;
pub use rules::{Rule, RuleError, RuleOutcome};
pub use source::{MemorySource, PacketEvent, PacketSource, PcapFileSource, SourceError};

/// Current run summary schema version.
pub const SUMMARY_VERSION: u32 = 1;

/// Counters and metadata for one rule run.
///
/// `packets_total` always equals the sum of the four outcome counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Summary schema version (not the binary version).
    pub summary_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Input capture metadata, when the run read a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<InputInfo>,
    /// Name of the evaluated rule.
    pub rule: String,
    pub packets_total: u64,
    /// Packets for which the rule emitted output.
    pub emitted: u64,
    /// Packets the rule declared unhandled.
    pub unhandled: u64,
    /// Packets skipped because they could not be decoded.
    pub decode_errors: u64,
    /// Packets skipped because the rule failed on them.
    pub rule_errors: u64,
    /// RFC3339 timestamp of the earliest packet (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the latest packet (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Tool metadata embedded in summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Input capture metadata embedded in summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the engine.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Build an empty summary for `rule`.
///
/// # Examples
/// ```
/// use ruleshark_core::make_summary;
///
/// let summary = make_summary("json");
/// assert_eq!(summary.summary_version, ruleshark_core::SUMMARY_VERSION);
/// assert_eq!(summary.packets_total, 0);
/// ```
pub fn make_summary(rule: &str) -> RunSummary {
    RunSummary {
        summary_version: SUMMARY_VERSION,
        tool: ToolInfo {
            name: "ruleshark".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: None,
        rule: rule.to_string(),
        packets_total: 0,
        emitted: 0,
        unhandled: 0,
        decode_errors: 0,
        rule_errors: 0,
        time_start: None,
        time_end: None,
    }
}
