//! Per-packet rules.
//!
//! A rule receives one decoded packet as a `PacketView`, queries its layers
//! and either emits a line of text or declares the packet unhandled. Rules
//! hold no per-packet state, so one instance serves a whole capture.

mod hexdump;
mod json;
mod pretty;
mod transport;

use thiserror::Error;

use crate::packet::{LayerError, LayerInfo, LayerKind, PacketView};

pub use hexdump::PayloadHexdump;
pub use json::JsonDump;
pub use pretty::PrettyPrint;
pub use transport::Ipv4TransportSummary;

/// Rule used when none is selected.
pub const DEFAULT_RULE: &str = JsonDump::NAME;

/// Result of evaluating a rule against one packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Text to write to the output sink (without trailing newline).
    Emit(String),
    /// The rule does not apply to this packet; nothing is written.
    Unhandled,
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error(transparent)]
    Layer(#[from] LayerError),
    #[error("layer at index {index} is {found}, expected {expected}")]
    UnexpectedLayer {
        index: usize,
        found: LayerKind,
        expected: LayerKind,
    },
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl RuleError {
    /// A positional lookup returned a layer of the wrong kind.
    pub fn unexpected(index: usize, found: &LayerInfo, expected: LayerKind) -> Self {
        RuleError::UnexpectedLayer {
            index,
            found: found.kind(),
            expected,
        }
    }
}

pub trait Rule: Send + Sync {
    /// Stable name used for selection on the command line and in config.
    fn name(&self) -> &'static str;

    /// One-line human-readable description.
    fn description(&self) -> &'static str;

    fn evaluate(&self, packet: &PacketView<'_>) -> Result<RuleOutcome, RuleError>;
}

/// All built-in rules, in listing order.
pub fn builtin() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(Ipv4TransportSummary),
        Box::new(JsonDump),
        Box::new(PrettyPrint),
        Box::new(PayloadHexdump),
    ]
}

/// Look up a built-in rule by its exact name.
///
/// # Examples
/// ```
/// use ruleshark_core::rules;
///
/// let rule = rules::by_name("ipv4-tcp-or-udp").expect("built-in rule");
/// assert_eq!(rule.name(), "ipv4-tcp-or-udp");
/// assert!(rules::by_name("nope").is_none());
/// ```
pub fn by_name(name: &str) -> Option<Box<dyn Rule>> {
    builtin().into_iter().find(|rule| rule.name() == name)
}
