use crate::packet::PacketView;

use super::{Rule, RuleError, RuleOutcome};

/// Emit a multi-line, human-readable description of each packet.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrettyPrint;

impl PrettyPrint {
    pub const NAME: &'static str = "pretty";
}

impl Rule for PrettyPrint {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "print a readable per-layer description of each packet"
    }

    fn evaluate(&self, packet: &PacketView<'_>) -> Result<RuleOutcome, RuleError> {
        Ok(RuleOutcome::Emit(packet.to_string()))
    }
}
