use crate::packet::PacketView;

use super::{Rule, RuleError, RuleOutcome};

/// Emit every decoded layer as a JSON array of `{"Name", "Info"}` objects.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDump;

impl JsonDump {
    pub const NAME: &'static str = "json";
}

impl Rule for JsonDump {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "print each packet's layers as a JSON array"
    }

    fn evaluate(&self, packet: &PacketView<'_>) -> Result<RuleOutcome, RuleError> {
        let json = serde_json::to_string(packet.layers())?;
        Ok(RuleOutcome::Emit(json))
    }
}
