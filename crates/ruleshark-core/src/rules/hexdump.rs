use crate::format::hexdump;
use crate::packet::{LayerKind, PacketView};

use super::{Rule, RuleError, RuleOutcome};

/// Hex dump of the application payload; packets without one are unhandled.
#[derive(Debug, Default, Clone, Copy)]
pub struct PayloadHexdump;

impl PayloadHexdump {
    pub const NAME: &'static str = "hexdump";
}

impl Rule for PayloadHexdump {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "print a hex dump of each packet's payload"
    }

    fn evaluate(&self, packet: &PacketView<'_>) -> Result<RuleOutcome, RuleError> {
        let name = LayerKind::Payload.as_str();
        if !packet.contains_layer(name) {
            return Ok(RuleOutcome::Unhandled);
        }
        let index = packet.layer_index(name)?;
        let info = packet.info_at(index)?;
        let payload = info
            .as_payload()
            .ok_or_else(|| RuleError::unexpected(index, info, LayerKind::Payload))?;
        if payload.data.is_empty() {
            return Ok(RuleOutcome::Unhandled);
        }
        Ok(RuleOutcome::Emit(format!(
            "frame {} payload ({} bytes)\n{}",
            packet.meta().frame,
            payload.length,
            hexdump(&payload.data)
        )))
    }
}
