use crate::packet::{Ipv4Info, LayerKind, PacketView, TransportPorts};

use super::{Rule, RuleError, RuleOutcome};

/// IPv4 endpoint summary for TCP or UDP packets.
///
/// TCP wins when both are present. The line prefix is `tcp: ` for UDP
/// packets as well; existing consumers of this output match on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ipv4TransportSummary;

impl Ipv4TransportSummary {
    pub const NAME: &'static str = "ipv4-tcp-or-udp";
    const PREFIX: &'static str = "tcp: ";
}

impl Rule for Ipv4TransportSummary {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "print `tcp: src:port->dst:port` for IPv4 TCP or UDP packets"
    }

    fn evaluate(&self, packet: &PacketView<'_>) -> Result<RuleOutcome, RuleError> {
        let transport = if packet.contains_layer(LayerKind::Tcp.as_str()) {
            LayerKind::Tcp
        } else if packet.contains_layer(LayerKind::Udp.as_str()) {
            LayerKind::Udp
        } else {
            return Ok(RuleOutcome::Unhandled);
        };

        let ip4_index = packet.layer_index(LayerKind::Ipv4.as_str())?;
        let transport_index = packet.layer_index(transport.as_str())?;

        let ip4_info = packet.info_at(ip4_index)?;
        let ip4 = ip4_info
            .as_ipv4()
            .ok_or_else(|| RuleError::unexpected(ip4_index, ip4_info, LayerKind::Ipv4))?;
        let transport_info = packet.info_at(transport_index)?;
        let ports = transport_info
            .transport_ports()
            .ok_or_else(|| RuleError::unexpected(transport_index, transport_info, transport))?;

        Ok(RuleOutcome::Emit(format_line(ip4, ports)))
    }
}

fn format_line(ip4: &Ipv4Info, ports: &dyn TransportPorts) -> String {
    format!(
        "{}{}:{}->{}:{}",
        Ipv4TransportSummary::PREFIX,
        ip4.src_ip,
        ports.src_port(),
        ip4.dst_ip,
        ports.dst_port()
    )
}
