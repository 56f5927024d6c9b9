use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::format::hardware_addr_string;

/// Protocol layer kinds known to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Ethernet,
    Ipv4,
    Ipv6,
    Tcp,
    Udp,
    Icmpv4,
    Icmpv6,
    Payload,
}

impl LayerKind {
    pub const ALL: [LayerKind; 8] = [
        LayerKind::Ethernet,
        LayerKind::Ipv4,
        LayerKind::Ipv6,
        LayerKind::Tcp,
        LayerKind::Udp,
        LayerKind::Icmpv4,
        LayerKind::Icmpv6,
        LayerKind::Payload,
    ];

    /// Layer name as seen by rules (e.g. `"IPv4"`, `"TCP"`).
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Ethernet => "Ethernet",
            LayerKind::Ipv4 => "IPv4",
            LayerKind::Ipv6 => "IPv6",
            LayerKind::Tcp => "TCP",
            LayerKind::Udp => "UDP",
            LayerKind::Icmpv4 => "ICMPv4",
            LayerKind::Icmpv6 => "ICMPv6",
            LayerKind::Payload => "Payload",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a layer name. Matching is exact and case-sensitive.
impl FromStr for LayerKind {
    type Err = UnknownLayerName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownLayerName(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layer name: {0}")]
pub struct UnknownLayerName(pub String);

/// Source and destination ports, shared by TCP and UDP.
pub trait TransportPorts {
    fn src_port(&self) -> u16;
    fn dst_port(&self) -> u16;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EthernetInfo {
    #[serde(rename = "SrcMAC", serialize_with = "serialize_mac")]
    pub src_mac: [u8; 6],
    #[serde(rename = "DstMAC", serialize_with = "serialize_mac")]
    pub dst_mac: [u8; 6],
    #[serde(rename = "EthernetType")]
    pub ether_type: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ipv4Info {
    #[serde(rename = "SrcIP")]
    pub src_ip: Ipv4Addr,
    #[serde(rename = "DstIP")]
    pub dst_ip: Ipv4Addr,
    #[serde(rename = "TTL")]
    pub ttl: u8,
    #[serde(rename = "Protocol")]
    pub protocol: u8,
    #[serde(rename = "Length")]
    pub length: u16,
    #[serde(rename = "Id")]
    pub id: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ipv6Info {
    #[serde(rename = "SrcIP")]
    pub src_ip: Ipv6Addr,
    #[serde(rename = "DstIP")]
    pub dst_ip: Ipv6Addr,
    #[serde(rename = "HopLimit")]
    pub hop_limit: u8,
    #[serde(rename = "NextHeader")]
    pub next_header: u8,
    #[serde(rename = "Length")]
    pub length: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TcpInfo {
    #[serde(rename = "SrcPort")]
    pub src_port: u16,
    #[serde(rename = "DstPort")]
    pub dst_port: u16,
    #[serde(rename = "Seq")]
    pub seq: u32,
    #[serde(rename = "Ack")]
    pub ack: u32,
    #[serde(rename = "Window")]
    pub window: u16,
    #[serde(rename = "SYN")]
    pub syn: bool,
    #[serde(rename = "ACK")]
    pub ack_flag: bool,
    #[serde(rename = "FIN")]
    pub fin: bool,
    #[serde(rename = "RST")]
    pub rst: bool,
    #[serde(rename = "PSH")]
    pub psh: bool,
    #[serde(rename = "URG")]
    pub urg: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UdpInfo {
    #[serde(rename = "SrcPort")]
    pub src_port: u16,
    #[serde(rename = "DstPort")]
    pub dst_port: u16,
    #[serde(rename = "Length")]
    pub length: u16,
    #[serde(rename = "Checksum")]
    pub checksum: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IcmpInfo {
    #[serde(rename = "Type")]
    pub icmp_type: u8,
    #[serde(rename = "Code")]
    pub code: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadInfo {
    #[serde(rename = "Length")]
    pub length: usize,
    #[serde(rename = "Data", serialize_with = "serialize_hex")]
    pub data: Vec<u8>,
}

impl PayloadInfo {
    pub fn new(data: &[u8]) -> Self {
        Self {
            length: data.len(),
            data: data.to_vec(),
        }
    }
}

impl TransportPorts for TcpInfo {
    fn src_port(&self) -> u16 {
        self.src_port
    }

    fn dst_port(&self) -> u16 {
        self.dst_port
    }
}

impl TransportPorts for UdpInfo {
    fn src_port(&self) -> u16 {
        self.src_port
    }

    fn dst_port(&self) -> u16 {
        self.dst_port
    }
}

/// Decoded fields of one layer, typed per protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LayerInfo {
    Ethernet(EthernetInfo),
    Ipv4(Ipv4Info),
    Ipv6(Ipv6Info),
    Tcp(TcpInfo),
    Udp(UdpInfo),
    Icmpv4(IcmpInfo),
    Icmpv6(IcmpInfo),
    Payload(PayloadInfo),
}

impl LayerInfo {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerInfo::Ethernet(_) => LayerKind::Ethernet,
            LayerInfo::Ipv4(_) => LayerKind::Ipv4,
            LayerInfo::Ipv6(_) => LayerKind::Ipv6,
            LayerInfo::Tcp(_) => LayerKind::Tcp,
            LayerInfo::Udp(_) => LayerKind::Udp,
            LayerInfo::Icmpv4(_) => LayerKind::Icmpv4,
            LayerInfo::Icmpv6(_) => LayerKind::Icmpv6,
            LayerInfo::Payload(_) => LayerKind::Payload,
        }
    }

    pub fn as_ipv4(&self) -> Option<&Ipv4Info> {
        match self {
            LayerInfo::Ipv4(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_tcp(&self) -> Option<&TcpInfo> {
        match self {
            LayerInfo::Tcp(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_udp(&self) -> Option<&UdpInfo> {
        match self {
            LayerInfo::Udp(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_payload(&self) -> Option<&PayloadInfo> {
        match self {
            LayerInfo::Payload(info) => Some(info),
            _ => None,
        }
    }

    /// Port capability of transport layers; `None` for everything else.
    pub fn transport_ports(&self) -> Option<&dyn TransportPorts> {
        match self {
            LayerInfo::Tcp(info) => Some(info),
            LayerInfo::Udp(info) => Some(info),
            _ => None,
        }
    }
}

impl fmt::Display for LayerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerInfo::Ethernet(info) => write!(
                f,
                "{{SrcMAC={} DstMAC={} EthernetType=0x{:04x}}}",
                hardware_addr_string(&info.src_mac),
                hardware_addr_string(&info.dst_mac),
                info.ether_type
            ),
            LayerInfo::Ipv4(info) => write!(
                f,
                "{{SrcIP={} DstIP={} TTL={} Protocol={} Length={} Id={}}}",
                info.src_ip, info.dst_ip, info.ttl, info.protocol, info.length, info.id
            ),
            LayerInfo::Ipv6(info) => write!(
                f,
                "{{SrcIP={} DstIP={} HopLimit={} NextHeader={} Length={}}}",
                info.src_ip, info.dst_ip, info.hop_limit, info.next_header, info.length
            ),
            LayerInfo::Tcp(info) => {
                write!(
                    f,
                    "{{SrcPort={} DstPort={} Seq={} Ack={} Window={} Flags=",
                    info.src_port, info.dst_port, info.seq, info.ack, info.window
                )?;
                let flags = [
                    (info.syn, "SYN"),
                    (info.ack_flag, "ACK"),
                    (info.fin, "FIN"),
                    (info.rst, "RST"),
                    (info.psh, "PSH"),
                    (info.urg, "URG"),
                ];
                let set: Vec<&str> = flags
                    .iter()
                    .filter(|(on, _)| *on)
                    .map(|(_, name)| *name)
                    .collect();
                write!(f, "[{}]}}", set.join(","))
            }
            LayerInfo::Udp(info) => write!(
                f,
                "{{SrcPort={} DstPort={} Length={} Checksum=0x{:04x}}}",
                info.src_port, info.dst_port, info.length, info.checksum
            ),
            LayerInfo::Icmpv4(info) | LayerInfo::Icmpv6(info) => {
                write!(f, "{{Type={} Code={}}}", info.icmp_type, info.code)
            }
            LayerInfo::Payload(info) => write!(f, "{{Length={}}}", info.length),
        }
    }
}

/// One decoded layer of a packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    #[serde(rename = "Name")]
    name: &'static str,
    #[serde(rename = "Info")]
    info: LayerInfo,
}

impl Layer {
    pub fn new(info: LayerInfo) -> Self {
        Self {
            name: info.kind().as_str(),
            info,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> LayerKind {
        self.info.kind()
    }

    pub fn info(&self) -> &LayerInfo {
        &self.info
    }
}

impl From<LayerInfo> for Layer {
    fn from(info: LayerInfo) -> Self {
        Layer::new(info)
    }
}

fn serialize_mac<S: Serializer>(mac: &[u8; 6], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hardware_addr_string(mac))
}

fn serialize_hex<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    let hex: String = data.iter().map(|b| format!("{b:02x}")).collect();
    serializer.serialize_str(&hex)
}
