use etherparse::{LaxNetSlice, LaxSlicedPacket, LinkSlice, TransportSlice};
use pcap_parser::Linktype;
use tracing::trace;

use crate::packet::{
    EthernetInfo, IcmpInfo, Ipv4Info, Ipv6Info, Layer, LayerInfo, Packet, PacketMeta, PayloadInfo,
    TcpInfo, UdpInfo,
};

use super::error::DecodeError;

/// Decode a link-layer frame into a layer-indexed packet.
///
/// Slicing is lax: a frame cut short by the capture snaplen keeps every
/// header that is complete, and whatever bytes follow become the payload.
/// Only a frame too short for its outermost header is an error.
///
/// `meta.length` is overwritten with the captured length of `data`.
pub fn decode_packet(
    mut meta: PacketMeta,
    linktype: Linktype,
    data: &[u8],
) -> Result<Packet, DecodeError> {
    let sliced = match linktype {
        Linktype::ETHERNET => {
            LaxSlicedPacket::from_ethernet(data).map_err(|e| DecodeError::Slice(e.to_string()))?
        }
        Linktype::RAW | Linktype::IPV4 | Linktype::IPV6 => {
            LaxSlicedPacket::from_ip(data).map_err(|e| DecodeError::Slice(e.to_string()))?
        }
        other => return Err(DecodeError::UnsupportedLinktype(other.0)),
    };
    meta.length = data.len();
    if let Some((err, _)) = &sliced.stop_err {
        trace!(frame = meta.frame, %err, "decoding stopped early");
    }

    let mut layers = Vec::with_capacity(4);

    if let Some(LinkSlice::Ethernet2(eth)) = &sliced.link {
        layers.push(Layer::new(LayerInfo::Ethernet(EthernetInfo {
            src_mac: eth.source(),
            dst_mac: eth.destination(),
            ether_type: eth.ether_type().0,
        })));
    }

    match &sliced.net {
        Some(LaxNetSlice::Ipv4(ipv4)) => {
            let header = ipv4.header();
            layers.push(Layer::new(LayerInfo::Ipv4(Ipv4Info {
                src_ip: header.source_addr(),
                dst_ip: header.destination_addr(),
                ttl: header.ttl(),
                protocol: header.protocol().0,
                length: header.total_len(),
                id: header.identification(),
            })));
        }
        Some(LaxNetSlice::Ipv6(ipv6)) => {
            let header = ipv6.header();
            layers.push(Layer::new(LayerInfo::Ipv6(Ipv6Info {
                src_ip: header.source_addr(),
                dst_ip: header.destination_addr(),
                hop_limit: header.hop_limit(),
                next_header: header.next_header().0,
                length: header.payload_length(),
            })));
        }
        _ => {}
    }

    let payload = match &sliced.transport {
        Some(TransportSlice::Tcp(tcp)) => {
            layers.push(Layer::new(LayerInfo::Tcp(TcpInfo {
                src_port: tcp.source_port(),
                dst_port: tcp.destination_port(),
                seq: tcp.sequence_number(),
                ack: tcp.acknowledgment_number(),
                window: tcp.window_size(),
                syn: tcp.syn(),
                ack_flag: tcp.ack(),
                fin: tcp.fin(),
                rst: tcp.rst(),
                psh: tcp.psh(),
                urg: tcp.urg(),
            })));
            tcp.payload()
        }
        Some(TransportSlice::Udp(udp)) => {
            layers.push(Layer::new(LayerInfo::Udp(UdpInfo {
                src_port: udp.source_port(),
                dst_port: udp.destination_port(),
                length: udp.length(),
                checksum: udp.checksum(),
            })));
            udp.payload()
        }
        Some(TransportSlice::Icmpv4(icmp)) => {
            layers.push(Layer::new(LayerInfo::Icmpv4(IcmpInfo {
                icmp_type: icmp.type_u8(),
                code: icmp.code_u8(),
            })));
            icmp.payload()
        }
        Some(TransportSlice::Icmpv6(icmp)) => {
            layers.push(Layer::new(LayerInfo::Icmpv6(IcmpInfo {
                icmp_type: icmp.type_u8(),
                code: icmp.code_u8(),
            })));
            icmp.payload()
        }
        _ => match &sliced.net {
            Some(net) => net
                .ip_payload_ref()
                .map(|ip_payload| ip_payload.payload)
                .unwrap_or(&[]),
            // non-IP ethertype, e.g. ARP
            None => match &sliced.link {
                Some(LinkSlice::Ethernet2(eth)) => eth.payload().payload,
                _ => &[],
            },
        },
    };

    if !payload.is_empty() {
        layers.push(Layer::new(LayerInfo::Payload(PayloadInfo::new(payload))));
    }

    Ok(Packet::new(meta, layers))
}
