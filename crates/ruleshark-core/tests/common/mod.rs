#![allow(dead_code)]

use std::fs;
use std::path::Path;

use etherparse::PacketBuilder;

pub const LINKTYPE_ETHERNET: u16 = 1;
pub const LINKTYPE_RAW: u16 = 101;

const IPV6_A: [u8; 16] = [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
const IPV6_B: [u8; 16] = [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2];

pub fn ethernet_ipv4_tcp(
    src: [u8; 4],
    dst: [u8; 4],
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([0x02, 0, 0, 0, 0, 1], [0x02, 0, 0, 0, 0, 2])
        .ipv4(src, dst, 64)
        .tcp(src_port, dst_port, 1, 1024);
    let mut packet = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut packet, payload).expect("build tcp frame");
    packet
}

pub fn ethernet_ipv4_udp(
    src: [u8; 4],
    dst: [u8; 4],
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([0x02, 0, 0, 0, 0, 1], [0x02, 0, 0, 0, 0, 2])
        .ipv4(src, dst, 64)
        .udp(src_port, dst_port);
    let mut packet = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut packet, payload).expect("build udp frame");
    packet
}

pub fn ethernet_ipv4_icmp_echo(src: [u8; 4], dst: [u8; 4]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([0x02, 0, 0, 0, 0, 1], [0x02, 0, 0, 0, 0, 2])
        .ipv4(src, dst, 64)
        .icmpv4_echo_request(1, 1);
    let mut packet = Vec::with_capacity(builder.size(0));
    builder.write(&mut packet, &[]).expect("build icmp frame");
    packet
}

pub fn ethernet_ipv6_tcp(src_port: u16, dst_port: u16) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([0x02, 0, 0, 0, 0, 1], [0x02, 0, 0, 0, 0, 2])
        .ipv6(IPV6_A, IPV6_B, 64)
        .tcp(src_port, dst_port, 1, 1024);
    let mut packet = Vec::with_capacity(builder.size(0));
    builder.write(&mut packet, &[]).expect("build ipv6 frame");
    packet
}

pub fn raw_ipv4_udp(src: [u8; 4], dst: [u8; 4], src_port: u16, dst_port: u16) -> Vec<u8> {
    let builder = PacketBuilder::ipv4(src, dst, 64).udp(src_port, dst_port);
    let mut packet = Vec::with_capacity(builder.size(0));
    builder.write(&mut packet, &[]).expect("build raw udp packet");
    packet
}

/// Write a single-interface, big-endian PCAPNG file. Timestamps are in
/// microseconds.
pub fn write_pcapng(path: &Path, linktype: u16, packets: &[(u64, Vec<u8>)]) {
    let mut blocks = vec![
        section_header_block(),
        interface_description_block(linktype, None),
    ];
    for (ts_us, data) in packets {
        blocks.push(enhanced_packet_block(0, *ts_us, data));
    }
    write_blocks(path, &blocks);
}

/// Concatenate prepared PCAPNG blocks into a file.
pub fn write_blocks(path: &Path, blocks: &[Vec<u8>]) {
    fs::write(path, blocks.concat()).expect("write pcapng");
}

pub fn section_header_block() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    pcapng_block(0x0A0D0D0A, &body)
}

/// Interface description, optionally with an `if_tsresol` option.
pub fn interface_description_block(linktype: u16, tsresol: Option<u8>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&linktype.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65535u32.to_be_bytes());
    if let Some(tsresol) = tsresol {
        body.extend_from_slice(&9u16.to_be_bytes());
        body.extend_from_slice(&1u16.to_be_bytes());
        body.extend_from_slice(&[tsresol, 0, 0, 0]);
        // opt_endofopt
        body.extend_from_slice(&[0, 0, 0, 0]);
    }
    pcapng_block(1, &body)
}

/// Enhanced packet; `ts` is in the interface's timestamp units.
pub fn enhanced_packet_block(if_id: u32, ts: u64, data: &[u8]) -> Vec<u8> {
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&if_id.to_be_bytes());
    body.extend_from_slice(&((ts >> 32) as u32).to_be_bytes());
    body.extend_from_slice(&(ts as u32).to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    push_padded(&mut body, data);
    pcapng_block(6, &body)
}

pub fn simple_packet_block(data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&(data.len() as u32).to_be_bytes());
    push_padded(&mut body, data);
    pcapng_block(3, &body)
}

/// Write a little-endian legacy PCAP file with microsecond timestamps.
pub fn write_legacy_pcap(path: &Path, linktype: u16, packets: &[(u64, Vec<u8>)]) {
    let records: Vec<(u32, u32, &[u8])> = packets
        .iter()
        .map(|(ts_us, data)| {
            (
                (ts_us / 1_000_000) as u32,
                (ts_us % 1_000_000) as u32,
                data.as_slice(),
            )
        })
        .collect();
    write_legacy(path, 0xa1b2_c3d4, linktype, &records);
}

/// Write a little-endian legacy PCAP file with nanosecond timestamps.
pub fn write_legacy_pcap_nanos(path: &Path, linktype: u16, packets: &[(u64, Vec<u8>)]) {
    let records: Vec<(u32, u32, &[u8])> = packets
        .iter()
        .map(|(ts_ns, data)| {
            (
                (ts_ns / 1_000_000_000) as u32,
                (ts_ns % 1_000_000_000) as u32,
                data.as_slice(),
            )
        })
        .collect();
    write_legacy(path, 0xa1b2_3c4d, linktype, &records);
}

fn write_legacy(path: &Path, magic: u32, linktype: u16, records: &[(u32, u32, &[u8])]) {
    let mut output = Vec::new();
    output.extend_from_slice(&magic.to_le_bytes());
    output.extend_from_slice(&2u16.to_le_bytes());
    output.extend_from_slice(&4u16.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&65535u32.to_le_bytes());
    output.extend_from_slice(&(linktype as u32).to_le_bytes());
    for (ts_sec, ts_frac, data) in records {
        let len = data.len() as u32;
        output.extend_from_slice(&ts_sec.to_le_bytes());
        output.extend_from_slice(&ts_frac.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(data);
    }
    fs::write(path, output).expect("write pcap");
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn push_padded(body: &mut Vec<u8>, data: &[u8]) {
    body.extend_from_slice(data);
    let pad_len = (4 - (data.len() % 4)) % 4;
    body.extend(std::iter::repeat_n(0u8, pad_len));
}
