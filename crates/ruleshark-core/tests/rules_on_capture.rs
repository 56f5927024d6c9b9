mod common;

use ruleshark_core::{EngineError, RunOptions, rules, run_pcap_file};
use serde_json::Value;
use tempfile::TempDir;

use common::{
    LINKTYPE_ETHERNET, LINKTYPE_RAW, ethernet_ipv4_icmp_echo, ethernet_ipv4_tcp,
    ethernet_ipv4_udp, raw_ipv4_udp,
};

const A: [u8; 4] = [10, 0, 0, 1];
const B: [u8; 4] = [10, 0, 0, 2];

fn run(rule_name: &str, path: &std::path::Path) -> (String, ruleshark_core::RunSummary) {
    let rule = rules::by_name(rule_name).expect("built-in rule");
    let mut out = Vec::new();
    let summary =
        run_pcap_file(path, rule.as_ref(), RunOptions::default(), &mut out).expect("run");
    (String::from_utf8(out).expect("utf8 output"), summary)
}

#[test]
fn transport_summary_over_mixed_capture() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("mixed.pcapng");
    common::write_pcapng(
        &path,
        LINKTYPE_ETHERNET,
        &[
            (0, ethernet_ipv4_tcp(A, B, 1234, 80, b"hello")),
            (1_000_000, ethernet_ipv4_udp(A, B, 5353, 53, &[0; 12])),
            (2_000_000, ethernet_ipv4_icmp_echo(A, B)),
        ],
    );

    let (output, summary) = run("ipv4-tcp-or-udp", &path);
    assert_eq!(
        output,
        "tcp: 10.0.0.1:1234->10.0.0.2:80\ntcp: 10.0.0.1:5353->10.0.0.2:53\n"
    );
    assert_eq!(summary.packets_total, 3);
    assert_eq!(summary.emitted, 2);
    assert_eq!(summary.unhandled, 1);
    assert_eq!(summary.time_start.as_deref(), Some("1970-01-01T00:00:00Z"));
    assert_eq!(summary.time_end.as_deref(), Some("1970-01-01T00:00:02Z"));
    let input = summary.input.expect("input info");
    assert!(input.path.ends_with("mixed.pcapng"));
    assert!(input.bytes > 0);
}

#[test]
fn transport_summary_over_raw_ip_capture() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("raw.pcap");
    common::write_legacy_pcap(
        &path,
        LINKTYPE_RAW,
        &[(0, raw_ipv4_udp([172, 16, 0, 5], [172, 16, 0, 9], 40000, 123))],
    );

    let (output, _) = run("ipv4-tcp-or-udp", &path);
    assert_eq!(output, "tcp: 172.16.0.5:40000->172.16.0.9:123\n");
}

#[test]
fn json_rule_emits_one_array_per_packet() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("json.pcapng");
    common::write_pcapng(
        &path,
        LINKTYPE_ETHERNET,
        &[
            (0, ethernet_ipv4_tcp(A, B, 1234, 80, &[])),
            (10, ethernet_ipv4_udp(A, B, 1, 2, b"x")),
        ],
    );

    let (output, summary) = run("json", &path);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(summary.emitted, 2);

    let first: Value = serde_json::from_str(lines[0]).expect("json line");
    let names: Vec<&str> = first
        .as_array()
        .expect("array")
        .iter()
        .map(|layer| layer["Name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Ethernet", "IPv4", "TCP"]);
    assert_eq!(first[0]["Info"]["SrcMAC"], "02:00:00:00:00:01");
    assert_eq!(first[1]["Info"]["SrcIP"], "10.0.0.1");
    assert_eq!(first[2]["Info"]["DstPort"], 80);

    let second: Value = serde_json::from_str(lines[1]).expect("json line");
    assert_eq!(second[3]["Name"], "Payload");
    assert_eq!(second[3]["Info"]["Data"], "78");
}

#[test]
fn hexdump_rule_skips_packets_without_payload() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("hex.pcapng");
    common::write_pcapng(
        &path,
        LINKTYPE_ETHERNET,
        &[
            (0, ethernet_ipv4_tcp(A, B, 1, 2, &[])),
            (1, ethernet_ipv4_tcp(A, B, 1, 2, b"abc")),
        ],
    );

    let (output, summary) = run("hexdump", &path);
    assert_eq!(summary.unhandled, 1);
    assert_eq!(summary.emitted, 1);
    assert!(output.starts_with("frame 2 payload (3 bytes)\n00000000  61 62 63 "));
    assert!(output.trim_end().ends_with("|abc|"));
}

#[test]
fn transport_summary_on_snaplen_truncated_capture() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("snaplen.pcapng");
    let mut frame = ethernet_ipv4_tcp(A, B, 1234, 80, &[0x55; 400]);
    frame.truncate(96);
    common::write_pcapng(&path, LINKTYPE_ETHERNET, &[(0, frame)]);

    let (output, summary) = run("ipv4-tcp-or-udp", &path);
    assert_eq!(output, "tcp: 10.0.0.1:1234->10.0.0.2:80\n");
    assert_eq!(summary.decode_errors, 0);
}

#[test]
fn strict_run_reports_failing_frame() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("ipv6.pcapng");
    let builder = etherparse::PacketBuilder::ethernet2([1; 6], [2; 6])
        .ipv6([1; 16], [2; 16], 64)
        .udp(1, 2);
    let mut frame = Vec::with_capacity(builder.size(0));
    builder.write(&mut frame, &[]).expect("build ipv6 frame");
    common::write_pcapng(&path, LINKTYPE_ETHERNET, &[(0, frame)]);

    let rule = rules::by_name("ipv4-tcp-or-udp").expect("built-in rule");
    let mut out = Vec::new();
    let err = run_pcap_file(&path, rule.as_ref(), RunOptions { strict: true }, &mut out)
        .unwrap_err();
    assert!(matches!(err, EngineError::Rule { frame: 1, .. }));
    assert!(err.to_string().contains("IPv4"));
}
