use std::io::{Read, Seek, SeekFrom};

use super::error::PcapSourceError;
use super::layout;
use pcap_parser::Linktype;

/// Per-interface state collected from PCAPNG interface description blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceInfo {
    pub linktype: Linktype,
    /// Timestamp units per second, from `if_tsresol`.
    pub ts_units: f64,
    /// Seconds added to every timestamp, from `if_tsoffset`.
    pub ts_offset: f64,
}

impl Default for InterfaceInfo {
    fn default() -> Self {
        Self {
            linktype: Linktype::ETHERNET,
            ts_units: ts_units_per_second(layout::PCAPNG_DEFAULT_TSRESOL),
            ts_offset: 0.0,
        }
    }
}

/// Read the magic bytes and rewind the reader to the start.
///
/// # Errors
/// Returns `PcapSourceError::Io` when fewer than four bytes are available or
/// the reader cannot be rewound.
pub fn read_magic_and_rewind<R: Read + Seek>(reader: &mut R) -> Result<[u8; 4], PcapSourceError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(magic)
}

pub fn is_pcapng_magic(magic: &[u8; 4]) -> bool {
    magic == &layout::PCAPNG_MAGIC
}

/// Resolve the interface for a PCAPNG interface id.
///
/// Ids without a description block fall back to Ethernet with microsecond
/// timestamps.
pub fn interface_for(interfaces: &[InterfaceInfo], if_id: u32) -> InterfaceInfo {
    interfaces
        .get(if_id as usize)
        .copied()
        .unwrap_or_default()
}

/// Decode an `if_tsresol` option value into units per second.
pub fn ts_units_per_second(tsresol: u8) -> f64 {
    let exponent = (tsresol & !layout::PCAPNG_TSRESOL_BINARY_FLAG) as i32;
    if tsresol & layout::PCAPNG_TSRESOL_BINARY_FLAG != 0 {
        2f64.powi(exponent)
    } else {
        10f64.powi(exponent)
    }
}

/// Convert a PCAPNG high/low timestamp pair to seconds for `interface`.
pub fn pcapng_ts_to_seconds(ts_high: u32, ts_low: u32, interface: &InterfaceInfo) -> f64 {
    let ts = ((ts_high as u64) << 32) | (ts_low as u64);
    interface.ts_offset + ts as f64 / interface.ts_units
}

/// Convert a legacy PCAP seconds/fraction pair to seconds.
///
/// `ts_frac` is in microseconds, or nanoseconds when `nanosecond` is set.
pub fn legacy_ts_to_seconds(ts_sec: u32, ts_frac: u32, nanosecond: bool) -> f64 {
    let units = if nanosecond {
        layout::LEGACY_NANOS_PER_SECOND
    } else {
        layout::LEGACY_MICROS_PER_SECOND
    };
    ts_sec as f64 + ts_frac as f64 / units
}
