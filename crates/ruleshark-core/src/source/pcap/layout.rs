/// Section header block type, which doubles as the PCAPNG file magic.
pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

pub const PCAP_READER_BUFFER_SIZE: usize = 64 * 1024;

/// `if_tsresol` value used when an interface carries no such option.
pub const PCAPNG_DEFAULT_TSRESOL: u8 = 6;

/// High bit of `if_tsresol`: the remaining bits are a power of two.
pub const PCAPNG_TSRESOL_BINARY_FLAG: u8 = 0x80;

pub const LEGACY_MICROS_PER_SECOND: f64 = 1_000_000.0;
pub const LEGACY_NANOS_PER_SECOND: f64 = 1_000_000_000.0;
