//! Text helpers for rule output.

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";
const HEXDUMP_WIDTH: usize = 16;

/// Format hardware address bytes as colon-separated lowercase hex.
///
/// # Examples
/// ```
/// use ruleshark_core::hardware_addr_string;
///
/// assert_eq!(hardware_addr_string(&[0x00, 0x1b, 0x21, 0x0a]), "00:1b:21:0a");
/// assert_eq!(hardware_addr_string(&[]), "");
/// ```
pub fn hardware_addr_string(addr: &[u8]) -> String {
    let mut out = String::with_capacity((addr.len() * 3).saturating_sub(1));
    for (idx, byte) in addr.iter().enumerate() {
        if idx > 0 {
            out.push(':');
        }
        out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
    }
    out
}

/// Canonical hex dump: offset, sixteen hex columns in two groups, ASCII.
///
/// Surrounding whitespace is trimmed, so a short final line ends right after
/// its ASCII column.
///
/// # Examples
/// ```
/// use ruleshark_core::hexdump;
///
/// let dump = hexdump(b"ABCDEFGHIJKLMNOP");
/// assert_eq!(
///     dump,
///     "00000000  41 42 43 44 45 46 47 48  49 4a 4b 4c 4d 4e 4f 50  |ABCDEFGHIJKLMNOP|"
/// );
/// ```
pub fn hexdump(data: &[u8]) -> String {
    let mut out = String::new();
    for (line, chunk) in data.chunks(HEXDUMP_WIDTH).enumerate() {
        out.push_str(&format!("{:08x}  ", line * HEXDUMP_WIDTH));
        for col in 0..HEXDUMP_WIDTH {
            match chunk.get(col) {
                Some(byte) => out.push_str(&format!("{byte:02x} ")),
                None => out.push_str("   "),
            }
            if col == HEXDUMP_WIDTH / 2 - 1 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        out.extend(chunk.iter().map(|&b| printable(b)));
        out.push_str("|\n");
    }
    out.trim().to_string()
}

fn printable(byte: u8) -> char {
    if (0x20..=0x7e).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}

#[cfg(test)]
mod tests {
    use super::{hardware_addr_string, hexdump};

    #[test]
    fn hardware_addr_formats_mac() {
        assert_eq!(
            hardware_addr_string(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]),
            "de:ad:be:ef:00:01"
        );
    }

    #[test]
    fn hardware_addr_single_byte_has_no_separator() {
        assert_eq!(hardware_addr_string(&[0x0f]), "0f");
    }

    #[test]
    fn hexdump_empty_is_empty() {
        assert_eq!(hexdump(&[]), "");
    }

    #[test]
    fn hexdump_pads_short_line_and_masks_control_bytes() {
        let dump = hexdump(&[0x68, 0x69, 0x00]);
        let expected = format!("00000000  68 69 00 {}  |hi.|", " ".repeat(3 * 13));
        assert_eq!(dump, expected);
    }

    #[test]
    fn hexdump_numbers_lines_by_offset() {
        let data: Vec<u8> = (0u8..20).collect();
        let dump = hexdump(&data);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("00000000  00 01 02 03 04 05 06 07  08 09"));
        assert!(lines[1].starts_with("00000010  10 11 12 13 "));
        assert!(lines[1].ends_with("|....|"));
    }
}
