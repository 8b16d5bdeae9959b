//! Hex staging format: one byte per line, two hex digits

/// Parse one byte per line; lines that are not exactly two hex digits are skipped
pub fn parse_hex_lines(text: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        match parse_hex_byte(line) {
            Some(byte) => bytes.push(byte),
            None => log::debug!("Skipping line {}: {:?}", number + 1, line),
        }
    }
    bytes
}

fn parse_hex_byte(line: &str) -> Option<u8> {
    if line.len() != 2 || !line.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(line, 16).ok()
}

/// Format bytes as `%02X` lines, each newline-terminated
pub fn format_hex_lines(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}\n", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_lines() {
        assert_eq!(parse_hex_lines("00\n7f\nFF\na5\n"), vec![0x00, 0x7F, 0xFF, 0xA5]);
    }

    #[test]
    fn test_parse_crlf_and_missing_final_newline() {
        assert_eq!(parse_hex_lines("01\r\n02\r\n03"), vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "1\n\n0x1\nGG\n123\n 12\n42\n";
        assert_eq!(parse_hex_lines(text), vec![0x42]);
    }

    #[test]
    fn test_format_hex_lines() {
        assert_eq!(format_hex_lines(&[0x01, 0xAB]), "01\nAB\n");
        assert_eq!(format_hex_lines(&[]), "");
    }

    #[test]
    fn test_format_then_parse() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(parse_hex_lines(&format_hex_lines(&bytes)), bytes);
    }
}
