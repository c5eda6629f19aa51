//! Plain text handler

const UTF8_BOM: &str = "\u{feff}";

/// Split a text file into physical lines with terminators removed.
///
/// `\n`, `\r\n` and a bare `\r` all end a line. Invalid UTF-8 sequences are
/// replaced rather than rejected.
pub fn extract(bytes: &[u8]) -> Vec<String> {
    let content = String::from_utf8_lossy(bytes);
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content);

    content
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::to_string)
        .collect()
}
