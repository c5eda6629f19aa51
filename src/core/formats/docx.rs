//! DOCX handler
//!
//! Reads `word/document.xml` out of the zip container and walks it with a
//! streaming reader. Every `w:p` element becomes one string, in document
//! order, including paragraphs nested in tables and text boxes.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

const DOCUMENT_XML: &str = "word/document.xml";
const FALLBACK: &[u8] = b"mc:Fallback";

/// Extract one string per paragraph from DOCX bytes
pub fn extract(bytes: &[u8]) -> Result<Vec<String>, String> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("not a zip container: {}", e))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| format!("missing {}: {}", DOCUMENT_XML, e))?
        .read_to_string(&mut xml)
        .map_err(|e| format!("unreadable {}: {}", DOCUMENT_XML, e))?;

    paragraphs(&xml)
}

/// Collect paragraph text from WordprocessingML
///
/// `w:t` runs contribute their text, `w:tab` a tab and `w:br`/`w:cr` a
/// newline. A `w:noBreakHyphen` is written as a plain `-` and a `w:sym` as
/// the character in its `w:char` attribute. Soft hyphens are optional break
/// points and are dropped. Tab stop definitions in paragraph properties are
/// ignored, as is the `mc:Fallback` copy of alternate content.
fn paragraphs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut paragraphs = Vec::new();
    // Open paragraphs, innermost last
    let mut open: Vec<String> = Vec::new();
    let mut in_run = false;
    let mut in_text = false;
    let mut fallback_depth = 0usize;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            format!(
                "invalid XML at position {}: {}",
                reader.buffer_position(),
                e
            )
        })?;

        if fallback_depth > 0 {
            match &event {
                Event::Start(e) if e.name().as_ref() == FALLBACK => fallback_depth += 1,
                Event::End(e) if e.name().as_ref() == FALLBACK => fallback_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => match e.name().as_ref() {
                FALLBACK => fallback_depth += 1,
                b"w:p" => open.push(String::new()),
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if in_run => push_to_current(&mut open, "\t"),
                b"w:br" | b"w:cr" if in_run => push_to_current(&mut open, "\n"),
                b"w:noBreakHyphen" if in_run => push_to_current(&mut open, "-"),
                b"w:sym" if in_run => {
                    if let Some(symbol) = symbol_char(&e) {
                        push_to_current(&mut open, symbol.encode_utf8(&mut [0; 4]));
                    }
                }
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                push_to_current(&mut open, &text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Character named by the hex `w:char` attribute of a `w:sym` element
fn symbol_char(element: &BytesStart) -> Option<char> {
    let attr = element.try_get_attribute("w:char").ok()??;
    let hex = std::str::from_utf8(&attr.value).ok()?;
    u32::from_str_radix(hex.trim(), 16)
        .ok()
        .and_then(char::from_u32)
}

fn push_to_current(open: &mut [String], text: &str) {
    if let Some(current) = open.last_mut() {
        current.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY_START: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;
    const BODY_END: &str = "</w:body></w:document>";

    fn document(body: &str) -> String {
        format!("{}{}{}", BODY_START, body, BODY_END)
    }

    #[test]
    fn test_runs_are_joined_per_paragraph() {
        let xml = document(
            r#"<w:p><w:r><w:t xml:space="preserve">My twitter handle is </w:t></w:r><w:r><w:t>@john_jones but I’d like to keep this a secret</w:t></w:r></w:p>
<w:p><w:r><w:t>Second paragraph</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            paragraphs(&xml).unwrap(),
            vec![
                "My twitter handle is @john_jones but I’d like to keep this a secret",
                "Second paragraph",
            ]
        );
    }

    #[test]
    fn test_empty_paragraphs_and_entities() {
        let xml = document(
            r#"<w:p/><w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Smith &amp; Sons</w:t><w:tab/><w:t>A</w:t><w:br/><w:t>B</w:t></w:r></w:p><w:p></w:p>"#,
        );
        assert_eq!(paragraphs(&xml).unwrap(), vec!["", "Smith & Sons\tA\nB", ""]);
    }

    #[test]
    fn test_table_cells_are_paragraphs() {
        let xml = document(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>John Smith</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        assert_eq!(paragraphs(&xml).unwrap(), vec!["Name", "John Smith"]);
    }

    #[test]
    fn test_instruction_text_is_ignored() {
        let xml = document(
            r#"<w:p><w:r><w:instrText>HYPERLINK "x"</w:instrText></w:r><w:r><w:t>visible</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs(&xml).unwrap(), vec!["visible"]);
    }

    #[test]
    fn test_no_break_hyphen_keeps_phone_number() {
        let xml = document(
            r#"<w:p><w:r><w:t xml:space="preserve">Call 336</w:t><w:noBreakHyphen/><w:t>555-1212</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs(&xml).unwrap(), vec!["Call 336-555-1212"]);
    }

    #[test]
    fn test_soft_hyphen_is_dropped() {
        let xml = document(
            r#"<w:p><w:r><w:t>Jo</w:t><w:softHyphen/><w:t>hnson</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs(&xml).unwrap(), vec!["Johnson"]);
    }

    #[test]
    fn test_symbol_characters() {
        let xml = document(
            r#"<w:p><w:r><w:t xml:space="preserve">Phone </w:t><w:sym w:font="Wingdings" w:char="F028"/><w:sym w:font="Symbol" w:char="40"/><w:sym w:char="zz"/></w:r></w:p>"#,
        );
        assert_eq!(paragraphs(&xml).unwrap(), vec!["Phone \u{f028}@"]);
    }

    #[test]
    fn test_alternate_content_fallback_is_skipped() {
        let xml = document(
            r#"<w:p><w:r><mc:AlternateContent xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"><mc:Choice Requires="wps"><w:drawing><w:txbxContent><w:p><w:r><w:t>jsmith@example.com</w:t></w:r></w:p></w:txbxContent></w:drawing></mc:Choice><mc:Fallback><w:pict><w:txbxContent><w:p><w:r><w:t>jsmith@example.com</w:t></w:r></w:p></w:txbxContent></w:pict></mc:Fallback></mc:AlternateContent></w:r><w:r><w:t>Body</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs(&xml).unwrap(), vec!["jsmith@example.com", "Body"]);
    }

    #[test]
    fn test_not_a_zip() {
        assert!(extract(b"plain bytes").is_err());
    }

    #[test]
    fn test_mismatched_tags() {
        let xml = document("<w:p><w:r><w:t>broken</w:r></w:p>");
        assert!(paragraphs(&xml).is_err());
    }
}
