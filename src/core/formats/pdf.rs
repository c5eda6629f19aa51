//! PDF handler

use std::panic;

use crate::app::panic_message;

/// Extract the text layer of a PDF, one string per non-blank line.
///
/// Lines are trimmed at both ends; internal spacing is left as the PDF
/// renders it.
pub fn extract(bytes: &[u8]) -> Result<Vec<String>, String> {
    // pdf-extract panics on some malformed inputs instead of returning an error
    let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|payload| format!("PDF parser panicked: {}", panic_message(payload.as_ref())))?
        .map_err(|e| e.to_string())?;

    Ok(split_lines(&text))
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
