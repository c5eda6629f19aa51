//! One text handler per supported document format
//!
//! Each handler takes the raw file bytes and returns the extracted lines, or a
//! human readable reason when the document cannot be parsed.

pub mod docx;
pub mod pdf;
pub mod text;
pub mod xlsx;
