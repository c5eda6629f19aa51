//! Utility modules for the PII scanner
//!
//! File handling helpers and result formatting.

pub mod file_utils;
pub mod output_formatter;
