//! Core module for PII scanning
//!
//! This module contains the extraction, pattern matching, directory scanning
//! and per-file analysis components.

pub mod analyzer;
pub mod extractor;
pub mod formats;
pub mod patterns;
pub mod scanner;
