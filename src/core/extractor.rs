//! Format-aware text extraction
//!
//! Normalizes plain text, PDF, DOCX and XLSX files into an ordered list of
//! strings. Dispatch is a closed match over [`DocumentFormat`], one handler per
//! variant in [`crate::core::formats`].

use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use crate::core::formats::{docx, pdf, text, xlsx};
use crate::utils::file_utils::{file_extension, read_file_bytes};

/// Errors raised while extracting text from a single file
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The file extension is not one of the supported formats
    #[error("Unsupported file format '{extension}': {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The file has a supported extension but could not be parsed
    #[error("Malformed {format} document {}: {reason}", .path.display())]
    MalformedDocument {
        path: PathBuf,
        format: DocumentFormat,
        reason: String,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub fn path(&self) -> &Path {
        match self {
            ExtractError::UnsupportedFormat { path, .. }
            | ExtractError::MalformedDocument { path, .. }
            | ExtractError::Io { path, .. } => path,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, ExtractError::UnsupportedFormat { .. })
    }
}

/// Document formats the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// `.txt` - one string per physical line
    PlainText,
    /// `.pdf` - one string per non-blank text line
    Pdf,
    /// `.docx` - one string per paragraph
    Docx,
    /// `.xlsx` - joined rows and populated cells
    Spreadsheet,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 4] = [
        DocumentFormat::PlainText,
        DocumentFormat::Pdf,
        DocumentFormat::Docx,
        DocumentFormat::Spreadsheet,
    ];

    /// Determine the format from the file extension (case-insensitive)
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    ///
    /// # Returns
    ///
    /// The matching format, or `ExtractError::UnsupportedFormat`
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = file_extension(path).unwrap_or_default();

        match extension.as_str() {
            "txt" => Ok(DocumentFormat::PlainText),
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "xlsx" => Ok(DocumentFormat::Spreadsheet),
            _ => Err(ExtractError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "txt",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Spreadsheet => "xlsx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentFormat::PlainText => "text",
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Spreadsheet => "XLSX",
        };
        f.write_str(label)
    }
}

/// Check whether a path has one of the supported extensions
pub fn is_supported(path: &Path) -> bool {
    DocumentFormat::from_path(path).is_ok()
}

/// Extract the readable text of a file as an ordered list of strings.
///
/// The file is read into memory and closed before parsing starts. An empty
/// file yields an empty list.
///
/// # Arguments
///
/// * `path` - Path to the file
///
/// # Returns
///
/// The extracted lines in source reading order
pub fn extract_text(path: &Path) -> Result<Vec<String>, ExtractError> {
    let format = DocumentFormat::from_path(path)?;
    extract_text_as(path, format)
}

/// Extract text treating the file as `format` regardless of its extension
pub fn extract_text_as(path: &Path, format: DocumentFormat) -> Result<Vec<String>, ExtractError> {
    let bytes = read_file_bytes(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.is_empty() {
        debug!("Empty file: {}", path.display());
        return Ok(Vec::new());
    }

    let parsed = match format {
        DocumentFormat::PlainText => Ok(text::extract(&bytes)),
        DocumentFormat::Pdf => pdf::extract(&bytes),
        DocumentFormat::Docx => docx::extract(&bytes),
        DocumentFormat::Spreadsheet => xlsx::extract(&bytes),
    };

    let lines = parsed.map_err(|reason| ExtractError::MalformedDocument {
        path: path.to_path_buf(),
        format,
        reason,
    })?;

    debug!(
        "Extracted {} lines from {} file {}",
        lines.len(),
        format,
        path.display()
    );

    Ok(lines)
}
