//! File handling utilities
//!
//! Small helpers shared by the extractor and the directory scanner.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Lower-cased extension of a path, if it has one
///
/// # Arguments
///
/// * `file_path` - Path to inspect
///
/// # Returns
///
/// The suffix after the last `.` of the file name, lower-cased
pub fn file_extension(file_path: &Path) -> Option<String> {
    file_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Read a whole file into memory.
///
/// The handle lives only for the duration of this call and is closed on
/// every return path.
pub fn read_file_bytes(file_path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(file_path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Size of a file in bytes, following symlinks
pub fn file_size(file_path: &Path) -> io::Result<u64> {
    fs::metadata(file_path).map(|metadata| metadata.len())
}

/// Convert a size in megabytes to bytes, saturating at `u64::MAX`
pub fn megabytes(mb: u64) -> u64 {
    mb.saturating_mul(1024 * 1024)
}
