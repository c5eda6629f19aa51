//! Directory scanning
//!
//! Recursively enumerates regular files beneath a root directory and narrows
//! the result with an optional [`FileFilter`].

use std::path::{Path, PathBuf};

use log::{debug, warn};
use regex::Regex;
use walkdir::WalkDir;

use crate::utils::file_utils::file_size;

/// List every regular file beneath `root`, recursively.
///
/// Symbolic links are not followed. Entries that cannot be read are logged
/// and skipped. Order is whatever the platform returns.
pub fn scan_files<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let root = root.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable entry under {}: {}", root.display(), e),
        }
    }

    debug!("Found {} files under {}", files.len(), root.display());
    files
}

/// Include/exclude and size limits applied to scanned paths
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
    max_file_size: Option<u64>,
    max_files: Option<usize>,
}

impl FileFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keep paths matching at least one of these globs
    pub fn include<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.include.extend(patterns.iter().map(|p| glob_to_regex(p.as_ref())));
        self
    }

    /// Drop paths matching any of these globs
    pub fn exclude<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.exclude.extend(patterns.iter().map(|p| glob_to_regex(p.as_ref())));
        self
    }

    /// Skip files larger than `bytes`
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Stop after `count` accepted files
    pub fn max_files(mut self, count: usize) -> Self {
        self.max_files = Some(count);
        self
    }

    /// Check the glob rules for a single path
    pub fn matches(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        let included =
            self.include.is_empty() || self.include.iter().any(|re| re.is_match(&path_str));
        let excluded = self.exclude.iter().any(|re| re.is_match(&path_str));

        included && !excluded
    }

    /// Apply every rule to `paths`, preserving order
    pub fn apply(&self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        let mut accepted = Vec::new();

        for path in paths {
            if let Some(max_files) = self.max_files {
                if accepted.len() >= max_files {
                    warn!("Reached maximum file limit ({})", max_files);
                    break;
                }
            }

            if !self.matches(&path) {
                debug!("Filtered out {}", path.display());
                continue;
            }

            if let Some(limit) = self.max_file_size {
                match file_size(&path) {
                    Ok(size) if size > limit => {
                        warn!(
                            "Skipping {}: exceeds maximum file size ({:.2} MB)",
                            path.display(),
                            size as f64 / 1024.0 / 1024.0
                        );
                        continue;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Error reading metadata for {}: {}", path.display(), e);
                        continue;
                    }
                }
            }

            accepted.push(path);
        }

        accepted
    }
}

/// Translate a `*`/`?` glob into an anchored regex
fn glob_to_regex(pattern: &str) -> Regex {
    let escaped = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");

    Regex::new(&format!("^{}$", escaped)).expect("escaped glob is a valid regex")
}
