//! PII Scanner - find personally identifiable information in document trees
//!
//! This library extracts text from plain text, PDF, DOCX and XLSX files and
//! checks it against pattern rules for names, bank account numbers, email
//! addresses, phone numbers and social security numbers.

pub mod core;
pub mod utils;

// Re-export main types for convenience
pub use crate::core::analyzer::{FileAnalyzer, FileReport, Finding, ScanFailure, ScanSummary};
pub use crate::core::extractor::{extract_text, DocumentFormat, ExtractError};
pub use crate::core::patterns::{
    is_bank_account_number, is_email_address, is_likely_name, is_phone_number, is_ssn,
    PatternRegistry, PiiPattern,
};
pub use crate::core::scanner::{scan_files, FileFilter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze a single file with the builtin patterns
///
/// This is a convenience function for simple use cases.
///
/// # Arguments
///
/// * `file_path` - Path to the file to analyze
///
/// # Returns
///
/// The findings for the file
pub fn analyze_file<P: AsRef<std::path::Path>>(file_path: P) -> Result<FileReport, ExtractError> {
    FileAnalyzer::default().analyze_file(file_path.as_ref())
}

/// Library configuration
pub mod config {
    use std::path::{Path, PathBuf};

    use log::info;
    use serde::Deserialize;

    use crate::core::patterns::{PatternRegistry, PiiPattern};
    use crate::core::scanner::FileFilter;
    use crate::utils::file_utils::megabytes;

    /// Errors raised while loading or applying configuration
    #[derive(Debug, thiserror::Error)]
    pub enum ConfigError {
        #[error("Configuration file not found: {}", .0.display())]
        NotFound(PathBuf),

        #[error("Failed to read configuration file {}: {source}", .path.display())]
        Read {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },

        #[error("Invalid JSON in configuration file {}: {source}", .path.display())]
        Parse {
            path: PathBuf,
            #[source]
            source: serde_json::Error,
        },

        #[error("Unknown pattern names: {}", .0.join(", "))]
        UnknownPatterns(Vec<String>),

        #[error("Invalid regex for custom pattern '{name}': {source}")]
        InvalidPattern {
            name: String,
            #[source]
            source: regex::Error,
        },
    }

    /// A user defined regex rule
    #[derive(Debug, Clone, Deserialize, PartialEq)]
    pub struct CustomPattern {
        pub name: String,
        pub regex: String,
        #[serde(default)]
        pub anchored: bool,
    }

    /// Scan settings, loadable from a JSON file
    #[derive(Debug, Clone, Deserialize, PartialEq)]
    #[serde(default)]
    pub struct ScanConfig {
        /// Files larger than this are skipped
        pub max_file_size_mb: u64,
        /// Stop after this many files
        pub max_files: usize,
        /// Include globs; empty means everything
        pub include: Vec<String>,
        pub exclude: Vec<String>,
        /// Enabled builtin patterns; `None` enables all of them
        pub patterns: Option<Vec<String>>,
        pub custom_patterns: Vec<CustomPattern>,
        /// Worker threads, 0 for one per CPU
        pub parallel: usize,
    }

    impl Default for ScanConfig {
        fn default() -> Self {
            Self {
                max_file_size_mb: 50,
                max_files: 1000,
                include: Vec::new(),
                exclude: Vec::new(),
                patterns: None,
                custom_patterns: Vec::new(),
                parallel: 0,
            }
        }
    }

    impl ScanConfig {
        /// Load configuration from a JSON file
        pub fn load(path: &Path) -> Result<Self, ConfigError> {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }

            let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let config = serde_json::from_str(&config_str).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }

        /// Build the pattern registry described by this configuration
        pub fn registry(&self) -> Result<PatternRegistry, ConfigError> {
            let mut registry = PatternRegistry::with_defaults();

            if let Some(enabled) = &self.patterns {
                let unknown = registry.retain(enabled.as_slice());
                if !unknown.is_empty() {
                    return Err(ConfigError::UnknownPatterns(unknown));
                }
            }

            for custom in &self.custom_patterns {
                let pattern = PiiPattern::from_regex(&custom.name, &custom.regex, custom.anchored)
                    .map_err(|source| ConfigError::InvalidPattern {
                        name: custom.name.clone(),
                        source,
                    })?;
                registry.register(pattern);
            }

            Ok(registry)
        }

        /// Build the file filter described by this configuration
        pub fn file_filter(&self) -> FileFilter {
            FileFilter::new()
                .include(self.include.as_slice())
                .exclude(self.exclude.as_slice())
                .max_file_size(megabytes(self.max_file_size_mb))
                .max_files(self.max_files)
        }
    }

}

/// Command-line application functionality
pub mod app {
    use std::any::Any;
    use std::panic;
    use std::path::Path;

    use anyhow::{Context, Result};
    use log::error;

    use crate::config::ScanConfig;
    use crate::core::analyzer::{FileAnalyzer, ScanSummary};
    use crate::core::scanner::scan_files;

    /// Scan a directory tree with the given configuration
    ///
    /// # Arguments
    ///
    /// * `root` - Directory to scan recursively
    /// * `config` - Scan settings
    ///
    /// # Returns
    ///
    /// Results for all files that passed the filter
    pub fn run_scan(root: &Path, config: &ScanConfig) -> Result<ScanSummary> {
        let registry = config
            .registry()
            .context("Failed to build pattern registry")?;
        let files = config.file_filter().apply(scan_files(root));

        Ok(FileAnalyzer::new(registry).analyze_paths(&files, config.parallel))
    }

    /// Send panic messages to the log instead of stderr.
    ///
    /// Document parsers can panic on hostile input. Those panics are caught per
    /// file, and the default hook would still print over the progress bar.
    pub fn log_panics() {
        panic::set_hook(Box::new(|info| {
            let location = info
                .location()
                .map(|l| format!(" at {}:{}", l.file(), l.line()))
                .unwrap_or_default();
            error!("Panic{}: {}", location, panic_message(info.payload()));
        }));
    }

    /// Text of a panic payload, when it carries one
    pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
        if let Some(message) = payload.downcast_ref::<&str>() {
            message
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.as_str()
        } else {
            "unknown panic payload"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_panic_message() {
            let payload = panic::catch_unwind(|| panic!("parser gave up")).unwrap_err();
            assert_eq!(panic_message(payload.as_ref()), "parser gave up");

            let payload = panic::catch_unwind(|| panic!("bad object {}", 7)).unwrap_err();
            assert_eq!(panic_message(payload.as_ref()), "bad object 7");

            let payload = panic::catch_unwind(|| panic::panic_any(42)).unwrap_err();
            assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
        }
    }
}
