//! Core PII analyzer implementation
//!
//! Runs text extraction followed by pattern detection for each file and
//! aggregates per-file reports and failures. A failing file never aborts the
//! scan of the remaining files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, error, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::core::extractor::{extract_text_as, DocumentFormat, ExtractError};
use crate::core::patterns::{Anchoring, PatternRegistry};

/// Characters trimmed from both ends of a candidate token
const TOKEN_WRAPPERS: &[char] = &['(', ')', '[', ']', '<', '>', '"', '\'', '“', '”', '‘', '’'];

/// Characters trimmed from the end of a candidate token
const TOKEN_TRAILERS: &[char] = &['.', ':', '!', '?'];

/// One PII hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Name of the pattern that fired
    pub pattern: String,
    /// Zero-based index into the extracted lines
    pub line: usize,
    /// The line for substring patterns, the matching token for whole-string patterns
    pub value: String,
}

/// Analysis result for a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub format: DocumentFormat,
    /// Number of extracted lines
    pub lines: usize,
    pub findings: Vec<Finding>,
}

impl FileReport {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Distinct pattern names that fired, in first-seen order
    pub fn patterns_found(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.findings
            .iter()
            .map(|f| f.pattern.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

/// A file whose text could not be extracted
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Aggregated result of analyzing many files
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    /// Reports in input order
    pub reports: Vec<FileReport>,
    /// Files that failed extraction
    pub failures: Vec<ScanFailure>,
    /// Files with unsupported extensions
    pub skipped: Vec<PathBuf>,
}

impl ScanSummary {
    pub fn files_analyzed(&self) -> usize {
        self.reports.len()
    }

    pub fn total_findings(&self) -> usize {
        self.reports.iter().map(|r| r.findings.len()).sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn record(&mut self, path: &Path, outcome: Result<FileReport, ExtractError>) {
        match outcome {
            Ok(report) => self.reports.push(report),
            Err(e) if e.is_unsupported() => {
                warn!("Skipping unsupported file {}", path.display());
                self.skipped.push(path.to_path_buf());
            }
            Err(e) => {
                error!("Error analyzing {}: {}", path.display(), e);
                self.failures.push(ScanFailure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Core file analyzer structure
#[derive(Debug, Clone)]
pub struct FileAnalyzer {
    /// Patterns evaluated against every extracted line
    registry: PatternRegistry,
}

impl Default for FileAnalyzer {
    fn default() -> Self {
        Self::new(PatternRegistry::with_defaults())
    }
}

impl FileAnalyzer {
    /// Create a new FileAnalyzer instance
    ///
    /// # Arguments
    ///
    /// * `registry` - Patterns to evaluate
    pub fn new(registry: PatternRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Evaluate every pattern against every line.
    ///
    /// Substring patterns see the whole line. Whole-string patterns see the
    /// whole line first; when that does not match they are tried on each
    /// candidate token of the line, so an email inside a sentence is still
    /// found while the predicate itself keeps its anchoring.
    pub fn analyze_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref();

            for pattern in self.registry.iter() {
                if pattern.matches(line) {
                    findings.push(Finding {
                        pattern: pattern.name().to_string(),
                        line: index,
                        value: line.to_string(),
                    });
                    continue;
                }

                if pattern.anchoring() == Anchoring::Substring {
                    continue;
                }

                let mut seen = HashSet::new();
                for token in candidate_tokens(line) {
                    if token != line && pattern.matches(token) && seen.insert(token) {
                        findings.push(Finding {
                            pattern: pattern.name().to_string(),
                            line: index,
                            value: token.to_string(),
                        });
                    }
                }
            }
        }

        findings
    }

    /// Analyze a file and extract its PII findings
    ///
    /// # Arguments
    ///
    /// * `file_path` - Path to the file to analyze
    ///
    /// # Returns
    ///
    /// The file report, or the extraction error for this file
    pub fn analyze_file(&self, file_path: &Path) -> Result<FileReport, ExtractError> {
        // Determine the format before touching the file
        let format = DocumentFormat::from_path(file_path)?;
        info!("Analyzing {} file: {}", format, file_path.display());

        // Extract text
        let start_time = Instant::now();
        let lines = extract_text_as(file_path, format)?;

        // Run every pattern over the extracted lines
        let findings = self.analyze_lines(&lines);

        debug!(
            "{}: {} lines, {} findings in {:?}",
            file_path.display(),
            lines.len(),
            findings.len(),
            start_time.elapsed()
        );

        Ok(FileReport {
            path: file_path.to_path_buf(),
            format,
            lines: lines.len(),
            findings,
        })
    }

    /// Analyze many files, tolerating per-file failures
    ///
    /// # Arguments
    ///
    /// * `files` - Paths to analyze
    /// * `workers` - 1 for sequential processing, 0 for one worker per CPU
    ///
    /// # Returns
    ///
    /// Reports in input order plus the failed and skipped files
    pub fn analyze_paths(&self, files: &[PathBuf], workers: usize) -> ScanSummary {
        self.analyze_paths_with(files, workers, || {})
    }

    /// Same as [`FileAnalyzer::analyze_paths`], calling `on_file_done` after each file
    pub fn analyze_paths_with<F>(
        &self,
        files: &[PathBuf],
        workers: usize,
        on_file_done: F,
    ) -> ScanSummary
    where
        F: Fn() + Sync,
    {
        let outcomes: Vec<Result<FileReport, ExtractError>> = if workers == 1 {
            files
                .iter()
                .map(|path| {
                    let outcome = self.analyze_file(path);
                    on_file_done();
                    outcome
                })
                .collect()
        } else {
            let run = || -> Vec<Result<FileReport, ExtractError>> {
                files
                    .par_iter()
                    .map(|path| {
                        let outcome = self.analyze_file(path);
                        on_file_done();
                        outcome
                    })
                    .collect()
            };

            // Use a dedicated pool when a worker count is given
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    error!("Failed to build thread pool, using the global pool: {}", e);
                    run()
                }
            }
        };

        // Collect results in input order
        let mut summary = ScanSummary::default();
        for (path, outcome) in files.iter().zip(outcomes) {
            summary.record(path, outcome);
        }

        info!(
            "Analyzed {} files: {} findings, {} failures, {} skipped",
            summary.files_analyzed(),
            summary.total_findings(),
            summary.failures.len(),
            summary.skipped.len()
        );

        summary
    }
}

/// Split a line into candidate values for whole-string patterns
fn candidate_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .map(|token| {
            token
                .trim_matches(TOKEN_WRAPPERS)
                .trim_end_matches(TOKEN_TRAILERS)
                .trim_matches(TOKEN_WRAPPERS)
        })
        .filter(|token| !token.is_empty())
}
