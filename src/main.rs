//! PII Scanner - find personally identifiable information in document trees
//!
//! The main entry point for the scanner. It parses command-line arguments,
//! collects the files to scan and prints the results.

use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn, LevelFilter};
use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use pii_scanner::app;
use pii_scanner::config::ScanConfig;
use pii_scanner::core::analyzer::{FileAnalyzer, ScanSummary};
use pii_scanner::core::scanner::scan_files;
use pii_scanner::utils::output_formatter;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "pii_scanner",
    version,
    about = "Scan documents for personally identifiable information",
    long_about = "Extracts text from .txt, .pdf, .docx and .xlsx files and reports lines that look like:
- Person names
- Bank account numbers
- Email addresses
- Phone numbers
- Social security numbers"
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .multiple(true)
        .args(["file_paths", "dir"]),
))]
struct Args {
    /// Path(s) to the file(s) to scan
    #[arg(name = "file_paths")]
    file_paths: Vec<PathBuf>,

    /// Scan all files in directory (recursively)
    #[arg(long = "dir")]
    dir: Option<PathBuf>,

    /// Exclude file pattern (glob syntax, can be used multiple times)
    #[arg(long = "exclude", action = ArgAction::Append)]
    exclude: Option<Vec<String>>,

    /// Include only file pattern (glob syntax, can be used multiple times)
    #[arg(long = "include", action = ArgAction::Append)]
    include: Option<Vec<String>>,

    /// Maximum file size to scan in MB (default: 50)
    #[arg(long = "max-size")]
    max_size: Option<u64>,

    /// Maximum number of files to scan (default: 1000)
    #[arg(long = "max-files")]
    max_files: Option<usize>,

    /// Comma separated pattern names to enable (default: all)
    #[arg(long = "patterns", value_delimiter = ',')]
    patterns: Option<Vec<String>>,

    /// Output in markdown format (wrapped in triple backticks)
    #[arg(long = "md", action = ArgAction::SetTrue)]
    md: bool,

    /// Print results as JSON instead of text
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Show only summary information
    #[arg(long = "summary-only", action = ArgAction::SetTrue)]
    summary_only: bool,

    /// Path to JSON configuration file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Number of parallel workers (0=auto)
    #[arg(long = "parallel")]
    parallel: Option<usize>,

    /// Set logging level (default: INFO)
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,

    /// Log file path (default: pii_scanner.log)
    #[arg(long = "log-file", default_value = "pii_scanner.log")]
    log_file: String,
}

/// Main entry point function
fn main() -> Result<()> {
    let start_time = Instant::now();

    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    setup_logging(&args);
    app::log_panics();

    // Load configuration and build the pattern set
    let config = load_config(&args)?;
    let registry = config
        .registry()
        .context("Invalid pattern configuration")?;

    // Get files to scan
    let files_to_scan = get_files_to_scan(&args, &config);
    if files_to_scan.is_empty() {
        eprintln!("{}", "Error: No files specified or found for scanning".red());
        eprintln!("Run with --help for usage information");
        process::exit(1);
    }

    // Analyze files
    let analyzer = FileAnalyzer::new(registry);
    let summary = scan_with_progress(&analyzer, &files_to_scan, &config, &args);

    // Output results
    if args.json {
        println!("{}", output_formatter::summary_to_json(&summary)?);
    } else if !args.quiet {
        print!(
            "{}",
            output_formatter::format_summary(&summary, args.md, args.summary_only)
        );
        println!(
            "{} {:.2} seconds",
            "Time elapsed:".green(),
            start_time.elapsed().as_secs_f64()
        );
    }

    // Failed files are reported through the exit status
    if summary.has_failures() {
        process::exit(2);
    }

    Ok(())
}

/// Set up logging with file output
fn setup_logging(args: &Args) {
    let mut builder = env_logger::Builder::new();

    // Set log level
    builder.filter_level(args.log_level);

    // Set format
    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    // Log to file
    if let Ok(file) = File::create(&args.log_file) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
}

/// Load configuration from file if provided, then apply command line overrides
fn load_config(args: &Args) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };

    // Command line flags take precedence over the file
    if let Some(include) = &args.include {
        config.include = include.clone();
    }
    if let Some(exclude) = &args.exclude {
        config.exclude = exclude.clone();
    }
    if let Some(max_size) = args.max_size {
        config.max_file_size_mb = max_size;
    }
    if let Some(max_files) = args.max_files {
        config.max_files = max_files;
    }
    if let Some(patterns) = &args.patterns {
        config.patterns = Some(patterns.clone());
    }
    if let Some(parallel) = args.parallel {
        config.parallel = parallel;
    }

    Ok(config)
}

/// Get list of files to scan based on command line arguments
fn get_files_to_scan(args: &Args, config: &ScanConfig) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Add individual files
    for path in &args.file_paths {
        if path.is_file() {
            candidates.push(path.clone());
        } else if path.exists() {
            warn!("Skipping {}: not a file", path.display());
        } else {
            error!("File not found: {}", path.display());
        }
    }

    // Add files from directory
    if let Some(dir) = &args.dir {
        if dir.is_dir() {
            candidates.extend(scan_files(dir));
        } else {
            error!("Directory not found: {}", dir.display());
        }
    }

    // Apply include/exclude patterns and limits
    config.file_filter().apply(candidates)
}

/// Scan files with a progress bar unless output is suppressed
fn scan_with_progress(
    analyzer: &FileAnalyzer,
    files: &[PathBuf],
    config: &ScanConfig,
    args: &Args,
) -> ScanSummary {
    let show_progress = !args.quiet && !args.json;

    if !show_progress {
        return analyzer.analyze_paths(files, config.parallel);
    }

    println!("\n{} {} files...", "Scanning".bold(), files.len());

    // Set up progress bar
    let progress_bar = ProgressBar::new(files.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
    {
        progress_bar.set_style(style.progress_chars("#>-"));
    }

    // Process files
    let summary = analyzer.analyze_paths_with(files, config.parallel, || progress_bar.inc(1));
    progress_bar.finish_with_message("Scan complete");

    summary
}
