/// Simple example demonstrating how to use the PII scanner library
use anyhow::Result;
use pii_scanner::config::ScanConfig;
use pii_scanner::{analyze_file, app};

fn main() -> Result<()> {
    let dir = std::env::temp_dir().join("pii_scanner_demo");
    std::fs::create_dir_all(&dir)?;

    // Create sample file
    let file_path = dir.join("address_book.txt");
    std::fs::write(
        &file_path,
        "Name,Phone\n\
         John Jones,336-555-1212\n\
         Contact: jjones@example.com\n\
         Account 123456789012\n\
         SSN 078-05-1120\n",
    )?;

    println!("Analyzing file: {}", file_path.display());

    let report = analyze_file(&file_path)?;
    for finding in &report.findings {
        println!("  [{}] line {}: {}", finding.pattern, finding.line + 1, finding.value);
    }

    // Scan the whole directory with only email and phone enabled
    let config = ScanConfig {
        patterns: Some(vec!["email".to_string(), "phone".to_string()]),
        ..ScanConfig::default()
    };
    let summary = app::run_scan(&dir, &config)?;

    println!(
        "\nScanned {} files, {} findings, {} failures",
        summary.files_analyzed(),
        summary.total_findings(),
        summary.failures.len()
    );

    std::fs::remove_dir_all(&dir)?;

    Ok(())
}
