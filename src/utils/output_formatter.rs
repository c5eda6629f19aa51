//! Output formatter for scan results
//!
//! Console rendering and JSON serialization of a [`ScanSummary`]. Results
//! are written to stdout only.

use std::collections::BTreeMap;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::core::analyzer::{FileReport, ScanSummary};

/// Turn a pattern name such as `bank_account` into `Bank Account`
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format the findings of one file for console output
///
/// # Arguments
///
/// * `report` - Report for a single file
/// * `use_markdown` - Whether to wrap the output in triple backticks
///
/// # Returns
///
/// Formatted string for console output
pub fn format_report(report: &FileReport, use_markdown: bool) -> String {
    let mut output = String::new();

    if use_markdown {
        output.push_str("```\n");
    }

    if report.findings.is_empty() {
        output.push_str("No PII detected.\n");
    } else {
        // Group by pattern, keeping line order within each group
        let mut grouped: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for finding in &report.findings {
            grouped
                .entry(finding.pattern.as_str())
                .or_default()
                .push(format!("line {}: {}", finding.line + 1, finding.value));
        }

        for (pattern, values) in grouped {
            output.push_str(&format!(
                "  {}: {}\n",
                title_case(pattern).cyan().bold(),
                values.len()
            ));
            for value in values {
                output.push_str(&format!("    - {}\n", value));
            }
            output.push('\n');
        }
    }

    if use_markdown {
        output.push_str("```\n");
    }

    output
}

/// Format a whole scan for console output
pub fn format_summary(summary: &ScanSummary, use_markdown: bool, summary_only: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", "Scan Complete".bold()));
    output.push_str(&format!("{} {}\n", "Files analyzed:".green(), summary.files_analyzed()));
    output.push_str(&format!(
        "{} {}\n",
        "Files with PII:".green(),
        summary.reports.iter().filter(|r| r.has_findings()).count()
    ));
    output.push_str(&format!("{} {}\n", "Total findings:".green(), summary.total_findings()));

    if !summary.skipped.is_empty() {
        output.push_str(&format!(
            "{} {}\n",
            "Unsupported files skipped:".yellow(),
            summary.skipped.len()
        ));
    }

    if !summary.failures.is_empty() {
        output.push_str(&format!("{} {}\n", "Failed files:".red(), summary.failures.len()));
        for failure in &summary.failures {
            output.push_str(&format!("  - {}\n", failure.error));
        }
    }

    if summary_only {
        return output;
    }

    for report in summary.reports.iter().filter(|r| r.has_findings()) {
        output.push_str(&format!("\n{}\n", "=".repeat(80).bold()));
        output.push_str(&format!(
            "{} {} ({})\n",
            "Results for:".cyan(),
            report.path.display(),
            report.format
        ));
        output.push_str(&format!("{}\n", "=".repeat(80).bold()));
        output.push_str(&format_report(report, use_markdown));
    }

    output
}

/// Serialize a scan to pretty JSON
pub fn summary_to_json(summary: &ScanSummary) -> Result<String> {
    let value = json!({
        "files_analyzed": summary.files_analyzed(),
        "total_findings": summary.total_findings(),
        "reports": summary.reports,
        "failures": summary.failures,
        "skipped": summary.skipped,
    });

    Ok(serde_json::to_string_pretty(&value)?)
}
