//! Output formatting for post-processing reports.
//!
//! Provides JSON and plain-text formatters for `PostProcessReport`.

use std::io::Write;

use crate::report::PostProcessReport;

/// Format a `PostProcessReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &PostProcessReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `PostProcessReport` as human-readable plain text to a writer.
///
/// One line per filtered page, one per rename, then every reported error.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &PostProcessReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    for page in &report.filtered_files {
        writeln!(writer, "Removed line from {}", page.display())?;
    }
    for error in &report.filter_errors {
        writeln!(writer, "{}", error.format_human_readable())?;
    }
    for renamed in &report.renamed {
        writeln!(
            writer,
            "Renamed {} -> {}",
            renamed.from.display(),
            renamed.to.display()
        )?;
    }
    if !report.walk_errors.is_empty() {
        writeln!(writer, "Error walking directory:")?;
        for error in &report.walk_errors {
            writeln!(writer, "  {}", error.format_human_readable())?;
        }
    }
    if let Some(root_page) = &report.root_page {
        writeln!(writer, "Root page moved to {}", root_page.display())?;
    }
    writeln!(
        writer,
        "{} page(s) filtered, {} file(s) renamed, {} error(s)",
        report.filtered_files.len(),
        report.renamed.len(),
        report.errors_count()
    )?;
    Ok(())
}
