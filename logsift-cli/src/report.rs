//! Report writing
//!
//! Persists one analysis report per failed step and mirrors the reports into
//! the GitHub step summary when one is configured.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use logsift_core::domain::artifact::report_file_name;
use logsift_core::domain::summary::Summary;

use crate::display;

/// A report written to disk
#[derive(Debug, Clone)]
pub struct Report {
    pub job_name: String,
    pub path: PathBuf,
    pub content: String,
}

/// Writes analysis reports into a fixed directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes the report of one step and prints it
    ///
    /// The directory is created on first use. Existing reports are never
    /// overwritten: a second report of the same job within the same second
    /// gets a numbered file name.
    pub fn write_report(
        &self,
        job_name: &str,
        summary: &Summary,
        timestamp: &str,
    ) -> io::Result<Report> {
        let content = format_report(job_name, summary);

        fs::create_dir_all(&self.dir)?;
        let (path, mut file) = self.create_report_file(job_name, timestamp)?;
        file.write_all(content.as_bytes())?;

        display::print_report(job_name, summary);

        Ok(Report {
            job_name: job_name.to_string(),
            path,
            content,
        })
    }

    fn create_report_file(&self, job_name: &str, timestamp: &str) -> io::Result<(PathBuf, File)> {
        let mut duplicate = 0;
        loop {
            let path = self.dir.join(report_file_name(job_name, timestamp, duplicate));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => duplicate += 1,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Report body: a header naming the job followed by the summary
pub fn format_report(job_name: &str, summary: &Summary) -> String {
    format!("Job Name: {}\n{}", job_name, summary.text)
}

// =============================================================================
// Step Summary
// =============================================================================

/// Appends the reports of a run to the GitHub step summary file
///
/// `skipped` is the number of failed steps that produced no report. A run
/// with neither reports nor skipped steps is recorded as successful.
pub fn append_step_summary(path: &Path, reports: &[Report], skipped: usize) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if reports.is_empty() && skipped == 0 {
        writeln!(file, "### All jobs ran successfully")?;
        return Ok(());
    }

    for report in reports {
        writeln!(file, "### Job Name: {}", report.job_name)?;
        writeln!(
            file,
            "{}",
            report
                .content
                .replace("Root Cause Summary:", "Root cause of Job failure:")
        )?;
        writeln!(file)?;
    }

    if skipped > 0 {
        writeln!(
            file,
            "### {} failed step(s) could not be analysed, see the job logs",
            skipped
        )?;
    }

    Ok(())
}
