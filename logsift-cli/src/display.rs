//! Console output
//!
//! Everything the user reads on stdout goes through here. Diagnostics go to
//! the tracing subscriber on stderr.

use colored::*;
use logsift_core::domain::run::FailedStep;
use logsift_core::domain::summary::Summary;
use logsift_core::dto::github::{Conclusion, JobsResponse};

use crate::service::{RunReport, StepError, StepReport};

/// Print one line per job of the run
pub fn print_job_statuses(jobs: &JobsResponse) {
    println!("{}", "Listing all job statuses:".bold());
    for job in &jobs.jobs {
        let line = job.status_line();
        let line = match job.conclusion {
            Some(Conclusion::Success) => line.green(),
            Some(Conclusion::Failure) | Some(Conclusion::TimedOut) => line.red(),
            Some(_) => line.yellow(),
            None => line.dimmed(),
        };
        println!("  {}", line);
    }
    println!();
}

pub fn print_no_failed_steps() {
    println!("{}", "No failed steps found.".yellow());
}

/// Print the header announcing a step about to be analysed
pub fn print_step_header(step: &FailedStep, index: usize, total: usize) {
    println!(
        "{} [{}/{}] {} - {}",
        "▸".cyan(),
        index,
        total,
        step.job_name.bold(),
        step.step_name
    );
}

/// Print a report as written to disk
pub fn print_report(job_name: &str, summary: &Summary) {
    println!("{}", "─".repeat(80).dimmed());
    println!("Job Name: {}", job_name.bold());
    if summary.is_fallback() {
        println!("{}", summary.text.yellow());
    } else {
        println!("{}", summary.text);
    }
    println!("{}", "─".repeat(80).dimmed());
}

/// Print the outcome of an analysed step
pub fn print_step_success(report: &StepReport) {
    println!(
        "  Logs:          {} ({} chunk(s))",
        report.log_path.display().to_string().dimmed(),
        report.chunk_count
    );
    if report.summary.is_fallback() {
        println!(
            "  {}",
            "The analysis service returned no summary content".yellow()
        );
    }
    println!(
        "  Input Tokens:  {}",
        report.usage.input.to_string().dimmed()
    );
    println!(
        "  Output Tokens: {}",
        report.usage.output.to_string().dimmed()
    );
    println!(
        "  Total Tokens:  {}",
        report.usage.total().to_string().dimmed()
    );
    println!(
        "  {} Analysis saved to {}",
        "✓".green(),
        report.report.path.display()
    );
    println!();
}

/// Print the diagnostic line of a failed step
pub fn print_step_failure(step: &FailedStep, error: &StepError) {
    eprintln!(
        "{} Failed to analyze logs for {} - {}: {}",
        "✗".red(),
        step.job_name,
        step.step_name,
        error.to_string().red()
    );
}

/// Print the totals of a run
pub fn print_run_summary(report: &RunReport) {
    if report.outcomes.is_empty() {
        return;
    }

    let succeeded = report.succeeded().count();
    let failed = report.failed().count();
    let line = format!(
        "Analysed {} failed step(s): {} report(s) written, {} skipped",
        report.outcomes.len(),
        succeeded,
        failed
    );

    if failed == 0 {
        println!("{}", line.green().bold());
    } else {
        println!("{}", line.yellow().bold());
    }
}
