//! Artifact naming
//!
//! File names for downloaded logs and analysis reports embed the job name,
//! the step name and a local timestamp. Job names frequently carry matrix
//! values such as `build (ubuntu-latest, 3.12)` and occasionally a `/`, so
//! the name parts are sanitized before they reach the filesystem.

use chrono::{DateTime, TimeZone};

/// Format of the timestamp embedded in artifact file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Formats a timestamp for use in artifact file names
pub fn file_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Replaces characters that cannot appear in a file name component
pub fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// File name of a downloaded raw log
pub fn log_file_name(job_name: &str, step_name: &str, timestamp: &str) -> String {
    format!(
        "{}_{}_logs_{}.txt",
        sanitize_component(job_name),
        sanitize_component(step_name),
        timestamp
    )
}

/// File name of an analysis report
///
/// `duplicate` counts the reports of the same job already written with the
/// same timestamp. The first report carries no suffix, later ones end in
/// `_2`, `_3` and so on.
pub fn report_file_name(job_name: &str, timestamp: &str, duplicate: usize) -> String {
    let job = sanitize_component(job_name);
    match duplicate {
        0 => format!("{}_analysis_{}.txt", job, timestamp),
        n => format!("{}_analysis_{}_{}.txt", job, timestamp, n + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_file_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(file_timestamp(&at), "20240309070501");
    }

    #[test]
    fn test_log_file_name() {
        assert_eq!(
            log_file_name("build", "Run tests", "20240309070501"),
            "build_Run tests_logs_20240309070501.txt"
        );
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name("lint", "20240309070501", 0),
            "lint_analysis_20240309070501.txt"
        );
        assert_eq!(
            report_file_name("lint", "20240309070501", 1),
            "lint_analysis_20240309070501_2.txt"
        );
    }

    #[test]
    fn test_sanitize_component_replaces_separators() {
        assert_eq!(sanitize_component("deploy / staging"), "deploy _ staging");
        assert_eq!(sanitize_component("a\\b:c"), "a_b_c");
        assert_eq!(
            sanitize_component("build (ubuntu-latest, 3.12)"),
            "build (ubuntu-latest, 3.12)"
        );
    }
}
