//! Job status files
//!
//! Records the job listing of a run next to the downloaded logs:
//! `jobs_response.json` with the parsed listing (every page merged, only the
//! fields logsift reads, unrecognised statuses and conclusions written as
//! `"other"`), `job_statuses.txt` with one status line per job and, when any
//! job failed, `failed_jobs.txt`.

use std::fs;
use std::io;
use std::path::Path;

use logsift_core::dto::github::{Conclusion, JobsResponse};

pub const JOBS_RESPONSE_FILE: &str = "jobs_response.json";
pub const JOB_STATUSES_FILE: &str = "job_statuses.txt";
pub const FAILED_JOBS_FILE: &str = "failed_jobs.txt";

/// Writes the status files of a run into `dir`
pub fn record(dir: &Path, jobs: &JobsResponse) -> io::Result<()> {
    fs::create_dir_all(dir)?;

    let listing = serde_json::to_string(jobs).map_err(io::Error::other)?;
    fs::write(dir.join(JOBS_RESPONSE_FILE), listing)?;

    let statuses: Vec<String> = jobs.jobs.iter().map(|job| job.status_line()).collect();
    fs::write(dir.join(JOB_STATUSES_FILE), statuses.join("\n"))?;

    let failed: Vec<String> = jobs
        .jobs
        .iter()
        .filter(|job| job.conclusion == Some(Conclusion::Failure))
        .map(|job| format!("{} - failure", job.name))
        .collect();
    if !failed.is_empty() {
        fs::write(dir.join(FAILED_JOBS_FILE), failed.join("\n"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_writes_status_files() {
        let dir = tempfile::tempdir().unwrap();
        let jobs: JobsResponse = serde_json::from_str(
            r#"{"total_count": 2, "jobs": [
                {"id": 1, "name": "build", "status": "completed", "conclusion": "failure", "steps": []},
                {"id": 2, "name": "docs", "status": "completed", "conclusion": "success", "steps": []}
            ]}"#,
        )
        .unwrap();

        record(dir.path(), &jobs).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join(JOB_STATUSES_FILE)).unwrap(),
            "build - failure - Job ID: 1\ndocs - success - Job ID: 2"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join(FAILED_JOBS_FILE)).unwrap(),
            "build - failure"
        );

        let saved: JobsResponse =
            serde_json::from_str(&fs::read_to_string(dir.path().join(JOBS_RESPONSE_FILE)).unwrap())
                .unwrap();
        assert_eq!(saved.jobs.len(), 2);
    }

    #[test]
    fn test_record_skips_failed_jobs_file_when_all_pass() {
        let dir = tempfile::tempdir().unwrap();
        let jobs: JobsResponse = serde_json::from_str(
            r#"{"total_count": 1, "jobs": [{"id": 2, "name": "docs", "conclusion": "success"}]}"#,
        )
        .unwrap();

        record(dir.path(), &jobs).unwrap();

        assert!(!dir.path().join(FAILED_JOBS_FILE).exists());
    }

    #[test]
    fn test_jobs_response_holds_parsed_listing() {
        let dir = tempfile::tempdir().unwrap();
        let jobs: JobsResponse = serde_json::from_str(
            r#"{"total_count": 1, "jobs": [{"id": 9, "name": "release", "status": "completed",
                "conclusion": "startup_failure", "runner_name": "gh-1", "steps": []}]}"#,
        )
        .unwrap();

        record(dir.path(), &jobs).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(JOBS_RESPONSE_FILE)).unwrap())
                .unwrap();
        assert_eq!(saved["jobs"][0]["conclusion"], "other");
        assert!(saved["jobs"][0].get("runner_name").is_none());
    }
}
