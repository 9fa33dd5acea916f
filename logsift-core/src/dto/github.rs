//! GitHub Actions API DTOs
//!
//! Only the fields logsift reads are modeled. Unknown enum values map to
//! `Other` so that a new status or conclusion introduced by the provider does
//! not break deserialization of the whole listing.

use serde::{Deserialize, Serialize};

use crate::domain::run::FailedStep;

/// Response of `GET /repos/{owner}/{repo}/actions/runs/{run_id}/jobs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobsResponse {
    #[serde(default)]
    pub total_count: u64,
    pub jobs: Vec<WorkflowJob>,
}

/// One job of a workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowJob {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub conclusion: Option<Conclusion>,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

/// One step of a job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub name: String,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub conclusion: Option<Conclusion>,
}

/// Execution status of a job or step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    #[default]
    #[serde(other)]
    Other,
}

impl JobStatus {
    /// Whether the job has not finished yet
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::InProgress)
    }
}

/// Final outcome of a completed job or step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    Neutral,
    TimedOut,
    ActionRequired,
    Stale,
    #[serde(other)]
    Other,
}

impl Conclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Cancelled => "cancelled",
            Conclusion::Skipped => "skipped",
            Conclusion::Neutral => "neutral",
            Conclusion::TimedOut => "timed_out",
            Conclusion::ActionRequired => "action_required",
            Conclusion::Stale => "stale",
            Conclusion::Other => "other",
        }
    }
}

impl WorkflowJob {
    /// Steps of this job that concluded with a failure
    pub fn failed_steps(&self) -> impl Iterator<Item = &WorkflowStep> {
        self.steps
            .iter()
            .filter(|step| step.conclusion == Some(Conclusion::Failure))
    }

    /// Status line as printed in job listings
    pub fn status_line(&self) -> String {
        let conclusion = self.conclusion.map(|c| c.as_str()).unwrap_or("null");
        format!("{} - {} - Job ID: {}", self.name, conclusion, self.id)
    }
}

impl JobsResponse {
    /// Collects one [`FailedStep`] per failed step, in listing order
    ///
    /// # Arguments
    /// * `log_url` - Builds the log URL of a job from its id
    pub fn failed_steps(&self, log_url: impl Fn(u64) -> String) -> Vec<FailedStep> {
        let mut failed = Vec::new();

        for job in &self.jobs {
            let url = log_url(job.id);
            for step in job.failed_steps() {
                failed.push(FailedStep::new(&job.name, &step.name, &url));
            }
        }

        failed
    }

    /// Jobs that are still queued or running, ignoring the named job
    pub fn pending_jobs<'a>(&'a self, ignore_job: Option<&'a str>) -> Vec<&'a WorkflowJob> {
        self.jobs
            .iter()
            .filter(|job| Some(job.name.as_str()) != ignore_job)
            .filter(|job| job.status.is_pending())
            .collect()
    }
}
