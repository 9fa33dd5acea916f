//! Run domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A step that concluded with a failure
///
/// The log URL is job-scoped: every failed step of the same job carries the
/// same URL and therefore refers to the same downloaded log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedStep {
    pub job_name: String,
    pub step_name: String,
    pub log_url: String,
}

impl FailedStep {
    pub fn new(
        job_name: impl Into<String>,
        step_name: impl Into<String>,
        log_url: impl Into<String>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            step_name: step_name.into(),
            log_url: log_url.into(),
        }
    }
}

impl fmt::Display for FailedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.job_name, self.step_name)
    }
}

/// Identifies a workflow run in a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRef {
    pub owner: String,
    pub repo: String,
    pub run_id: String,
}

impl RunRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            run_id: run_id.into(),
        }
    }
}

impl fmt::Display for RunRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.run_id)
    }
}
