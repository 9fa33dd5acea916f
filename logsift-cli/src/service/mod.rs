//! Service layer
//!
//! Services contain the business logic of a run: inspecting the run,
//! processing every failed step and collecting the outcomes. They talk to
//! the remote services through the traits below so that the pipeline can be
//! exercised without a network.

#[cfg(test)]
pub(crate) mod fakes;
mod run;
mod step;

pub use run::{Pipeline, RunReport, StepOutcome};
pub use step::{StepError, StepProcessor, StepReport, TokenUsage};

use async_trait::async_trait;
use logsift_client::{AnalysisClient, ClientError, GitHubClient};
use logsift_core::domain::log::RawLog;
use logsift_core::domain::run::RunRef;
use logsift_core::domain::summary::Summary;
use logsift_core::dto::github::JobsResponse;

/// CI provider holding runs, jobs and their logs
#[async_trait]
pub trait CiProvider: Send + Sync {
    /// Lists every job of a run
    async fn list_jobs(&self, run: &RunRef) -> Result<JobsResponse, ClientError>;

    /// URL of the log of one job
    fn job_logs_url(&self, run: &RunRef, job_id: u64) -> String;

    /// Downloads a job log; an empty body is an error
    async fn fetch_log(&self, log_url: &str) -> Result<RawLog, ClientError>;
}

/// Service turning log chunks into a failure summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, chunks: &[String]) -> Result<Summary, ClientError>;
}

#[async_trait]
impl CiProvider for GitHubClient {
    async fn list_jobs(&self, run: &RunRef) -> Result<JobsResponse, ClientError> {
        GitHubClient::list_jobs(self, run).await
    }

    fn job_logs_url(&self, run: &RunRef, job_id: u64) -> String {
        GitHubClient::job_logs_url(self, run, job_id)
    }

    async fn fetch_log(&self, log_url: &str) -> Result<RawLog, ClientError> {
        GitHubClient::fetch_log(self, log_url).await
    }
}

#[async_trait]
impl Summarizer for AnalysisClient {
    async fn summarize(&self, chunks: &[String]) -> Result<Summary, ClientError> {
        AnalysisClient::summarize(self, chunks).await
    }
}
