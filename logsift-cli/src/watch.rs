//! Run watching
//!
//! Polls the job listing until every job of the run, apart from the ignored
//! one, has left the queued or in-progress state. Gives up after a fixed
//! number of listings and proceeds with the last one. Listing errors are not
//! retried.

use logsift_client::ClientError;
use logsift_core::domain::run::RunRef;
use logsift_core::dto::github::JobsResponse;
use tracing::{info, warn};

use crate::config::WaitPolicy;
use crate::service::CiProvider;

/// Lists the run's jobs until none is pending or attempts run out
pub async fn wait_for_jobs(
    provider: &dyn CiProvider,
    run: &RunRef,
    policy: &WaitPolicy,
) -> Result<JobsResponse, ClientError> {
    let mut attempt = 0;

    loop {
        attempt += 1;
        let jobs = provider.list_jobs(run).await?;
        let pending = jobs.pending_jobs(policy.ignore_job.as_deref()).len();

        if pending == 0 {
            info!("All jobs have completed");
            return Ok(jobs);
        }

        if attempt >= policy.attempts {
            warn!(
                "{} job(s) did not complete after {} listing(s); proceeding with available job statuses",
                pending, attempt
            );
            return Ok(jobs);
        }

        info!(
            "Waiting for {} job(s) to complete (attempt {}/{})",
            pending, attempt, policy.attempts
        );
        tokio::time::sleep(policy.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fakes::FakeProvider;
    use std::sync::Mutex;
    use std::time::Duration;

    fn listing(status: &str) -> JobsResponse {
        serde_json::from_str(&format!(
            r#"{{"total_count": 2, "jobs": [
                {{"id": 1, "name": "build", "status": "{}", "steps": []}},
                {{"id": 2, "name": "collect-logs", "status": "in_progress", "steps": []}}
            ]}}"#,
            status
        ))
        .unwrap()
    }

    fn policy(attempts: u32) -> WaitPolicy {
        WaitPolicy {
            attempts,
            interval: Duration::ZERO,
            ignore_job: Some("collect-logs".to_string()),
        }
    }

    #[tokio::test]
    async fn test_returns_once_jobs_complete() {
        let provider = FakeProvider {
            listings: Mutex::new(vec![
                listing("queued"),
                listing("in_progress"),
                listing("completed"),
            ]),
            ..Default::default()
        };

        let jobs = wait_for_jobs(&provider, &RunRef::new("o", "r", "1"), &policy(10))
            .await
            .unwrap();

        assert_eq!(*provider.list_calls.lock().unwrap(), 3);
        assert_eq!(jobs.pending_jobs(Some("collect-logs")).len(), 0);
    }

    #[tokio::test]
    async fn test_gives_up_after_attempts() {
        let provider = FakeProvider::with_listing(listing("in_progress"));

        let jobs = wait_for_jobs(&provider, &RunRef::new("o", "r", "1"), &policy(4))
            .await
            .unwrap();

        assert_eq!(*provider.list_calls.lock().unwrap(), 4);
        assert_eq!(jobs.pending_jobs(Some("collect-logs")).len(), 1);
    }

    #[tokio::test]
    async fn test_ignored_job_does_not_block() {
        let provider = FakeProvider::with_listing(listing("completed"));

        wait_for_jobs(&provider, &RunRef::new("o", "r", "1"), &policy(5))
            .await
            .unwrap();

        assert_eq!(*provider.list_calls.lock().unwrap(), 1);
    }
}
