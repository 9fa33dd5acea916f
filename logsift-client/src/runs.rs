//! Workflow run endpoints

use logsift_core::domain::run::{FailedStep, RunRef};
use logsift_core::dto::github::JobsResponse;
use tracing::debug;

use crate::error::Result;
use crate::{GitHubClient, handle_response};

/// Jobs requested per page; the maximum GitHub allows
const PER_PAGE: u32 = 100;

impl GitHubClient {
    // =============================================================================
    // Run Inspection
    // =============================================================================

    /// List every job of a workflow run
    ///
    /// Follows pagination until `total_count` jobs were collected or a page
    /// comes back empty.
    ///
    /// # Arguments
    /// * `run` - The workflow run to inspect
    pub async fn list_jobs(&self, run: &RunRef) -> Result<JobsResponse> {
        let url = format!(
            "{}/repos/{}/{}/actions/runs/{}/jobs",
            self.base_url, run.owner, run.repo, run.run_id
        );

        let mut listing = JobsResponse::default();
        let mut page = 1u32;

        loop {
            let response = self
                .client
                .get(&url)
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await?;

            let batch: JobsResponse = handle_response(response).await?;
            let received = batch.jobs.len();

            listing.total_count = batch.total_count;
            listing.jobs.extend(batch.jobs);

            debug!(
                "Fetched page {} of jobs for run {}: {} job(s)",
                page, run, received
            );

            if received == 0 || listing.jobs.len() as u64 >= listing.total_count {
                break;
            }
            page += 1;
        }

        Ok(listing)
    }

    /// List the failed steps of a workflow run
    ///
    /// # Returns
    /// One entry per failed step, carrying the log URL of its job
    pub async fn list_failed_steps(&self, run: &RunRef) -> Result<Vec<FailedStep>> {
        let jobs = self.list_jobs(run).await?;
        Ok(self.failed_steps(run, &jobs))
    }

    /// Extract failed steps from a job listing already fetched for `run`
    pub fn failed_steps(&self, run: &RunRef, jobs: &JobsResponse) -> Vec<FailedStep> {
        jobs.failed_steps(|job_id| self.job_logs_url(run, job_id))
    }

    /// URL of the log archive of one job
    pub fn job_logs_url(&self, run: &RunRef, job_id: u64) -> String {
        format!(
            "{}/repos/{}/{}/actions/jobs/{}/logs",
            self.base_url, run.owner, run.repo, job_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const JOBS_BODY: &str = r#"{
        "total_count": 2,
        "jobs": [
            {
                "id": 101,
                "name": "build",
                "status": "completed",
                "conclusion": "failure",
                "steps": [
                    {"name": "Set up job", "number": 1, "conclusion": "success"},
                    {"name": "Run tests", "number": 2, "conclusion": "failure"}
                ]
            },
            {
                "id": 102,
                "name": "docs",
                "status": "completed",
                "conclusion": "success",
                "steps": [{"name": "Build docs", "number": 1, "conclusion": "success"}]
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_list_failed_steps() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/hello/actions/runs/77/jobs")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "100".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .match_header("authorization", "Bearer secret")
            .match_header("accept", "application/vnd.github+json")
            .match_header("x-github-api-version", "2022-11-28")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(JOBS_BODY)
            .create_async()
            .await;

        let client = GitHubClient::new(server.url(), "secret").unwrap();
        let run = RunRef::new("octo", "hello", "77");
        let steps = client.list_failed_steps(&run).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            steps,
            vec![FailedStep::new(
                "build",
                "Run tests",
                format!("{}/repos/octo/hello/actions/jobs/101/logs", server.url())
            )]
        );
    }

    #[tokio::test]
    async fn test_list_jobs_follows_pages() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/repos/octo/hello/actions/runs/5/jobs")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"total_count": 2, "jobs": [{"id": 1, "name": "a", "steps": []}]}"#)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/repos/octo/hello/actions/runs/5/jobs")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(r#"{"total_count": 2, "jobs": [{"id": 2, "name": "b", "steps": []}]}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(server.url(), "secret").unwrap();
        let jobs = client
            .list_jobs(&RunRef::new("octo", "hello", "5"))
            .await
            .unwrap();

        first.assert_async().await;
        second.assert_async().await;
        let ids: Vec<u64> = jobs.jobs.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_list_jobs_propagates_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/hello/actions/runs/9/jobs")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "Bad credentials"}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(server.url(), "wrong").unwrap();
        let err = client
            .list_failed_steps(&RunRef::new("octo", "hello", "9"))
            .await
            .unwrap_err();

        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_list_jobs_rejects_unexpected_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/octo/hello/actions/runs/9/jobs")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"workflow_runs": []}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(server.url(), "secret").unwrap();
        let err = client
            .list_jobs(&RunRef::new("octo", "hello", "9"))
            .await
            .unwrap_err();

        assert!(matches!(err, crate::ClientError::ParseError(_)));
    }
}
