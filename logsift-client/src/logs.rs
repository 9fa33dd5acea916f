//! Job log endpoint

use logsift_core::domain::log::RawLog;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{GitHubClient, check_status};

impl GitHubClient {
    // =============================================================================
    // Job Logs
    // =============================================================================

    /// Download the raw log of a job
    ///
    /// GitHub answers with a redirect to short-lived storage, which the
    /// underlying client follows.
    ///
    /// # Arguments
    /// * `log_url` - The job-scoped log URL of a failed step
    ///
    /// # Errors
    /// [`ClientError::EmptyContent`] when the response succeeds without a body
    pub async fn fetch_log(&self, log_url: &str) -> Result<RawLog> {
        let response = self.client.get(log_url).send().await?;
        let bytes = check_status(response).await?.bytes().await?;

        if bytes.is_empty() {
            return Err(ClientError::EmptyContent(log_url.to_string()));
        }

        debug!("Downloaded {} byte(s) from {}", bytes.len(), log_url);

        Ok(RawLog::new(bytes.to_vec()))
    }
}
