//! Test doubles for the remote services

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use logsift_client::ClientError;
use logsift_core::domain::log::RawLog;
use logsift_core::domain::run::RunRef;
use logsift_core::domain::summary::Summary;
use logsift_core::dto::github::JobsResponse;

use super::{CiProvider, Summarizer};

/// Provider serving canned job listings and logs
#[derive(Default)]
pub(crate) struct FakeProvider {
    pub listings: Mutex<Vec<JobsResponse>>,
    pub logs: HashMap<String, Vec<u8>>,
    pub list_calls: Mutex<usize>,
}

impl FakeProvider {
    pub(crate) fn with_listing(jobs: JobsResponse) -> Self {
        Self {
            listings: Mutex::new(vec![jobs]),
            ..Default::default()
        }
    }

    pub(crate) fn log(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.logs.insert(url.to_string(), body.into());
        self
    }
}

#[async_trait]
impl CiProvider for FakeProvider {
    async fn list_jobs(&self, _run: &RunRef) -> Result<JobsResponse, ClientError> {
        *self.list_calls.lock().unwrap() += 1;
        let mut listings = self.listings.lock().unwrap();
        if listings.len() > 1 {
            Ok(listings.remove(0))
        } else {
            Ok(listings.first().cloned().unwrap_or_default())
        }
    }

    fn job_logs_url(&self, _run: &RunRef, job_id: u64) -> String {
        format!("fake://jobs/{}/logs", job_id)
    }

    async fn fetch_log(&self, log_url: &str) -> Result<RawLog, ClientError> {
        match self.logs.get(log_url) {
            Some(bytes) if bytes.is_empty() => {
                Err(ClientError::EmptyContent(log_url.to_string()))
            }
            Some(bytes) => Ok(RawLog::new(bytes.clone())),
            None => Err(ClientError::api_error(404, "Not Found")),
        }
    }
}

/// Summarizer recording the chunks it receives
pub(crate) struct FakeSummarizer {
    pub response: Option<String>,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl FakeSummarizer {
    pub(crate) fn answering(summary: &str) -> Self {
        Self {
            response: Some(summary.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn without_content() -> Self {
        Self {
            response: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, chunks: &[String]) -> Result<Summary, ClientError> {
        self.calls.lock().unwrap().push(chunks.to_vec());
        Ok(match &self.response {
            Some(text) => Summary::extracted(text.clone()),
            None => Summary::fallback(),
        })
    }
}
