//! Analysis service client

use logsift_core::domain::summary::Summary;
use logsift_core::dto::analysis::ChatRequest;
use reqwest::Client;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::{USER_AGENT, check_status};

/// HTTP client for the failure analysis service
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    /// Endpoint receiving the chat request
    url: String,
    /// HTTP client instance, carrying the session cookie when configured
    client: Client,
}

impl AnalysisClient {
    /// Create a new analysis client
    ///
    /// # Arguments
    /// * `url` - Endpoint of the analysis service
    /// * `cookie` - Optional value sent as the `Cookie` header
    pub fn new(url: impl Into<String>, cookie: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            let mut value =
                HeaderValue::from_str(cookie).map_err(|_| ClientError::InvalidHeader("Cookie"))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Get the endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask the service for a failure summary of the given chunks
    ///
    /// All chunks are joined into a single request. A response whose JSON
    /// lacks `choices[0].message.content` yields the fallback summary; a
    /// response that is not JSON at all is a [`ClientError::ParseError`].
    pub async fn summarize(&self, chunks: &[String]) -> Result<Summary> {
        let request = ChatRequest::for_chunks(chunks);
        let response = self.client.post(&self.url).json(&request).send().await?;

        let body = check_status(response).await?.text().await?;
        debug!("Raw analysis response: {}", body);

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            ClientError::ParseError(format!("Analysis response is not JSON: {}", e))
        })?;

        let summary = Summary::from_response(value);
        if summary.is_fallback() {
            warn!("Analysis response had no summary content, using fallback");
        }

        Ok(summary)
    }
}
