//! Logsift HTTP Clients
//!
//! Type-safe HTTP clients for the two remote services a run talks to:
//!
//! - [`GitHubClient`]: lists the jobs of a workflow run and downloads job logs
//! - [`AnalysisClient`]: sends a log to the analysis service for a summary
//!
//! # Example
//!
//! ```no_run
//! use logsift_client::GitHubClient;
//! use logsift_core::domain::run::RunRef;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GitHubClient::new("https://api.github.com", "ghp_example")?;
//!     let run = RunRef::new("octo", "hello-world", "1234567890");
//!
//!     for step in client.list_failed_steps(&run).await? {
//!         println!("{} failed", step);
//!     }
//!     Ok(())
//! }
//! ```

mod analysis;
pub mod error;
mod logs;
mod runs;

// Re-export commonly used types
pub use analysis::AnalysisClient;
pub use error::{ClientError, Result};

use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

/// Public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST API version requested from GitHub
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// User agent sent with every request; GitHub rejects requests without one
pub const USER_AGENT: &str = concat!("logsift/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the GitHub Actions API
///
/// Every request carries the bearer token, the GitHub JSON media type and the
/// pinned API version.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    /// HTTP client instance with authentication headers
    client: Client,
}

impl GitHubClient {
    /// Create a new GitHub client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the REST API
    /// * `token` - Token sent as `Authorization: Bearer <token>`
    pub fn new(base_url: impl Into<String>, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ClientError::InvalidHeader("Authorization"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(base_url, client))
    }

    /// Create a new GitHub client with a custom HTTP client
    ///
    /// The client is used as is; it must already carry the authentication
    /// headers.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// =============================================================================
// Response Handlers
// =============================================================================

/// Return the response if its status is a success, or an API error
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    Ok(response)
}

/// Handle an API response and deserialize JSON
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    check_status(response)
        .await?
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::new("https://api.github.com", "token").unwrap();
        assert_eq!(client.base_url(), "https://api.github.com");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GitHubClient::new("http://localhost:8080/", "token").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_rejects_token_with_newline() {
        let result = GitHubClient::new(DEFAULT_API_URL, "abc\ndef");
        assert!(matches!(
            result,
            Err(ClientError::InvalidHeader("Authorization"))
        ));
    }

    #[test]
    fn test_client_with_custom_client() {
        let client = GitHubClient::with_client("http://localhost:8080", Client::new());
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
