//! Configuration module
//!
//! Resolves command-line arguments and their environment fallbacks into a
//! validated [`Config`] that is passed explicitly to every component.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use logsift_core::domain::run::RunRef;
use logsift_core::tokenizer::TokenizerKind;
use thiserror::Error;

use crate::Cli;

/// Configuration errors, reported before any network call
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required values are absent or empty
    #[error("{} must be set", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// A value is present but unusable
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Logsift configuration
#[derive(Clone)]
pub struct Config {
    /// Workflow run to inspect
    pub run: RunRef,

    /// GitHub token
    pub token: String,

    /// GitHub REST API base URL
    pub api_url: String,

    /// Analysis service settings
    pub analysis: AnalysisConfig,

    /// Chunking settings
    pub chunking: ChunkingConfig,

    /// Output locations
    pub output: OutputConfig,

    /// Wait for pending jobs before inspecting the run
    pub wait: Option<WaitPolicy>,
}

#[derive(Clone)]
pub struct AnalysisConfig {
    pub url: String,
    pub cookie: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub max_units: NonZeroUsize,
    pub tokenizer: TokenizerKind,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Downloaded logs and job status files
    pub log_dir: PathBuf,
    /// Analysis reports
    pub report_dir: PathBuf,
    /// GitHub step summary file, when running inside Actions
    pub step_summary: Option<PathBuf>,
}

/// How long to wait for the jobs of a run to finish
#[derive(Debug, Clone)]
pub struct WaitPolicy {
    /// Maximum number of job listings
    pub attempts: u32,
    /// Pause between listings
    pub interval: Duration,
    /// Job excluded from the check
    pub ignore_job: Option<String>,
}

impl TryFrom<Cli> for Config {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        let mut require = |value: Option<String>, name: &'static str| -> String {
            match value.filter(|v| !v.trim().is_empty()) {
                Some(v) => v,
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let owner = require(cli.owner, "REPO_OWNER");
        let repo = require(cli.repo, "REPO_NAME");
        let run_id = require(cli.run_id, "GITHUB_RUN_ID");
        let token = require(cli.token, "GITHUB_TOKEN");
        let analysis_url = require(cli.analysis_url, "LOGSIFT_ANALYSIS_URL");

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let wait = cli.wait.then(|| WaitPolicy {
            attempts: cli.wait_attempts,
            interval: Duration::from_secs(cli.wait_interval),
            ignore_job: Some(cli.ignore_job).filter(|name| !name.is_empty()),
        });

        let config = Config {
            run: RunRef::new(owner, repo, run_id),
            token,
            api_url: cli.api_url,
            analysis: AnalysisConfig {
                url: analysis_url,
                cookie: cli.cookie.filter(|c| !c.is_empty()),
            },
            chunking: ChunkingConfig {
                max_units: cli.max_units,
                tokenizer: cli.tokenizer,
            },
            output: OutputConfig {
                log_dir: cli.log_dir,
                report_dir: cli.report_dir,
                step_summary: cli.step_summary,
            },
            wait,
        };

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_url("api_url", &self.api_url)?;
        check_http_url("analysis_url", &self.analysis.url)?;

        if !self.run.run_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Invalid {
                field: "run_id",
                reason: format!("'{}' is not a numeric run id", self.run.run_id),
            });
        }

        if let Some(wait) = &self.wait {
            if wait.attempts == 0 {
                return Err(ConfigError::Invalid {
                    field: "wait_attempts",
                    reason: "must be greater than 0".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn check_http_url(field: &'static str, url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Invalid {
            field,
            reason: "must start with http:// or https://".to_string(),
        });
    }
    Ok(())
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("run", &self.run)
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("analysis", &self.analysis)
            .field("chunking", &self.chunking)
            .field("output", &self.output)
            .field("wait", &self.wait)
            .finish()
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("url", &self.url)
            .field("cookie", &self.cookie.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
