//! Logsift CLI
//!
//! Summarizes the failed steps of a GitHub Actions run.
//!
//! For every failed step the job log is downloaded, split into token-bounded
//! chunks and sent to the analysis service. The returned summary is written
//! to a report file and printed.

mod config;
mod display;
mod report;
mod service;
mod status;
mod watch;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use logsift_client::{AnalysisClient, DEFAULT_API_URL, GitHubClient};
use logsift_core::chunk::DEFAULT_MAX_UNITS;
use logsift_core::tokenizer::TokenizerKind;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::service::Pipeline;

#[derive(Parser, Debug, Clone)]
#[command(name = "logsift")]
#[command(about = "Summarize the failed steps of a GitHub Actions run", long_about = None)]
pub struct Cli {
    /// Workflow run to inspect
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: Option<String>,

    /// Repository owner
    #[arg(long, env = "REPO_OWNER")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, env = "REPO_NAME")]
    pub repo: Option<String>,

    /// GitHub token with actions:read permission
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Endpoint of the analysis service
    #[arg(long, env = "LOGSIFT_ANALYSIS_URL")]
    pub analysis_url: Option<String>,

    /// Cookie sent to the analysis service
    #[arg(long, env = "CUSTOM_SERVICE_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// GitHub REST API URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Maximum units per chunk
    #[arg(long, env = "LOGSIFT_MAX_UNITS", default_value_t = DEFAULT_MAX_UNITS)]
    pub max_units: NonZeroUsize,

    /// Tokenizer measuring chunk size (cl100k or chars)
    #[arg(long, env = "LOGSIFT_TOKENIZER", default_value_t = TokenizerKind::Cl100k)]
    pub tokenizer: TokenizerKind,

    /// Directory receiving downloaded logs and job statuses
    #[arg(long, env = "LOGSIFT_LOG_DIR", default_value = ".")]
    pub log_dir: PathBuf,

    /// Directory receiving analysis reports
    #[arg(long, env = "LOGSIFT_REPORT_DIR", default_value = "logs_summary_action/script")]
    pub report_dir: PathBuf,

    /// Markdown file the reports are appended to
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    pub step_summary: Option<PathBuf>,

    /// Wait for the run's jobs to complete before inspecting it
    #[arg(long)]
    pub wait: bool,

    /// Maximum number of listings while waiting
    #[arg(long, default_value_t = 180)]
    pub wait_attempts: u32,

    /// Seconds between listings while waiting
    #[arg(long, default_value_t = 10)]
    pub wait_interval: u64,

    /// Job excluded from the wait, usually the one running logsift
    #[arg(long, default_value = "collect-logs")]
    pub ignore_job: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logsift=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::try_from(cli)?;
    info!(
        "Loaded configuration: run={}, api_url={}, tokenizer={}, max_units={}",
        config.run, config.api_url, config.chunking.tokenizer, config.chunking.max_units
    );

    let github = GitHubClient::new(&config.api_url, &config.token)
        .context("Failed to build GitHub client")?;
    let analysis = AnalysisClient::new(&config.analysis.url, config.analysis.cookie.as_deref())
        .context("Failed to build analysis client")?;
    let tokenizer = config
        .chunking
        .tokenizer
        .build()
        .context("Failed to load tokenizer")?;

    let pipeline = Pipeline::new(&config, &github, &analysis, tokenizer.as_ref());
    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e) => {
            if e.is_auth_error() {
                error!(
                    "GitHub rejected the token; it needs actions:read access to the repository"
                );
            } else if e.is_not_found() {
                error!("Run {} was not found", config.run);
            }
            return Err(
                anyhow::Error::new(e).context(format!("Failed to inspect run {}", config.run))
            );
        }
    };

    display::print_run_summary(&report);

    Ok(())
}
