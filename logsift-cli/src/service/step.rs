//! Step processing
//!
//! Takes one failed step through fetch, chunking, analysis and reporting.
//! Every stage maps its failure to a [`StepError`] variant so the caller can
//! record the outcome and move on to the next step.

use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use logsift_client::ClientError;
use logsift_core::chunk::chunk_units;
use logsift_core::domain::artifact::log_file_name;
use logsift_core::domain::run::FailedStep;
use logsift_core::domain::summary::Summary;
use logsift_core::tokenizer::{Tokenizer, TokenizerError};
use thiserror::Error;
use tracing::{debug, info};

use super::{CiProvider, Summarizer};
use crate::report::{Report, ReportWriter};

/// Failure of one step, tagged with the stage that failed
#[derive(Debug, Error)]
pub enum StepError {
    #[error("failed to download logs: {0}")]
    Fetch(#[source] ClientError),

    #[error("failed to save logs to {}: {source}", .path.display())]
    SaveLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to tokenize logs: {0}")]
    Tokenize(#[from] TokenizerError),

    #[error("analysis request failed: {0}")]
    Analyze(#[source] ClientError),

    #[error("failed to write report: {0}")]
    Report(#[source] io::Error),
}

/// Units sent to and received from the analysis service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input: usize,
    pub output: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input + self.output
    }
}

/// Result of a successfully analysed step
#[derive(Debug, Clone)]
pub struct StepReport {
    pub log_path: PathBuf,
    pub chunk_count: usize,
    pub summary: Summary,
    pub usage: TokenUsage,
    pub report: Report,
}

/// Processes failed steps one at a time
pub struct StepProcessor<'a> {
    provider: &'a dyn CiProvider,
    summarizer: &'a dyn Summarizer,
    tokenizer: &'a dyn Tokenizer,
    max_units: NonZeroUsize,
    log_dir: &'a Path,
    reports: &'a ReportWriter,
}

impl<'a> StepProcessor<'a> {
    pub fn new(
        provider: &'a dyn CiProvider,
        summarizer: &'a dyn Summarizer,
        tokenizer: &'a dyn Tokenizer,
        max_units: NonZeroUsize,
        log_dir: &'a Path,
        reports: &'a ReportWriter,
    ) -> Self {
        Self {
            provider,
            summarizer,
            tokenizer,
            max_units,
            log_dir,
            reports,
        }
    }

    /// Path the raw log of a step is saved to
    pub fn log_path(&self, step: &FailedStep, timestamp: &str) -> PathBuf {
        self.log_dir
            .join(log_file_name(&step.job_name, &step.step_name, timestamp))
    }

    /// Fetches, chunks, analyses and reports one failed step
    ///
    /// # Arguments
    /// * `step` - The failed step
    /// * `timestamp` - Fetch time embedded in the artifact file names
    pub async fn process(
        &self,
        step: &FailedStep,
        timestamp: &str,
    ) -> Result<StepReport, StepError> {
        let log = self
            .provider
            .fetch_log(&step.log_url)
            .await
            .map_err(StepError::Fetch)?;

        let log_path = self.log_path(step, timestamp);
        save_log(&log_path, log.as_bytes())?;
        info!(
            job = %step.job_name,
            step = %step.step_name,
            "Logs downloaded successfully to {}",
            log_path.display()
        );

        let text = log.text();
        let units = self.tokenizer.encode(&text)?;
        let chunks = chunk_units(&units, self.max_units, self.tokenizer)?;
        debug!(
            "Split {} unit(s) into {} chunk(s) of at most {} using {}",
            units.len(),
            chunks.len(),
            self.max_units,
            self.tokenizer.name()
        );

        let summary = self
            .summarizer
            .summarize(&chunks)
            .await
            .map_err(StepError::Analyze)?;

        let usage = TokenUsage {
            input: units.len(),
            output: self.tokenizer.count(&summary.text)?,
        };
        info!(
            job = %step.job_name,
            "Token usage: input={}, output={}, total={}",
            usage.input,
            usage.output,
            usage.total()
        );

        let report = self
            .reports
            .write_report(&step.job_name, &summary, timestamp)
            .map_err(StepError::Report)?;

        Ok(StepReport {
            log_path,
            chunk_count: chunks.len(),
            summary,
            usage,
            report,
        })
    }
}

fn save_log(path: &Path, bytes: &[u8]) -> Result<(), StepError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StepError::SaveLog {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| StepError::SaveLog {
        path: path.to_path_buf(),
        source,
    })
}
