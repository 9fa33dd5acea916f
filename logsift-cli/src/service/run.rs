//! Run processing
//!
//! Lists the jobs of a run (optionally waiting for them to finish), records
//! their statuses, then processes every failed step in order. A failing step
//! is recorded and skipped; only a failure to list the run aborts it.

use chrono::Local;
use logsift_client::ClientError;
use logsift_core::domain::artifact::file_timestamp;
use logsift_core::domain::run::FailedStep;
use logsift_core::tokenizer::Tokenizer;
use tracing::{error, info, warn};

use super::step::{StepError, StepProcessor, StepReport};
use super::{CiProvider, Summarizer};
use crate::config::Config;
use crate::report::{Report, ReportWriter, append_step_summary};
use crate::{display, status, watch};

/// Outcome of one failed step
#[derive(Debug)]
pub struct StepOutcome {
    pub step: FailedStep,
    pub result: Result<StepReport, StepError>,
}

/// Outcomes of every failed step of a run, in processing order
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<StepOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &StepReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&FailedStep, &StepError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.step, e)))
    }

    pub fn reports(&self) -> Vec<Report> {
        self.succeeded().map(|r| r.report.clone()).collect()
    }
}

/// Drives a run from job listing to reports
pub struct Pipeline<'a> {
    config: &'a Config,
    provider: &'a dyn CiProvider,
    summarizer: &'a dyn Summarizer,
    tokenizer: &'a dyn Tokenizer,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        provider: &'a dyn CiProvider,
        summarizer: &'a dyn Summarizer,
        tokenizer: &'a dyn Tokenizer,
    ) -> Self {
        Self {
            config,
            provider,
            summarizer,
            tokenizer,
        }
    }

    /// Runs the whole pipeline
    ///
    /// # Errors
    /// Only listing the run's jobs is fatal; per-step failures are collected
    /// in the returned [`RunReport`].
    pub async fn run(&self) -> Result<RunReport, ClientError> {
        let run = &self.config.run;

        let jobs = match &self.config.wait {
            Some(policy) => watch::wait_for_jobs(self.provider, run, policy).await?,
            None => self.provider.list_jobs(run).await?,
        };

        display::print_job_statuses(&jobs);
        if let Err(e) = status::record(&self.config.output.log_dir, &jobs) {
            warn!("Failed to write job status files: {}", e);
        }

        let failed = jobs.failed_steps(|job_id| self.provider.job_logs_url(run, job_id));
        if failed.is_empty() {
            display::print_no_failed_steps();
            self.write_step_summary(&RunReport::default());
            return Ok(RunReport::default());
        }

        info!("Found {} failed step(s) in run {}", failed.len(), run);

        let reports = ReportWriter::new(self.config.output.report_dir.clone());
        let processor = StepProcessor::new(
            self.provider,
            self.summarizer,
            self.tokenizer,
            self.config.chunking.max_units,
            &self.config.output.log_dir,
            &reports,
        );

        let total = failed.len();
        let mut report = RunReport::default();

        for (index, step) in failed.into_iter().enumerate() {
            display::print_step_header(&step, index + 1, total);

            let timestamp = file_timestamp(&Local::now());
            let result = processor.process(&step, &timestamp).await;

            match &result {
                Ok(step_report) => display::print_step_success(step_report),
                Err(e) => {
                    error!(
                        job = %step.job_name,
                        step = %step.step_name,
                        log_file = %processor.log_path(&step, &timestamp).display(),
                        "Step skipped: {}",
                        e
                    );
                    display::print_step_failure(&step, e);
                }
            }

            report.outcomes.push(StepOutcome { step, result });
        }

        self.write_step_summary(&report);

        Ok(report)
    }

    fn write_step_summary(&self, report: &RunReport) {
        let Some(path) = &self.config.output.step_summary else {
            return;
        };

        let skipped = report.failed().count();
        if let Err(e) = append_step_summary(path, &report.reports(), skipped) {
            warn!("Failed to append to step summary {}: {}", path.display(), e);
        }
    }
}
