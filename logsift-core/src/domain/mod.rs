//! Core domain types
//!
//! This module contains the structures passed between the stages of a run:
//! the failed steps found in a workflow run, the logs fetched for them and
//! the summaries produced from those logs.

pub mod artifact;
pub mod log;
pub mod run;
pub mod summary;
