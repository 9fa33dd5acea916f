//! Summary domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text used when the analysis response carries no summary
pub const FALLBACK_SUMMARY: &str = "No summary available";

/// Where a summary's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummarySource {
    /// Extracted from the analysis response
    Extracted,
    /// The response did not have the expected shape
    Fallback,
}

/// Failure summary for one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    pub source: SummarySource,
}

impl Summary {
    pub fn extracted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: SummarySource::Extracted,
        }
    }

    pub fn fallback() -> Self {
        Self {
            text: FALLBACK_SUMMARY.to_string(),
            source: SummarySource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == SummarySource::Fallback
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
