use std::{fmt, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indoc::formatdoc;

pub const REASON_NO_PATTERNS: &str = "No cookie patterns found";
pub const REASON_UP_TO_DATE: &str = "Cookie patterns already up to date";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success { patterns_updated: usize },
    /// `reason` is [`REASON_NO_PATTERNS`] when nothing matched, or [`REASON_UP_TO_DATE`]
    /// when formats matched but already carried the token. Readers of the status file
    /// that only expect "No cookie patterns found" will also see the second value.
    NoChanges { reason: &'static str },
    Error { message: String },
}

impl RunOutcome {
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::NoChanges { .. } => "no_changes",
            Self::Error { .. } => "error",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status())
    }
}

/// Outcome of one run, stamped with when it finished
#[derive(Debug, Clone)]
pub struct RunResult {
    pub outcome: RunOutcome,
    pub timestamp: DateTime<Utc>,
}

impl RunResult {
    #[must_use]
    pub fn now(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            timestamp: Utc::now(),
        }
    }

    /// Amount of distinct formats rewritten. Zero unless the run succeeded.
    #[must_use]
    pub const fn changes_made(&self) -> usize {
        match self.outcome {
            RunOutcome::Success { patterns_updated } => patterns_updated,
            _ => 0,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Success { .. })
    }

    /// Renders the plain `key: value` status record
    #[must_use]
    pub fn to_record(&self) -> String {
        let last_updated = self.timestamp.format("%Y-%m-%d %H:%M:%S UTC");
        let status = self.outcome.status();
        let details = match &self.outcome {
            RunOutcome::Success { patterns_updated } => formatdoc!(
                "changes_made: {patterns_updated}
                patterns_updated: {patterns_updated}
                "
            ),
            RunOutcome::NoChanges { reason } => format!("reason: {reason}\n"),
            // Keep the record line-oriented even for multi-line messages
            RunOutcome::Error { message } => format!("error: {}\n", message.replace('\n', " ")),
        };

        formatdoc!(
            "last_updated: {last_updated}
            status: {status}
            {details}"
        )
    }

    /// Overwrites `path` with this run's status record
    ///
    /// # Errors
    /// Errors when the file cannot be written
    pub fn write_record(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_record())
            .with_context(|| format!("Writing status record {}", path.display()))
    }
}
