//! Scenario reporting.
//!
//! A scenario reports every check it recorded plus a single rolled-up
//! status. Checks are non-fatal; `Failed` means at least one check missed
//! or the runner hit a hard error, `Skipped` means the environment lacked
//! a required capability and no geometry checks ran.

use crate::assertion::CheckResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rolled-up scenario status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioStatus {
    /// Every check passed and teardown completed
    Passed,
    /// At least one check missed, or the run errored
    Failed,
    /// Required capability missing; zero geometry checks executed
    Skipped,
}

impl ScenarioStatus {
    /// Whether this status counts as a successful run
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Passed | Self::Skipped)
    }
}

/// A single recorded check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckEntry {
    /// What was checked
    pub name: String,
    /// Whether it passed
    pub passed: bool,
    /// Failure detail, if any
    pub message: Option<String>,
}

impl CheckEntry {
    /// Build an entry from a check result
    #[must_use]
    pub fn new(name: impl Into<String>, result: CheckResult) -> Self {
        Self {
            name: name.into(),
            passed: result.passed,
            message: if result.passed {
                None
            } else {
                Some(result.message)
            },
        }
    }
}

/// Full report for one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// Rolled-up status
    pub status: ScenarioStatus,
    /// Every check recorded, in execution order
    pub checks: Vec<CheckEntry>,
    /// Why the scenario skipped, if it did
    pub skip_reason: Option<String>,
    /// Hard error that ended the run, if any
    pub error: Option<String>,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ScenarioReport {
    /// Number of passing checks
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Number of failing checks
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// The failing checks, in execution order
    #[must_use]
    pub fn failures(&self) -> Vec<&CheckEntry> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    /// One-line human summary
    #[must_use]
    pub fn summary(&self) -> String {
        match self.status {
            ScenarioStatus::Skipped => format!(
                "{}: skipped ({})",
                self.name,
                self.skip_reason.as_deref().unwrap_or("no reason recorded")
            ),
            ScenarioStatus::Passed => {
                format!("{}: passed ({} checks)", self.name, self.passed_count())
            }
            ScenarioStatus::Failed => format!(
                "{}: failed ({} of {} checks{})",
                self.name,
                self.failed_count(),
                self.checks.len(),
                self.error
                    .as_deref()
                    .map(|e| format!("; error: {e}"))
                    .unwrap_or_default()
            ),
        }
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> crate::result::LupaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
