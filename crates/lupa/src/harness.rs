//! Suite aggregation over multiple scenario runs.

use crate::host::HostEnvironment;
use crate::report::{ScenarioReport, ScenarioStatus};
use crate::runner::{RunnerOptions, ScenarioRunner};
use crate::scenario::{ScenarioConfig, ZoomResizeScenario};
use std::time::{Duration, Instant};

/// Aggregated results from a suite of scenario runs
#[derive(Debug, Clone)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual scenario reports
    pub reports: Vec<ScenarioReport>,
    /// Total wall-clock duration
    pub duration: Duration,
}

impl SuiteResults {
    /// Whether every run passed or skipped
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.reports.iter().all(|r| r.status.is_success())
    }

    /// Count of passed runs
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Count of failed runs
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Count of skipped runs
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    /// Total run count
    #[must_use]
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// The failed runs, in execution order
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioReport> {
        self.reports
            .iter()
            .filter(|r| r.status == ScenarioStatus::Failed)
            .collect()
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }
}

/// A suite of zoom/resize scenario runs sharing runner options
#[derive(Debug)]
pub struct ScenarioSuite {
    name: String,
    options: RunnerOptions,
    reports: Vec<ScenarioReport>,
    started: Instant,
}

impl ScenarioSuite {
    /// Create a named suite with default runner options
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: RunnerOptions::default(),
            reports: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Set runner options for subsequent runs
    #[must_use]
    pub fn with_options(mut self, options: RunnerOptions) -> Self {
        self.options = options;
        self
    }

    /// Run one scenario against a host and record its report
    pub fn run_scenario<H: HostEnvironment>(
        &mut self,
        config: ScenarioConfig,
        host: &mut H,
    ) -> &ScenarioReport {
        let runner = ScenarioRunner::with_options(self.options.clone());
        let report = runner.run(ZoomResizeScenario::new(config), host);
        self.reports.push(report);
        self.reports.last().expect("report just pushed")
    }

    /// Number of runs recorded so far
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.reports.len()
    }

    /// Finish the suite, yielding aggregated results
    #[must_use]
    pub fn finish(self) -> SuiteResults {
        SuiteResults {
            suite_name: self.name,
            reports: self.reports,
            duration: self.started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SurfaceSize;
    use crate::mock::MockHost;

    #[test]
    fn test_suite_aggregates_pass_skip_fail() {
        let mut suite = ScenarioSuite::new("zoom-resize")
            .with_options(RunnerOptions::new().with_wait_timeout(20).with_poll_interval(1));

        let mut passing = MockHost::new(SurfaceSize::new(1024.0, 768.0));
        suite.run_scenario(ScenarioConfig::default(), &mut passing);

        let mut skipping =
            MockHost::new(SurfaceSize::new(1024.0, 768.0)).with_inspector_enabled(false);
        suite.run_scenario(ScenarioConfig::default(), &mut skipping);

        let mut failing =
            MockHost::new(SurfaceSize::new(1024.0, 768.0)).with_renderer_drift(30.0);
        suite.run_scenario(ScenarioConfig::default(), &mut failing);

        assert_eq!(suite.run_count(), 3);
        let results = suite.finish();
        assert_eq!(results.total(), 3);
        assert_eq!(results.passed_count(), 1);
        assert_eq!(results.skipped_count(), 1);
        assert_eq!(results.failed_count(), 1);
        assert!(!results.all_succeeded());
        assert_eq!(results.failures().len(), 1);
    }

    #[test]
    fn test_suite_all_succeeded_counts_skips() {
        let mut suite = ScenarioSuite::new("capability-gated");
        let mut skipping =
            MockHost::new(SurfaceSize::new(800.0, 600.0)).with_rendering_supported(false);
        suite.run_scenario(ScenarioConfig::default(), &mut skipping);

        let results = suite.finish();
        assert!(results.all_succeeded());
        assert_eq!(results.suite_name, "capability-gated");
    }
}
