//! Scenario runner.
//!
//! Owns the cooperative event loop: polls the host, feeds events to the
//! scenario, and enforces an explicit deadline at every suspension point
//! instead of leaning on an outer harness timeout. Whatever happens, the
//! runner attempts overlay close and tab release before reporting, so a
//! failed or timed-out run cannot leak the browsing context.

use crate::host::HostEnvironment;
use crate::report::{ScenarioReport, ScenarioStatus};
use crate::result::LupaError;
use crate::scenario::ZoomResizeScenario;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default deadline per suspension point (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// OPTIONS
// =============================================================================

/// Options for running a scenario
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Deadline per suspension point, in milliseconds
    pub wait_timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl RunnerOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-suspension-point deadline in milliseconds
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout_ms: u64) -> Self {
        self.wait_timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Deadline as a Duration
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    /// Polling interval as a Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Drives a scenario against a host environment to completion
#[derive(Debug, Default)]
pub struct ScenarioRunner {
    options: RunnerOptions,
}

impl ScenarioRunner {
    /// Create a runner with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with explicit options
    #[must_use]
    pub const fn with_options(options: RunnerOptions) -> Self {
        Self { options }
    }

    /// Run a scenario to completion and report.
    ///
    /// Check failures surface in the report, not as errors. A hard host
    /// failure or a blown deadline ends the run early, after which
    /// teardown is still attempted.
    pub fn run<H: HostEnvironment>(
        &self,
        mut scenario: ZoomResizeScenario,
        host: &mut H,
    ) -> ScenarioReport {
        let name = scenario.name().to_string();
        let started = Instant::now();
        let mut error: Option<LupaError> = None;

        if let Err(e) = scenario.start(host) {
            error = Some(e);
        }

        let mut last_progress = Instant::now();
        while error.is_none() && !scenario.is_done() {
            if let Some(event) = host.poll_event() {
                last_progress = Instant::now();
                if let Err(e) = scenario.handle_event(event, host) {
                    error = Some(e);
                }
            } else if last_progress.elapsed() >= self.options.wait_timeout() {
                error = Some(LupaError::Timeout {
                    waiting_for: scenario.waiting_on().unwrap_or("host event").to_string(),
                    ms: self.options.wait_timeout_ms,
                });
            } else {
                std::thread::sleep(self.options.poll_interval());
            }
        }

        if !scenario.is_done() {
            Self::teardown(&mut scenario, host);
        }

        let duration = started.elapsed();
        let (checks, skip_reason) = scenario.into_parts();
        let status = if let Some(ref e) = error {
            warn!(error = %e, scenario = %name, "scenario errored");
            ScenarioStatus::Failed
        } else if skip_reason.is_some() {
            ScenarioStatus::Skipped
        } else if checks.iter().all(|c| c.passed) {
            ScenarioStatus::Passed
        } else {
            ScenarioStatus::Failed
        };

        ScenarioReport {
            name,
            status,
            checks,
            skip_reason,
            error: error.map(|e| e.to_string()),
            duration,
        }
    }

    /// Best-effort teardown for runs that ended before `Done`. Errors
    /// are logged, not propagated: there may simply be nothing to close.
    fn teardown<H: HostEnvironment>(scenario: &mut ZoomResizeScenario, host: &mut H) {
        if let Some(sub) = scenario.take_pending_subscription() {
            host.unsubscribe(sub);
        }
        if let Err(e) = host.request_overlay_close() {
            debug!(error = %e, "teardown: overlay close");
        }
        if let Err(e) = host.close_current_tab() {
            debug!(error = %e, "teardown: tab close");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SurfaceSize;
    use crate::mock::MockHost;
    use crate::scenario::ScenarioConfig;

    fn fast_options() -> RunnerOptions {
        RunnerOptions::new().with_wait_timeout(20).with_poll_interval(1)
    }

    #[test]
    fn test_run_passes_on_consistent_host() {
        let mut host = MockHost::new(SurfaceSize::new(1024.0, 768.0));
        let runner = ScenarioRunner::new();
        let report = runner.run(ZoomResizeScenario::new(ScenarioConfig::default()), &mut host);

        assert_eq!(report.status, ScenarioStatus::Passed);
        assert_eq!(report.failed_count(), 0);
        assert_eq!(report.checks.len(), 12);
        assert!(report.error.is_none());
        assert!(!host.is_tab_open());
    }

    #[test]
    fn test_run_skips_without_rendering_support() {
        let mut host =
            MockHost::new(SurfaceSize::new(1024.0, 768.0)).with_rendering_supported(false);
        let report =
            ScenarioRunner::new().run(ZoomResizeScenario::new(ScenarioConfig::default()), &mut host);

        assert_eq!(report.status, ScenarioStatus::Skipped);
        assert!(report.status.is_success());
        assert_eq!(report.skip_reason.as_deref(), Some("rendering capability is unavailable"));
    }

    #[test]
    fn test_run_fails_on_misreported_viewport_but_tears_down() {
        let mut host =
            MockHost::new(SurfaceSize::new(1024.0, 768.0)).with_renderer_drift(25.0);
        let report =
            ScenarioRunner::new().run(ZoomResizeScenario::new(ScenarioConfig::default()), &mut host);

        assert_eq!(report.status, ScenarioStatus::Failed);
        assert_eq!(report.failed_count(), 2);
        assert!(report.error.is_none());
        // Teardown ran inside the scenario itself
        assert!(!host.is_tab_open());
        assert_eq!(host.observer_count(), 0);
    }

    #[test]
    fn test_stalled_overlay_open_times_out_and_tears_down() {
        let mut host =
            MockHost::new(SurfaceSize::new(1024.0, 768.0)).with_stalled_overlay_open();
        let runner = ScenarioRunner::with_options(fast_options());
        let report = runner.run(ZoomResizeScenario::new(ScenarioConfig::default()), &mut host);

        assert_eq!(report.status, ScenarioStatus::Failed);
        let error = report.error.unwrap();
        assert!(error.contains("overlay open"), "{error}");
        // The stalled overlay was force-closed and the tab released
        assert!(!host.is_tab_open());
    }

    #[test]
    fn test_dropped_destroyed_notification_times_out() {
        let mut host = MockHost::new(SurfaceSize::new(1024.0, 768.0))
            .with_dropped_destroyed_notification();
        let runner = ScenarioRunner::with_options(fast_options());
        let report = runner.run(ZoomResizeScenario::new(ScenarioConfig::default()), &mut host);

        assert_eq!(report.status, ScenarioStatus::Failed);
        let error = report.error.clone().unwrap();
        assert!(error.contains("overlay destroyed notification"), "{error}");
        assert!(!host.is_tab_open());
        // The undelivered teardown observer was reclaimed, not leaked
        assert_eq!(host.observer_count(), 0);
        // All geometry checks had already passed before the close stalled
        assert_eq!(report.failed_count(), 0);
        assert_eq!(report.checks.len(), 12);
    }

    #[test]
    fn test_options_builders() {
        let options = RunnerOptions::new().with_wait_timeout(500).with_poll_interval(5);
        assert_eq!(options.wait_timeout(), Duration::from_millis(500));
        assert_eq!(options.poll_interval(), Duration::from_millis(5));
    }
}
