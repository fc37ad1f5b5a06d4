//! Lupa: event-driven consistency checking for browser inspection overlays.
//!
//! Lupa verifies that document zoom and window-resize events propagate
//! correctly into a 3D inspection overlay: the overlay's renderer and
//! arcball-camera viewports must always equal the content surface times
//! the zoom factor, within one device pixel.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      LUPA Architecture                           │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌─────────────┐    ┌──────────────┐          │
//! │   │ Scenario   │    │ Scenario    │    │ Host         │          │
//! │   │ (state     │◄──►│ Runner      │◄──►│ Environment  │          │
//! │   │  machine)  │    │ (deadlines) │    │ (browser or  │          │
//! │   └────────────┘    └─────────────┘    │  MockHost)   │          │
//! │         │                              └──────────────┘          │
//! │         ▼                                                        │
//! │   ┌────────────┐                                                 │
//! │   │ Report     │  pass / fail / skip, per-check detail           │
//! │   └────────────┘                                                 │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scenario never touches ambient globals; everything it needs from
//! the hosting application sits behind the [`HostEnvironment`] trait,
//! and progress arrives as polled [`HostEvent`]s. Checks are non-fatal:
//! a geometry mismatch is recorded and the scenario still reaches
//! teardown, so a failing run cannot leak its tab or observers.
//!
//! # Example
//!
//! ```rust
//! use lupa::{MockHost, ScenarioConfig, ScenarioRunner, ScenarioStatus,
//!            SurfaceSize, ZoomResizeScenario};
//!
//! let mut host = MockHost::new(SurfaceSize::new(1024.0, 768.0));
//! let runner = ScenarioRunner::new();
//! let report = runner.run(ZoomResizeScenario::new(ScenarioConfig::default()), &mut host);
//! assert_eq!(report.status, ScenarioStatus::Passed);
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;
mod bus;
mod geometry;
mod harness;
mod host;
mod mock;
mod overlay;
mod report;
mod result;
mod runner;
mod scenario;

pub use assertion::{
    Check, CheckResult, Tolerance, DIMENSION_EPSILON, ZOOM_ROUNDTRIP_EPSILON,
};
pub use bus::{NotificationBus, Subscription, SubscriptionId, Topic};
pub use geometry::SurfaceSize;
pub use harness::{ScenarioSuite, SuiteResults};
pub use host::{HostEnvironment, HostEvent};
pub use mock::MockHost;
pub use overlay::{Controller, OverlayHandle, Presenter, Transforms, Viewport};
pub use report::{CheckEntry, ScenarioReport, ScenarioStatus};
pub use result::{LupaError, LupaResult};
pub use runner::{
    RunnerOptions, ScenarioRunner, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
pub use scenario::{
    ScenarioConfig, ScenarioPhase, Seed, ZoomResizeScenario, DEFAULT_RESIZE_DELTA,
    DEFAULT_ZOOM_FACTOR,
};

/// Install a `tracing` subscriber reading `RUST_LOG` for filtering.
///
/// Safe to call more than once; later calls are no-ops.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
