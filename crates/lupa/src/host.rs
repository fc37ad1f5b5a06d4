//! Host environment seam.
//!
//! Scenarios never touch ambient globals (window, chrome, content
//! surface) directly. Everything they need is behind [`HostEnvironment`]:
//! zoom get/set, capability probes, tab lifecycle, overlay open/close,
//! window resize, notification subscribe, and a run-on-next-tick
//! primitive. Hosts report progress as [`HostEvent`]s drained through
//! [`HostEnvironment::poll_event`], which keeps the whole model
//! single-threaded and cooperative.

use crate::bus::{Subscription, Topic};
use crate::geometry::SurfaceSize;
use crate::overlay::OverlayHandle;
use crate::result::LupaResult;
use serde::{Deserialize, Serialize};

/// Asynchronous progress reported by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    /// A freshly created tab is ready for use
    TabReady,
    /// The overlay is about to initialize; last chance to set zoom
    /// before the presenter bakes it in
    OverlayWillOpen,
    /// The overlay instance is open and readable
    OverlayOpened,
    /// A deferred tick elapsed; layout has settled after a resize
    LayoutSettled,
    /// A subscribed notification was delivered
    Notified(Topic),
}

/// Narrow interface to the hosting application.
///
/// Mutating operations return `Err` only for hard host failures (tab or
/// overlay could not be driven at all); geometry mismatches are the
/// scenario's business, not the host's.
pub trait HostEnvironment {
    /// Apply a document zoom factor to the active context
    fn set_document_zoom(&mut self, factor: f64) -> LupaResult<()>;

    /// Read back the current document zoom factor
    fn document_zoom(&self) -> f64;

    /// Whether the inspection overlay feature is enabled
    fn inspector_enabled(&self) -> bool;

    /// Whether the rendering capability the overlay needs is available
    fn rendering_supported(&self) -> bool;

    /// Open a new browsing-context tab; emits [`HostEvent::TabReady`]
    fn open_tab(&mut self) -> LupaResult<()>;

    /// Release the current tab
    fn close_current_tab(&mut self) -> LupaResult<()>;

    /// Request the overlay to open; emits [`HostEvent::OverlayWillOpen`]
    /// then [`HostEvent::OverlayOpened`]
    fn request_overlay_open(&mut self) -> LupaResult<()>;

    /// Request the overlay to close; the destroyed notification arrives
    /// via the bus once teardown completes
    fn request_overlay_close(&mut self) -> LupaResult<()>;

    /// The open overlay instance, if any
    fn overlay(&self) -> Option<&OverlayHandle>;

    /// Current dimensions of the rendered content surface
    fn content_surface(&self) -> SurfaceSize;

    /// Resize the host window by (dx, dy) screen pixels
    fn resize_window_by(&mut self, dx: f64, dy: f64) -> LupaResult<()>;

    /// Subscribe to a notification topic for exactly one delivery
    fn subscribe_once(&mut self, topic: Topic) -> Subscription;

    /// Cancel a subscription; returns `false` if already gone
    fn unsubscribe(&mut self, subscription: Subscription) -> bool;

    /// Schedule a [`HostEvent::LayoutSettled`] behind all pending work
    fn defer_tick(&mut self);

    /// Drain the next pending event, if any
    fn poll_event(&mut self) -> Option<HostEvent>;
}
