//! Deterministic in-process host for scenario testing.
//!
//! `MockHost` replaces the real browser chrome with an event queue: every
//! mutating request enqueues the events a real host would deliver
//! asynchronously, and `poll_event` drains them one cooperative tick at a
//! time. Window resizes are modeled in screen pixels, so the content
//! surface moves by `delta / zoom` CSS pixels, matching how a zoomed
//! document observes a chrome-level resize. Renderer and arcball
//! viewports snap to whole device pixels, which is what the ±1 dimension
//! tolerance exists to absorb.

use crate::bus::{NotificationBus, Subscription, Topic};
use crate::geometry::SurfaceSize;
use crate::host::{HostEnvironment, HostEvent};
use crate::overlay::OverlayHandle;
use crate::result::{LupaError, LupaResult};
use std::collections::VecDeque;
use tracing::debug;

/// In-process host environment with scripted event delivery
#[derive(Debug)]
pub struct MockHost {
    zoom: f64,
    surface: SurfaceSize,
    overlay: Option<OverlayHandle>,
    overlay_opening: bool,
    tab_open: bool,
    inspector_enabled: bool,
    rendering_supported: bool,
    stall_overlay_open: bool,
    drop_destroyed_notification: bool,
    renderer_drift: f64,
    events: VecDeque<HostEvent>,
    bus: NotificationBus,
}

impl MockHost {
    /// Create a host with the given content surface and zoom 1.0
    #[must_use]
    pub fn new(surface: SurfaceSize) -> Self {
        Self {
            zoom: 1.0,
            surface,
            overlay: None,
            overlay_opening: false,
            tab_open: false,
            inspector_enabled: true,
            rendering_supported: true,
            stall_overlay_open: false,
            drop_destroyed_notification: false,
            renderer_drift: 0.0,
            events: VecDeque::new(),
            bus: NotificationBus::new(),
        }
    }

    /// Toggle the inspection feature flag
    #[must_use]
    pub const fn with_inspector_enabled(mut self, enabled: bool) -> Self {
        self.inspector_enabled = enabled;
        self
    }

    /// Toggle the rendering capability probe
    #[must_use]
    pub const fn with_rendering_supported(mut self, supported: bool) -> Self {
        self.rendering_supported = supported;
        self
    }

    /// Fault injection: the overlay never finishes opening
    #[must_use]
    pub const fn with_stalled_overlay_open(mut self) -> Self {
        self.stall_overlay_open = true;
        self
    }

    /// Fault injection: the destroyed notification is never delivered
    #[must_use]
    pub const fn with_dropped_destroyed_notification(mut self) -> Self {
        self.drop_destroyed_notification = true;
        self
    }

    /// Fault injection: the renderer misreports its width by `drift`
    /// device pixels, simulating an overlay that missizes its viewport
    #[must_use]
    pub const fn with_renderer_drift(mut self, drift: f64) -> Self {
        self.renderer_drift = drift;
        self
    }

    /// Number of events waiting to be polled
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Number of observers still registered on the bus
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.bus.observer_count()
    }

    /// Whether a tab is currently open
    #[must_use]
    pub const fn is_tab_open(&self) -> bool {
        self.tab_open
    }
}

impl HostEnvironment for MockHost {
    fn set_document_zoom(&mut self, factor: f64) -> LupaResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(LupaError::InvalidZoom { factor });
        }
        debug!(factor, "document zoom applied");
        self.zoom = factor;
        Ok(())
    }

    fn document_zoom(&self) -> f64 {
        self.zoom
    }

    fn inspector_enabled(&self) -> bool {
        self.inspector_enabled
    }

    fn rendering_supported(&self) -> bool {
        self.rendering_supported
    }

    fn open_tab(&mut self) -> LupaResult<()> {
        if self.tab_open {
            return Err(LupaError::TabError {
                message: "a tab is already open".to_string(),
            });
        }
        self.tab_open = true;
        self.events.push_back(HostEvent::TabReady);
        debug!("tab opened");
        Ok(())
    }

    fn close_current_tab(&mut self) -> LupaResult<()> {
        if !self.tab_open {
            return Err(LupaError::TabError {
                message: "no tab to close".to_string(),
            });
        }
        self.tab_open = false;
        debug!("tab closed");
        Ok(())
    }

    fn request_overlay_open(&mut self) -> LupaResult<()> {
        if !self.tab_open {
            return Err(LupaError::OverlayError {
                message: "no tab to inspect".to_string(),
            });
        }
        if self.overlay.is_some() || self.overlay_opening {
            return Err(LupaError::OverlayError {
                message: "overlay already open".to_string(),
            });
        }
        self.overlay_opening = true;
        self.events.push_back(HostEvent::OverlayWillOpen);
        for delivery in self.bus.notify(Topic::OverlayInitializing) {
            self.events.push_back(HostEvent::Notified(delivery.topic));
        }
        if self.stall_overlay_open {
            debug!("overlay open stalled (fault injection)");
        } else {
            self.events.push_back(HostEvent::OverlayOpened);
        }
        Ok(())
    }

    fn request_overlay_close(&mut self) -> LupaResult<()> {
        if self.overlay.is_none() && !self.overlay_opening {
            return Err(LupaError::OverlayError {
                message: "no overlay to close".to_string(),
            });
        }
        self.overlay = None;
        self.overlay_opening = false;
        if self.drop_destroyed_notification {
            debug!("destroyed notification dropped (fault injection)");
        } else {
            for delivery in self.bus.notify(Topic::OverlayDestroyed) {
                self.events.push_back(HostEvent::Notified(delivery.topic));
            }
        }
        debug!("overlay closed");
        Ok(())
    }

    fn overlay(&self) -> Option<&OverlayHandle> {
        self.overlay.as_ref()
    }

    fn content_surface(&self) -> SurfaceSize {
        self.surface
    }

    fn resize_window_by(&mut self, dx: f64, dy: f64) -> LupaResult<()> {
        // Chrome-level resize lands on the zoomed document divided out
        let resized = self.surface.offset(dx / self.zoom, dy / self.zoom);
        if !resized.is_valid() {
            return Err(LupaError::host(format!(
                "resize by ({dx}, {dy}) would collapse the content surface"
            )));
        }
        debug!(%resized, "window resized");
        self.surface = resized;
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.track_surface(resized);
            overlay.presenter.renderer.width += self.renderer_drift;
        }
        Ok(())
    }

    fn subscribe_once(&mut self, topic: Topic) -> Subscription {
        self.bus.subscribe_once(topic)
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.bus.unsubscribe(subscription)
    }

    fn defer_tick(&mut self) {
        self.events.push_back(HostEvent::LayoutSettled);
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        let event = self.events.pop_front()?;
        if event == HostEvent::OverlayOpened {
            // The presenter bakes in whatever zoom is current when the
            // overlay finishes opening, not when it was requested.
            self.overlay_opening = false;
            let mut overlay = OverlayHandle::for_surface(self.surface, self.zoom);
            overlay.presenter.renderer.width += self.renderer_drift;
            self.overlay = Some(overlay);
        }
        Some(event)
    }
}
