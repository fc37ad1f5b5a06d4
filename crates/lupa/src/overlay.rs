//! Overlay instance surface.
//!
//! Mirrors the object shape an inspection overlay exposes once open: a
//! presenter holding the view transforms and renderer viewport, and an
//! input controller holding the arcball camera viewport. Lupa only reads
//! these; the host owns and updates them.

use crate::geometry::SurfaceSize;
use serde::{Deserialize, Serialize};

/// View transforms applied by the overlay's presenter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transforms {
    /// Document zoom baked into the presenter at open time
    pub zoom: f64,
}

/// A viewport with tracked pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in device pixels
    pub width: f64,
    /// Height in device pixels
    pub height: f64,
}

impl Viewport {
    /// Viewport sized to a content surface under a zoom factor,
    /// rounded to whole device pixels
    #[must_use]
    pub fn for_surface(surface: SurfaceSize, zoom: f64) -> Self {
        let scaled = surface.scaled(zoom).rounded();
        Self {
            width: scaled.width,
            height: scaled.height,
        }
    }
}

/// The overlay's presenter: transforms plus the renderer viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Presenter {
    /// View transforms
    pub transforms: Transforms,
    /// WebGL renderer viewport
    pub renderer: Viewport,
}

/// The overlay's input controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    /// Arcball camera viewport
    pub arcball: Viewport,
}

/// Handle to an open overlay instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayHandle {
    /// Presenter with transforms and renderer
    pub presenter: Presenter,
    /// Input controller with the arcball camera
    pub controller: Controller,
}

impl OverlayHandle {
    /// Create an overlay sized to a content surface under a zoom factor
    #[must_use]
    pub fn for_surface(surface: SurfaceSize, zoom: f64) -> Self {
        let viewport = Viewport::for_surface(surface, zoom);
        Self {
            presenter: Presenter {
                transforms: Transforms { zoom },
                renderer: viewport,
            },
            controller: Controller { arcball: viewport },
        }
    }

    /// Re-size renderer and arcball viewports to track a new surface.
    ///
    /// The zoom transform is fixed at open time and does not change here.
    pub fn track_surface(&mut self, surface: SurfaceSize) {
        let viewport = Viewport::for_surface(surface, self.presenter.transforms.zoom);
        self.presenter.renderer = viewport;
        self.controller.arcball = viewport;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_sized_from_surface_and_zoom() {
        let overlay = OverlayHandle::for_surface(SurfaceSize::new(1024.0, 768.0), 2.0);
        assert_eq!(overlay.presenter.transforms.zoom, 2.0);
        assert_eq!(overlay.presenter.renderer.width, 2048.0);
        assert_eq!(overlay.presenter.renderer.height, 1536.0);
        assert_eq!(overlay.controller.arcball.width, 2048.0);
        assert_eq!(overlay.controller.arcball.height, 1536.0);
    }

    #[test]
    fn test_track_surface_updates_both_viewports() {
        let mut overlay = OverlayHandle::for_surface(SurfaceSize::new(1024.0, 768.0), 2.0);
        overlay.track_surface(SurfaceSize::new(974.0, 718.0));
        assert_eq!(overlay.presenter.renderer.width, 1948.0);
        assert_eq!(overlay.presenter.renderer.height, 1436.0);
        assert_eq!(overlay.controller.arcball, overlay.presenter.renderer);
        // Zoom is untouched by resizes
        assert_eq!(overlay.presenter.transforms.zoom, 2.0);
    }

    #[test]
    fn test_viewport_rounds_fractional_device_pixels() {
        let viewport = Viewport::for_surface(SurfaceSize::new(683.3, 512.5), 1.5);
        assert_eq!(viewport.width, 1025.0);
        assert_eq!(viewport.height, 769.0);
    }
}
