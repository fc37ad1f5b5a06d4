//! Surface and viewport geometry.

use serde::{Deserialize, Serialize};

/// Dimensions of a rendered content surface, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl SurfaceSize {
    /// Create a surface size
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Scale both axes by a factor
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Offset both axes by (dx, dy); negative deltas shrink
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            width: self.width + dx,
            height: self.height + dy,
        }
    }

    /// Round both axes to whole device pixels
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            width: self.width.round(),
            height: self.height.round(),
        }
    }

    /// Whether both axes are finite and positive
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl std::fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_by_zoom() {
        let surface = SurfaceSize::new(1024.0, 768.0);
        let scaled = surface.scaled(2.0);
        assert_eq!(scaled, SurfaceSize::new(2048.0, 1536.0));
    }

    #[test]
    fn test_offset_shrinks_with_negative_delta() {
        let surface = SurfaceSize::new(1024.0, 768.0);
        let shrunk = surface.offset(-50.0, -50.0);
        assert_eq!(shrunk, SurfaceSize::new(974.0, 718.0));
    }

    #[test]
    fn test_rounded_snaps_to_device_pixels() {
        let surface = SurfaceSize::new(974.4, 718.6);
        assert_eq!(surface.rounded(), SurfaceSize::new(974.0, 719.0));
    }

    #[test]
    fn test_validity() {
        assert!(SurfaceSize::new(1.0, 1.0).is_valid());
        assert!(!SurfaceSize::new(0.0, 768.0).is_valid());
        assert!(!SurfaceSize::new(f64::NAN, 768.0).is_valid());
        assert!(!SurfaceSize::new(f64::INFINITY, 768.0).is_valid());
    }

    #[test]
    fn test_display() {
        assert_eq!(SurfaceSize::new(1024.0, 768.0).to_string(), "1024x768");
    }
}
