//! Non-fatal checks with absolute and relative tolerances.
//!
//! Geometry checks are recorded, not raised: a failing check never stops
//! the scenario, which still has to reach teardown.

use serde::{Deserialize, Serialize};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Relative tolerance for zoom round-trip checks
pub const ZOOM_ROUNDTRIP_EPSILON: f64 = 1e-6;

/// Absolute tolerance for pixel-dimension checks.
///
/// One full unit absorbs rounding from device-pixel scaling.
pub const DIMENSION_EPSILON: f64 = 1.0;

// =============================================================================
// TOLERANCE
// =============================================================================

/// Tolerance for approximate floating-point comparisons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Tolerance {
    /// `|expected - actual| <= epsilon`
    Absolute(f64),
    /// `|expected - actual| <= epsilon * max(|expected|, |actual|)`
    Relative(f64),
}

impl Tolerance {
    /// Tolerance for zoom round-trip checks
    #[must_use]
    pub const fn zoom_roundtrip() -> Self {
        Self::Relative(ZOOM_ROUNDTRIP_EPSILON)
    }

    /// Tolerance for pixel-dimension checks
    #[must_use]
    pub const fn dimension() -> Self {
        Self::Absolute(DIMENSION_EPSILON)
    }

    /// Check whether two values are equal within this tolerance
    #[must_use]
    pub fn accepts(&self, expected: f64, actual: f64) -> bool {
        let diff = (expected - actual).abs();
        match *self {
            Self::Absolute(epsilon) => diff <= epsilon,
            Self::Relative(epsilon) => {
                let scale = expected.abs().max(actual.abs());
                if scale == 0.0 {
                    true
                } else {
                    diff <= epsilon * scale
                }
            }
        }
    }
}

// =============================================================================
// CHECK RESULT
// =============================================================================

/// Result of a single check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check passed
    pub passed: bool,
    /// Human-readable message (empty on pass)
    pub message: String,
}

impl CheckResult {
    /// Create a passing check result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing check result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Check helpers for scenario verification
pub struct Check;

impl Check {
    /// Check two floats are approximately equal within a tolerance
    #[must_use]
    pub fn approx(expected: f64, actual: f64, tolerance: Tolerance) -> CheckResult {
        if tolerance.accepts(expected, actual) {
            CheckResult::pass()
        } else {
            CheckResult::fail(format!(
                "expected {actual} to approximate {expected} within {tolerance:?}"
            ))
        }
    }

    /// Check a condition holds
    #[must_use]
    pub fn is_true(condition: bool, message: &str) -> CheckResult {
        if condition {
            CheckResult::pass()
        } else {
            CheckResult::fail(message)
        }
    }
}
