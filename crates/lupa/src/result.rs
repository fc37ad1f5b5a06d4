//! Result and error types for Lupa.

use thiserror::Error;

/// Result type for Lupa operations
pub type LupaResult<T> = Result<T, LupaError>;

/// Errors that can occur while driving a scenario against a host
#[derive(Debug, Error)]
pub enum LupaError {
    /// Host environment rejected an operation
    #[error("Host operation failed: {message}")]
    HostError {
        /// Error message
        message: String,
    },

    /// Tab could not be opened or released
    #[error("Tab operation failed: {message}")]
    TabError {
        /// Error message
        message: String,
    },

    /// Overlay open/close request failed
    #[error("Overlay operation failed: {message}")]
    OverlayError {
        /// Error message
        message: String,
    },

    /// A suspension point exceeded its deadline
    #[error("Timed out after {ms}ms waiting for {waiting_for}")]
    Timeout {
        /// What the scenario was suspended on
        waiting_for: String,
        /// Deadline in milliseconds
        ms: u64,
    },

    /// Operation called in the wrong scenario phase
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// Zoom factor outside the accepted domain
    #[error("Invalid zoom factor {factor}: must be finite and positive")]
    InvalidZoom {
        /// The rejected factor
        factor: f64,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LupaError {
    /// Create a host error from a message
    #[must_use]
    pub fn host(message: impl Into<String>) -> Self {
        Self::HostError {
            message: message.into(),
        }
    }

    /// Create an invalid-state error from a message
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}
