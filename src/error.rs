use thiserror::Error;

use crate::audio::format::AudioFormat;
use crate::audio::sink::SinkError;
use crate::playout::ControllerState;

/// Errors that can occur while driving a playout session
#[derive(Debug, Error)]
pub enum PlayoutError {
    /// The sink could not be opened; the session cannot start
    #[error("failed to open playback sink: {0}")]
    OpenFailed(#[source] SinkError),

    /// A sink operation other than open failed
    #[error("playback sink error: {0}")]
    Sink(#[from] SinkError),

    /// Operation not allowed in the controller's current state
    #[error("{operation} is not valid while the controller is {state:?}")]
    InvalidState {
        /// The rejected operation
        operation: &'static str,
        /// State at the time
        state: ControllerState,
    },

    /// Frame format differs from the session format
    #[error("frame format {actual:?} does not match session format {expected:?}")]
    FormatMismatch {
        /// Session format
        expected: AudioFormat,
        /// Format of the submitted frame
        actual: AudioFormat,
    },

    /// Frame length differs from the session frame size
    #[error("frame is {actual} bytes, session frames are {expected} bytes")]
    FrameSizeMismatch {
        /// Session frame size
        expected: usize,
        /// Size of the submitted frame
        actual: usize,
    },

    /// Configuration values are inconsistent
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong
        message: String,
    },

    /// Configuration could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl PlayoutError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this is a caller mistake rather than a device or config problem
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidState { .. } | Self::FormatMismatch { .. } | Self::FrameSizeMismatch { .. }
        )
    }
}

/// Result type for playout operations
pub type Result<T> = std::result::Result<T, PlayoutError>;
