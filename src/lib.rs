//! # adaptive-playout
//!
//! Adaptive audio playout: keeps the latency of a live audio stream low and
//! bounded without starving the output device.
//!
//! Decoded frames arrive at the sender's cadence; the device drains them at
//! its own. For every frame the [`PlayoutController`] re-reads how much audio
//! the sink still has queued and either queues the frame or drops it:
//!
//! - a small, steady backlog is trimmed with soft drops spread at most one
//!   per `drop_ratio_denom` frames,
//! - a large backlog (after a stall) is collapsed at once with a burst of
//!   hard drops.
//!
//! ## Example
//!
//! ```rust
//! use adaptive_playout::prelude::*;
//!
//! # fn example() -> Result<(), PlayoutError> {
//! let session = SessionConfig::default();
//! let mut controller = PlayoutController::new(MemorySink::new(1 << 20), PlayoutThresholds::default());
//! controller.start(session, &Calibration::Disabled)?;
//!
//! let frame = AudioFrame::silence(session.format(), session.samples_per_frame as usize);
//! let outcome = controller.submit(&frame)?;
//! assert_eq!(outcome, FrameOutcome::Enqueued);
//!
//! controller.close()?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Architecture
//!
//! - **Audio**: formats, frames, the [`PlaybackSink`] device abstraction and
//!   its in-memory and `cpal` implementations
//! - **Playout**: the drop scheduler, calibration strategies and controller

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Error types
pub mod error;

/// Testing utilities
pub mod testing;

pub mod audio;
pub mod playout;

// Re-exports
pub use audio::{AudioFormat, AudioFrame, ChannelConfig, MemorySink, PlaybackSink, SinkError};
pub use error::PlayoutError;
pub use playout::{
    Calibration, ControllerState, FrameOutcome, PlayoutConfig, PlayoutController,
    PlayoutThresholds, SessionConfig,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
///
/// Convenient re-exports
pub mod prelude {
    pub use crate::{
        AudioFormat, AudioFrame, Calibration, ChannelConfig, ControllerState, FrameOutcome,
        MemorySink, PlaybackSink, PlayoutConfig, PlayoutController, PlayoutError,
        PlayoutThresholds, SessionConfig,
    };
}
