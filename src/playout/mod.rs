//! Adaptive playout: decides per frame whether to queue or drop

pub mod calibration;
pub mod config;
mod controller;
pub mod scheduler;
mod stats;
#[cfg(feature = "tokio-runtime")]
mod task;

#[cfg(test)]
mod tests;

pub use calibration::{BaselineCalibration, Calibration};
pub use config::{PlayoutConfig, PlayoutThresholds, SessionConfig};
pub use controller::{ControllerState, FrameOutcome, PlayoutController};
pub use scheduler::{DropScheduler, DropState, PlayoutDecision};
pub use stats::PlayoutStats;
#[cfg(feature = "tokio-runtime")]
pub use task::spawn_playout;
