//! Idle queue calibration
//!
//! Some backends (WASAPI in particular) report device silence as queued
//! audio, so the pending byte count never reaches zero even when nothing has
//! been submitted. Calibration measures that floor once, before playback
//! starts, so it is not mistaken for backlog.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::audio::sink::PlaybackSink;
use crate::error::PlayoutError;

/// Most idle readings a calibration window may take
pub const MAX_CALIBRATION_SAMPLES: u32 = 1000;

/// Longest delay between idle readings
pub const MAX_CALIBRATION_INTERVAL_MS: u64 = 100;

/// Longest total calibration window
pub const MAX_CALIBRATION_WINDOW: Duration = Duration::from_secs(5);

/// Strategy for measuring the idle pending-byte floor of a freshly opened sink
pub trait BaselineCalibration {
    /// Measure the baseline to subtract from every pending-byte reading
    fn measure(&self, sink: &dyn PlaybackSink) -> u32;

    /// Check that `measure` returns within a bounded time
    ///
    /// # Errors
    ///
    /// Returns `PlayoutError::InvalidConfig` for an unbounded window.
    fn validate(&self) -> Result<(), PlayoutError> {
        Ok(())
    }
}

/// Built-in calibration strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Calibration {
    /// Baseline is zero
    Disabled,
    /// Sample the idle queue and keep twice the largest reading
    IdlePadding {
        /// Number of readings
        samples: u32,
        /// Delay between readings in milliseconds
        interval_ms: u64,
    },
}

impl Calibration {
    /// Idle sampling with the standard window of 100 readings, 10 ms apart
    pub const IDLE_PADDING: Self = Self::IdlePadding {
        samples: 100,
        interval_ms: 10,
    };

    /// Strategy suited to the platform this binary runs on
    #[must_use]
    pub fn platform_default() -> Self {
        if cfg!(target_os = "windows") {
            Self::IDLE_PADDING
        } else {
            Self::Disabled
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl BaselineCalibration for Calibration {
    fn validate(&self) -> Result<(), PlayoutError> {
        if let Calibration::IdlePadding {
            samples,
            interval_ms,
        } = *self
        {
            if samples > MAX_CALIBRATION_SAMPLES {
                return Err(PlayoutError::invalid_config(format!(
                    "calibration samples ({samples}) exceed {MAX_CALIBRATION_SAMPLES}"
                )));
            }
            if interval_ms > MAX_CALIBRATION_INTERVAL_MS {
                return Err(PlayoutError::invalid_config(format!(
                    "calibration interval ({interval_ms} ms) exceeds {MAX_CALIBRATION_INTERVAL_MS} ms"
                )));
            }
            let window = Duration::from_millis(interval_ms) * samples;
            if window > MAX_CALIBRATION_WINDOW {
                return Err(PlayoutError::invalid_config(format!(
                    "calibration window ({window:?}) exceeds {MAX_CALIBRATION_WINDOW:?}"
                )));
            }
        }
        Ok(())
    }

    fn measure(&self, sink: &dyn PlaybackSink) -> u32 {
        match *self {
            Calibration::Disabled => 0,
            Calibration::IdlePadding {
                samples,
                interval_ms,
            } => sample_idle_padding(sink, samples, Duration::from_millis(interval_ms)),
        }
    }
}

/// Largest of `samples` idle readings taken `interval` apart, doubled
///
/// Zero readings yields zero.
pub fn sample_idle_padding(sink: &dyn PlaybackSink, samples: u32, interval: Duration) -> u32 {
    let mut peak = 0u32;
    for i in 0..samples {
        peak = peak.max(sink.pending_bytes());
        if i + 1 < samples && !interval.is_zero() {
            thread::sleep(interval);
        }
    }
    peak.saturating_mul(2)
}
