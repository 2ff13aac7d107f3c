//! Playout configuration

use serde::{Deserialize, Serialize};

use crate::audio::format::{AudioFormat, ChannelConfig, SampleFormat};
use crate::error::PlayoutError;
use crate::playout::calibration::{BaselineCalibration, Calibration};

/// Backlog thresholds driving the drop policy, all in frames
///
/// The defaults were tuned for 5 ms frames at 48 kHz; other frame sizes or
/// device queue granularities may want different values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayoutThresholds {
    /// Steady-state backlog. At or below this, pending drops are cancelled
    /// and every drop budget aims to return here.
    pub min_queued_frames: u32,

    /// Backlog above this schedules a spread-out soft-drop budget
    pub max_queued_frames: u32,

    /// Backlog above this schedules an immediate hard-drop burst
    pub stop_the_world_limit: u32,

    /// Soft drops only happen on frames whose index is a multiple of this
    pub drop_ratio_denom: u32,
}

impl Default for PlayoutThresholds {
    fn default() -> Self {
        Self {
            min_queued_frames: 2,
            max_queued_frames: 4,
            stop_the_world_limit: 20,
            drop_ratio_denom: 32,
        }
    }
}

impl PlayoutThresholds {
    /// Set the steady-state backlog
    #[must_use]
    pub fn min_queued_frames(mut self, frames: u32) -> Self {
        self.min_queued_frames = frames;
        self
    }

    /// Set the soft-drop trigger
    #[must_use]
    pub fn max_queued_frames(mut self, frames: u32) -> Self {
        self.max_queued_frames = frames;
        self
    }

    /// Set the hard-drop trigger
    #[must_use]
    pub fn stop_the_world_limit(mut self, frames: u32) -> Self {
        self.stop_the_world_limit = frames;
        self
    }

    /// Set the soft-drop spacing
    #[must_use]
    pub fn drop_ratio_denom(mut self, denom: u32) -> Self {
        self.drop_ratio_denom = denom;
        self
    }

    /// Check the thresholds are ordered sensibly
    ///
    /// # Errors
    ///
    /// Returns `PlayoutError::InvalidConfig` when the denominator is zero or
    /// the limits are not `min <= max <= stop_the_world`.
    pub fn validate(&self) -> Result<(), PlayoutError> {
        if self.drop_ratio_denom == 0 {
            return Err(PlayoutError::invalid_config(
                "drop_ratio_denom must be at least 1",
            ));
        }
        if self.min_queued_frames > self.max_queued_frames {
            return Err(PlayoutError::invalid_config(format!(
                "min_queued_frames ({}) exceeds max_queued_frames ({})",
                self.min_queued_frames, self.max_queued_frames
            )));
        }
        if self.max_queued_frames > self.stop_the_world_limit {
            return Err(PlayoutError::invalid_config(format!(
                "max_queued_frames ({}) exceeds stop_the_world_limit ({})",
                self.max_queued_frames, self.stop_the_world_limit
            )));
        }
        Ok(())
    }
}

/// Format of one playback session, fixed until the sink is reopened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel layout
    pub channels: ChannelConfig,
    /// Samples per channel in every frame
    pub samples_per_frame: u32,
    /// Sample encoding
    #[serde(default)]
    pub sample_format: SampleFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: ChannelConfig::Stereo,
            samples_per_frame: 240,
            sample_format: SampleFormat::I16,
        }
    }
}

impl SessionConfig {
    /// Create a signed 16-bit session
    #[must_use]
    pub fn new(sample_rate: u32, channels: ChannelConfig, samples_per_frame: u32) -> Self {
        Self {
            sample_rate,
            channels,
            samples_per_frame,
            sample_format: SampleFormat::I16,
        }
    }

    /// Set the sample encoding
    #[must_use]
    pub fn sample_format(mut self, format: SampleFormat) -> Self {
        self.sample_format = format;
        self
    }

    /// PCM format frames are delivered in
    #[must_use]
    pub fn format(&self) -> AudioFormat {
        AudioFormat::new(self.sample_format, self.sample_rate, self.channels)
    }

    /// Size of every frame in bytes
    #[must_use]
    pub fn bytes_per_frame(&self) -> usize {
        self.samples_per_frame as usize * self.format().bytes_per_sample_frame()
    }

    /// Playback time covered by one frame
    #[must_use]
    pub fn frame_duration(&self) -> std::time::Duration {
        self.format()
            .samples_to_duration(self.samples_per_frame as usize)
    }

    /// Check the session describes a usable stream
    ///
    /// # Errors
    ///
    /// Returns `PlayoutError::InvalidConfig` for a zero sample rate or frame
    /// size, or a frame too large to count in the sink's 32-bit queue size.
    pub fn validate(&self) -> Result<(), PlayoutError> {
        if self.sample_rate == 0 {
            return Err(PlayoutError::invalid_config("sample_rate must be non-zero"));
        }
        if self.samples_per_frame == 0 {
            return Err(PlayoutError::invalid_config(
                "samples_per_frame must be non-zero",
            ));
        }
        if u32::try_from(self.bytes_per_frame()).is_err() {
            return Err(PlayoutError::invalid_config(format!(
                "frame of {} bytes is too large",
                self.bytes_per_frame()
            )));
        }
        Ok(())
    }
}

/// Deployment tuning for the playout controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayoutConfig {
    /// Drop policy thresholds
    pub thresholds: PlayoutThresholds,
    /// Idle queue calibration
    pub calibration: Calibration,
}

impl PlayoutConfig {
    /// Parse and validate a JSON configuration
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `PlayoutError::ConfigParse` for malformed JSON and
    /// `PlayoutError::InvalidConfig` for inconsistent thresholds or an
    /// oversized calibration window.
    pub fn from_json(json: &str) -> Result<Self, PlayoutError> {
        let config: Self = serde_json::from_str(json)?;
        config.thresholds.validate()?;
        config.calibration.validate()?;
        Ok(config)
    }

    /// Set thresholds
    #[must_use]
    pub fn thresholds(mut self, thresholds: PlayoutThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set calibration strategy
    #[must_use]
    pub fn calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }
}
