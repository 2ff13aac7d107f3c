//! Audio format definitions

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// PCM sample encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// 16-bit signed integer, little endian
    #[default]
    I16,
    /// 32-bit float, little endian
    F32,
}

impl SampleFormat {
    /// Get bytes per sample
    #[must_use]
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::I16 => 2,
            SampleFormat::F32 => 4,
        }
    }

    /// Get bits per sample
    #[must_use]
    pub fn bits_per_sample(self) -> u8 {
        match self {
            SampleFormat::I16 => 16,
            SampleFormat::F32 => 32,
        }
    }
}

/// Channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelConfig {
    /// Mono (1 channel)
    Mono,
    /// Stereo (2 channels)
    #[default]
    Stereo,
    /// 5.1 surround (6 channels)
    Surround51,
    /// 7.1 surround (8 channels)
    Surround71,
}

impl ChannelConfig {
    /// Get number of channels
    #[must_use]
    pub fn channels(self) -> u8 {
        match self {
            ChannelConfig::Mono => 1,
            ChannelConfig::Stereo => 2,
            ChannelConfig::Surround51 => 6,
            ChannelConfig::Surround71 => 8,
        }
    }

    /// Create from a channel count
    #[must_use]
    pub fn from_count(count: u16) -> Option<Self> {
        match count {
            1 => Some(ChannelConfig::Mono),
            2 => Some(ChannelConfig::Stereo),
            6 => Some(ChannelConfig::Surround51),
            8 => Some(ChannelConfig::Surround71),
            _ => None,
        }
    }

    /// Pick the stream layout to request for a device's preferred channel count.
    ///
    /// Anything wider than stereo gets 5.1: downmixing surround on the device
    /// side sounds better than upmixing stereo.
    #[must_use]
    pub fn for_preferred_channels(preferred: u16) -> Self {
        if preferred > 2 {
            ChannelConfig::Surround51
        } else {
            ChannelConfig::Stereo
        }
    }
}

/// Complete PCM format of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample format
    pub sample_format: SampleFormat,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel configuration
    pub channels: ChannelConfig,
}

impl AudioFormat {
    /// 48 kHz stereo, signed 16-bit
    pub const STEREO_48K: Self = Self {
        sample_format: SampleFormat::I16,
        sample_rate: 48_000,
        channels: ChannelConfig::Stereo,
    };

    /// Create a new audio format
    #[must_use]
    pub fn new(sample_format: SampleFormat, sample_rate: u32, channels: ChannelConfig) -> Self {
        Self {
            sample_format,
            sample_rate,
            channels,
        }
    }

    /// Bytes for one sample on every channel
    #[must_use]
    pub fn bytes_per_sample_frame(self) -> usize {
        self.sample_format.bytes_per_sample() * usize::from(self.channels.channels())
    }

    /// Get bytes per second
    #[must_use]
    pub fn bytes_per_second(self) -> usize {
        self.bytes_per_sample_frame() * self.sample_rate as usize
    }

    /// Duration covered by `samples` per-channel samples
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn samples_to_duration(self, samples: usize) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(samples as f64 / f64::from(self.sample_rate))
    }

    /// Calculate bytes for given duration
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[must_use]
    pub fn duration_to_bytes(self, duration: Duration) -> usize {
        let samples = (duration.as_secs_f64() * f64::from(self.sample_rate)) as usize;
        samples * self.bytes_per_sample_frame()
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::STEREO_48K
    }
}
