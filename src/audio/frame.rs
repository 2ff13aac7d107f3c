//! Decoded PCM frames

use bytes::{BufMut, Bytes, BytesMut};

use super::format::{AudioFormat, SampleFormat};

/// One fixed-size block of interleaved PCM samples
///
/// Produced by the decode path once per playback tick and consumed exactly
/// once by the playout controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    format: AudioFormat,
    data: Bytes,
}

impl AudioFrame {
    /// Wrap already interleaved little-endian sample bytes
    #[must_use]
    pub fn new(format: AudioFormat, data: impl Into<Bytes>) -> Self {
        Self {
            format,
            data: data.into(),
        }
    }

    /// Build a signed 16-bit frame from interleaved samples
    #[must_use]
    pub fn from_i16(format: AudioFormat, samples: &[i16]) -> Self {
        debug_assert_eq!(format.sample_format, SampleFormat::I16);
        let mut buf = BytesMut::with_capacity(samples.len() * 2);
        for &sample in samples {
            buf.put_i16_le(sample);
        }
        Self::new(format, buf.freeze())
    }

    /// A frame of silence holding `samples_per_channel` samples per channel
    #[must_use]
    pub fn silence(format: AudioFormat, samples_per_channel: usize) -> Self {
        let len = samples_per_channel * format.bytes_per_sample_frame();
        Self::new(format, vec![0u8; len])
    }

    /// Format of the payload
    #[must_use]
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Payload bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Payload length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Samples per channel carried by this frame
    #[must_use]
    pub fn samples_per_channel(&self) -> usize {
        match self.format.bytes_per_sample_frame() {
            0 => 0,
            n => self.data.len() / n,
        }
    }
}
