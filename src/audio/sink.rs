//! Playback sink abstraction
//!
//! A sink owns the output device and its internal byte queue. The device
//! drains the queue asynchronously at its own clock; callers only ever see
//! how many bytes are still pending.

use crate::audio::format::AudioFormat;

/// Errors from a playback sink
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Device not found
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Format not supported
    #[error("Format not supported: {0:?}")]
    FormatNotSupported(AudioFormat),

    /// Stream error
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Generic device error
    #[error("Device error: {0}")]
    DeviceError(String),

    /// Queue has no room for the data
    #[error("Queue full: {requested} bytes requested, {free} free")]
    QueueFull {
        /// Bytes the caller tried to enqueue
        requested: usize,
        /// Bytes of free space at the time
        free: usize,
    },

    /// Operation requires an open sink
    #[error("Sink not open")]
    NotOpen,

    /// Sink closed
    #[error("Sink closed")]
    Closed,
}

/// Sink state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    /// Not open, or closed
    Stopped,
    /// Open and draining the queue
    Playing,
    /// Open, queue retained but not drained
    Paused,
}

/// Byte-queue view of an audio output device
///
/// `pending_bytes` and `enqueue` are called once per submitted frame from the
/// decode thread and must not block. The device-side consumer runs on its own
/// thread; implementations must make that single-producer single-consumer
/// pattern safe without the caller taking a lock.
pub trait PlaybackSink: Send {
    /// Open the device for `format`, asking for `frames_per_callback` samples
    /// per device period.
    ///
    /// Returns the format the device actually runs at. Callers keep sending
    /// the requested format regardless. The sink may come up paused.
    fn open(
        &mut self,
        format: AudioFormat,
        frames_per_callback: u32,
    ) -> Result<AudioFormat, SinkError>;

    /// Bytes currently queued for playback, including any padding the backend
    /// counts while idle.
    fn pending_bytes(&self) -> u32;

    /// Append bytes to the playback queue without waiting for the device.
    fn enqueue(&mut self, data: &[u8]) -> Result<(), SinkError>;

    /// Pause or resume draining.
    fn set_paused(&mut self, paused: bool) -> Result<(), SinkError>;

    /// Current state
    fn state(&self) -> OutputState;

    /// Stop and release the device. Queued data may be discarded.
    fn close(&mut self) -> Result<(), SinkError>;
}

impl<S: PlaybackSink + ?Sized> PlaybackSink for Box<S> {
    fn open(
        &mut self,
        format: AudioFormat,
        frames_per_callback: u32,
    ) -> Result<AudioFormat, SinkError> {
        (**self).open(format, frames_per_callback)
    }

    fn pending_bytes(&self) -> u32 {
        (**self).pending_bytes()
    }

    fn enqueue(&mut self, data: &[u8]) -> Result<(), SinkError> {
        (**self).enqueue(data)
    }

    fn set_paused(&mut self, paused: bool) -> Result<(), SinkError> {
        (**self).set_paused(paused)
    }

    fn state(&self) -> OutputState {
        (**self).state()
    }

    fn close(&mut self) -> Result<(), SinkError> {
        (**self).close()
    }
}

/// Check that a sink can be opened with `format`, then close it again
///
/// Used before a session starts to decide whether a channel layout works on
/// the current device.
pub fn probe_sink<S: PlaybackSink + ?Sized>(
    sink: &mut S,
    format: AudioFormat,
    frames_per_callback: u32,
) -> bool {
    if let Err(e) = sink.open(format, frames_per_callback) {
        tracing::error!(
            channels = format.channels.channels(),
            error = %e,
            "Audio probe failed to open device"
        );
        return false;
    }

    if let Err(e) = sink.close() {
        tracing::warn!(error = %e, "Audio probe failed to close device");
    }

    tracing::info!(
        channels = format.channels.channels(),
        "Audio probe succeeded"
    );
    true
}

/// Create the default device-backed sink for the current build
///
/// # Errors
///
/// Returns `SinkError::DeviceError` when no audio backend feature is enabled.
pub fn create_default_sink() -> Result<Box<dyn PlaybackSink>, SinkError> {
    #[cfg(feature = "audio-cpal")]
    {
        Ok(Box::new(super::sink_cpal::CpalSink::new()))
    }

    #[cfg(not(feature = "audio-cpal"))]
    {
        Err(SinkError::DeviceError(
            "No audio backend enabled. Enable the audio-cpal feature.".into(),
        ))
    }
}
