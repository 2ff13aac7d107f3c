pub mod scripted_sink;

pub use scripted_sink::ScriptedSink;

use crate::audio::frame::AudioFrame;
use crate::playout::SessionConfig;

/// Helper to build a silent frame sized for `session`.
#[must_use]
pub fn session_frame(session: &SessionConfig) -> AudioFrame {
    AudioFrame::silence(session.format(), session.samples_per_frame as usize)
}

/// Bytes in one frame of `session`, as the sink counts them.
#[must_use]
pub fn frame_bytes(session: &SessionConfig) -> u32 {
    u32::try_from(session.bytes_per_frame()).unwrap_or(u32::MAX)
}
