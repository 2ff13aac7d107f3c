//! Sink whose queue depth is scripted by the test

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::audio::format::AudioFormat;
use crate::audio::sink::{OutputState, PlaybackSink, SinkError};

#[derive(Debug, Default)]
struct ScriptState {
    readings: VecDeque<u32>,
    steady_pending: u32,
    fail_open: bool,
    fail_enqueue: bool,
    opened_with: Option<(AudioFormat, u32)>,
    state: Option<OutputState>,
    enqueued: Vec<usize>,
    queries: usize,
    close_calls: usize,
}

/// Playback sink test double
///
/// Reports scripted pending-byte readings instead of a real queue and
/// records every call. Clones share state, so a test can keep one handle
/// while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSink {
    inner: Arc<Mutex<ScriptState>>,
}

impl ScriptedSink {
    /// Create a sink reporting an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Report `bytes` pending once the scripted readings run out
    pub fn set_pending_bytes(&self, bytes: u32) {
        self.lock().steady_pending = bytes;
    }

    /// Report `frames` whole frames of `frame_bytes` each
    pub fn set_backlog_frames(&self, frames: u32, frame_bytes: u32) {
        self.set_pending_bytes(frames.saturating_mul(frame_bytes));
    }

    /// Queue one-off readings returned by the next queries, in order
    pub fn push_readings(&self, readings: impl IntoIterator<Item = u32>) {
        self.lock().readings.extend(readings);
    }

    /// Make the next `open` calls fail
    pub fn fail_open(&self, fail: bool) {
        self.lock().fail_open = fail;
    }

    /// Make `enqueue` calls fail
    pub fn fail_enqueue(&self, fail: bool) {
        self.lock().fail_enqueue = fail;
    }

    /// Format and period size passed to the last successful `open`
    #[must_use]
    pub fn opened_with(&self) -> Option<(AudioFormat, u32)> {
        self.lock().opened_with
    }

    /// Number of successful enqueues
    #[must_use]
    pub fn enqueued_frames(&self) -> usize {
        self.lock().enqueued.len()
    }

    /// Total bytes successfully enqueued
    #[must_use]
    pub fn enqueued_bytes(&self) -> usize {
        self.lock().enqueued.iter().sum()
    }

    /// Number of `pending_bytes` queries
    #[must_use]
    pub fn queries(&self) -> usize {
        self.lock().queries
    }

    /// Number of `close` calls
    #[must_use]
    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }
}

impl PlaybackSink for ScriptedSink {
    fn open(
        &mut self,
        format: AudioFormat,
        frames_per_callback: u32,
    ) -> Result<AudioFormat, SinkError> {
        let mut state = self.lock();
        if state.fail_open {
            return Err(SinkError::DeviceNotFound("scripted failure".into()));
        }
        state.opened_with = Some((format, frames_per_callback));
        state.state = Some(OutputState::Paused);
        Ok(format)
    }

    fn pending_bytes(&self) -> u32 {
        let mut state = self.lock();
        state.queries += 1;
        let steady = state.steady_pending;
        state.readings.pop_front().unwrap_or(steady)
    }

    fn enqueue(&mut self, data: &[u8]) -> Result<(), SinkError> {
        let mut state = self.lock();
        if state.state.is_none() {
            return Err(SinkError::NotOpen);
        }
        if state.fail_enqueue {
            return Err(SinkError::StreamError("scripted failure".into()));
        }
        state.enqueued.push(data.len());
        Ok(())
    }

    fn set_paused(&mut self, paused: bool) -> Result<(), SinkError> {
        let mut state = self.lock();
        if state.state.is_none() {
            return Err(SinkError::NotOpen);
        }
        state.state = Some(if paused {
            OutputState::Paused
        } else {
            OutputState::Playing
        });
        Ok(())
    }

    fn state(&self) -> OutputState {
        self.lock().state.unwrap_or(OutputState::Stopped)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let mut state = self.lock();
        state.close_calls += 1;
        state.state = None;
        Ok(())
    }
}
