//! Adaptive playout controller
//!
//! Sits between the decode path and a [`PlaybackSink`]. Every submitted frame
//! is either queued or discarded based on how far the sink's queue has grown
//! past its steady-state depth. The backlog estimate is re-read from the sink
//! on every frame; there is no other signal about supply or demand.

use crate::audio::frame::AudioFrame;
use crate::audio::sink::PlaybackSink;
use crate::error::{PlayoutError, Result};

use super::calibration::BaselineCalibration;
use super::config::{PlayoutThresholds, SessionConfig};
use super::scheduler::{DropScheduler, DropState, PlayoutDecision};
use super::stats::PlayoutStats;

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Created, sink not opened
    Uninitialized,
    /// Sink open, measuring the idle baseline
    Calibrating,
    /// Accepting frames
    Active,
    /// Torn down
    Closed,
}

/// What happened to a submitted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Handed to the sink
    Enqueued,
    /// Discarded by a hard-drop burst
    HardDropped,
    /// Discarded by a spaced soft drop
    SoftDropped,
    /// Sink rejected the frame; it is lost but the session continues
    EnqueueFailed,
}

impl FrameOutcome {
    /// Whether the frame reached the sink
    #[must_use]
    pub fn is_enqueued(self) -> bool {
        matches!(self, FrameOutcome::Enqueued)
    }
}

/// Playout controller for one session
///
/// `submit` takes `&mut self`, so a session has exactly one submitter at a
/// time; move the controller to the decode thread (or use
/// [`spawn_playout`](super::spawn_playout)) rather than sharing it.
pub struct PlayoutController<S: PlaybackSink> {
    sink: S,
    state: ControllerState,
    session: Option<SessionConfig>,
    frame_bytes: u32,
    baseline_pending_bytes: u32,
    scheduler: DropScheduler,
    stats: PlayoutStats,
}

impl<S: PlaybackSink> PlayoutController<S> {
    /// Create a controller that will play through `sink`
    #[must_use]
    pub fn new(sink: S, thresholds: PlayoutThresholds) -> Self {
        Self {
            sink,
            state: ControllerState::Uninitialized,
            session: None,
            frame_bytes: 0,
            baseline_pending_bytes: 0,
            scheduler: DropScheduler::new(thresholds),
            stats: PlayoutStats::default(),
        }
    }

    /// Open the sink, calibrate the idle baseline and start playback
    ///
    /// Blocks for the duration of the calibration window.
    ///
    /// # Errors
    ///
    /// Returns `PlayoutError::InvalidState` unless the controller is
    /// uninitialized, `PlayoutError::InvalidConfig` for a bad session,
    /// thresholds or calibration window, and `PlayoutError::OpenFailed` if the sink cannot be
    /// opened or resumed. After an open failure the controller is closed.
    pub fn start(
        &mut self,
        session: SessionConfig,
        calibration: &dyn BaselineCalibration,
    ) -> Result<()> {
        if self.state != ControllerState::Uninitialized {
            return Err(PlayoutError::InvalidState {
                operation: "start",
                state: self.state,
            });
        }
        session.validate()?;
        self.scheduler.thresholds().validate()?;
        calibration.validate()?;
        let frame_bytes = u32::try_from(session.bytes_per_frame())
            .map_err(|_| PlayoutError::invalid_config("frame too large"))?;

        self.state = ControllerState::Calibrating;

        let format = session.format();
        let actual = match self.sink.open(format, session.samples_per_frame) {
            Ok(actual) => actual,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open audio device");
                self.state = ControllerState::Closed;
                return Err(PlayoutError::OpenFailed(e));
            }
        };
        if actual != format {
            tracing::debug!(
                requested = ?format,
                actual = ?actual,
                "Audio device runs a different format; sending requested format"
            );
        }

        self.baseline_pending_bytes = calibration.measure(&self.sink);
        tracing::info!(
            baseline_bytes = self.baseline_pending_bytes,
            "Baseline pending audio data"
        );

        self.frame_bytes = frame_bytes;
        self.session = Some(session);
        self.scheduler.reset();
        self.stats = PlayoutStats::default();

        if let Err(e) = self.sink.set_paused(false) {
            tracing::error!(error = %e, "Failed to start audio playback");
            let _ = self.sink.close();
            self.state = ControllerState::Closed;
            return Err(PlayoutError::OpenFailed(e));
        }

        self.state = ControllerState::Active;
        Ok(())
    }

    /// Queue or drop one frame
    ///
    /// Frames must be submitted in playback order. Enqueue failures are
    /// logged and reported as [`FrameOutcome::EnqueueFailed`], not as errors.
    ///
    /// # Errors
    ///
    /// Returns `PlayoutError::InvalidState` outside `Active`, and
    /// `PlayoutError::FormatMismatch` / `PlayoutError::FrameSizeMismatch`
    /// for frames that do not fit the session. Drop state is unchanged in
    /// every error case.
    pub fn submit(&mut self, frame: &AudioFrame) -> Result<FrameOutcome> {
        let session = match (self.state, self.session) {
            (ControllerState::Active, Some(session)) => session,
            (state, _) => {
                tracing::warn!(state = ?state, "Audio frame submitted to inactive controller");
                return Err(PlayoutError::InvalidState {
                    operation: "submit",
                    state,
                });
            }
        };

        if frame.format() != session.format() {
            return Err(PlayoutError::FormatMismatch {
                expected: session.format(),
                actual: frame.format(),
            });
        }
        if frame.len() != self.frame_bytes as usize {
            return Err(PlayoutError::FrameSizeMismatch {
                expected: self.frame_bytes as usize,
                actual: frame.len(),
            });
        }

        let frames_queued = self.frames_queued();
        self.stats.frames_submitted += 1;
        self.stats.peak_frames_queued = self.stats.peak_frames_queued.max(frames_queued);

        let decision = self.scheduler.decide(frames_queued);
        self.stats.hard_drop_bursts = self.scheduler.hard_bursts();

        let outcome = match decision {
            PlayoutDecision::HardDrop => {
                self.stats.hard_drops += 1;
                FrameOutcome::HardDropped
            }
            PlayoutDecision::SoftDrop => {
                self.stats.soft_drops += 1;
                FrameOutcome::SoftDropped
            }
            PlayoutDecision::Enqueue => match self.sink.enqueue(frame.as_bytes()) {
                Ok(()) => {
                    self.stats.frames_enqueued += 1;
                    FrameOutcome::Enqueued
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to queue audio sample");
                    self.stats.enqueue_failures += 1;
                    FrameOutcome::EnqueueFailed
                }
            },
        };

        Ok(outcome)
    }

    /// Pause and close the sink
    ///
    /// Queued audio is not drained. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `PlayoutError::Sink` if the sink fails to close; the
    /// controller is closed regardless.
    pub fn close(&mut self) -> Result<()> {
        let was_open = matches!(
            self.state,
            ControllerState::Active | ControllerState::Calibrating
        );
        self.state = ControllerState::Closed;
        if !was_open {
            return Ok(());
        }

        if let Err(e) = self.sink.set_paused(true) {
            tracing::warn!(error = %e, "Failed to pause audio device before close");
        }
        self.sink.close()?;
        Ok(())
    }

    /// Backlog estimate in whole frames, excluding the calibrated baseline
    fn frames_queued(&self) -> u32 {
        let queued = self.sink.pending_bytes();
        let adjusted = if queued > self.baseline_pending_bytes {
            queued - self.baseline_pending_bytes
        } else {
            0
        };
        adjusted / self.frame_bytes
    }

    /// Lifecycle state
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Session format, once started
    #[must_use]
    pub fn session(&self) -> Option<SessionConfig> {
        self.session
    }

    /// Calibrated idle pending-byte floor
    #[must_use]
    pub fn baseline_pending_bytes(&self) -> u32 {
        self.baseline_pending_bytes
    }

    /// Drop counters
    #[must_use]
    pub fn drop_state(&self) -> DropState {
        self.scheduler.state()
    }

    /// Session statistics
    #[must_use]
    pub fn stats(&self) -> &PlayoutStats {
        &self.stats
    }

    /// The underlying sink
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The underlying sink, e.g. to take a consumer handle after `start`
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: PlaybackSink> Drop for PlayoutController<S> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "Failed to close audio device");
        }
    }
}
