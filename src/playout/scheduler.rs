//! Two-tier frame drop policy
//!
//! Small, steady backlog growth (clock drift) is corrected with soft drops
//! spaced at most one per `drop_ratio_denom` frames, which the listener does
//! not notice. A large backlog (after a stall) is collapsed at once with a
//! burst of consecutive hard drops, trading a short audible gap for getting
//! latency back down.

use super::config::PlayoutThresholds;

/// What to do with one submitted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayoutDecision {
    /// Queue the frame for playback
    Enqueue,
    /// Discard as part of a hard-drop burst
    HardDrop,
    /// Discard as one spaced-out soft drop
    SoftDrop,
}

impl PlayoutDecision {
    /// Whether the frame is discarded
    #[must_use]
    pub fn is_drop(self) -> bool {
        !matches!(self, PlayoutDecision::Enqueue)
    }
}

/// Snapshot of the scheduler's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropState {
    /// Soft drops still owed
    pub pending_drops: u32,
    /// Hard drops still owed
    pub pending_hard_drops: u32,
    /// Frames decided on this session
    pub sample_index: u64,
}

/// Drop scheduler for one session
///
/// Owned by the single thread that submits frames; nothing here is shared.
#[derive(Debug, Clone)]
pub struct DropScheduler {
    thresholds: PlayoutThresholds,
    pending_drops: u32,
    pending_hard_drops: u32,
    sample_index: u64,
    hard_bursts: u64,
}

impl DropScheduler {
    /// Create a scheduler with no drops pending
    #[must_use]
    pub fn new(thresholds: PlayoutThresholds) -> Self {
        Self {
            thresholds,
            pending_drops: 0,
            pending_hard_drops: 0,
            sample_index: 0,
            hard_bursts: 0,
        }
    }

    /// Thresholds in use
    #[must_use]
    pub fn thresholds(&self) -> PlayoutThresholds {
        self.thresholds
    }

    /// Forget all pending drops and restart the frame index
    pub fn reset(&mut self) {
        self.pending_drops = 0;
        self.pending_hard_drops = 0;
        self.sample_index = 0;
        self.hard_bursts = 0;
    }

    /// Hard-drop bursts scheduled since the last reset
    #[must_use]
    pub fn hard_bursts(&self) -> u64 {
        self.hard_bursts
    }

    /// Current counters
    #[must_use]
    pub fn state(&self) -> DropState {
        DropState {
            pending_drops: self.pending_drops,
            pending_hard_drops: self.pending_hard_drops,
            sample_index: self.sample_index,
        }
    }

    /// Decide the fate of the next frame given the estimated backlog in frames
    pub fn decide(&mut self, frames_queued: u32) -> PlayoutDecision {
        let t = self.thresholds;
        self.sample_index += 1;

        // Every branch below relies on frames_queued > min_queued_frames, and
        // each subtraction is guarded by the comparison before it.
        if frames_queued <= t.min_queued_frames {
            self.pending_drops = 0;
            self.pending_hard_drops = 0;
        } else if frames_queued > self.pending_hard_drops
            && frames_queued - self.pending_hard_drops > t.stop_the_world_limit
        {
            self.pending_hard_drops = frames_queued - t.min_queued_frames;
            self.hard_bursts += 1;
            tracing::info!(
                frames = self.pending_hard_drops,
                backlog = frames_queued,
                "Pending hard drop of audio frames"
            );
        } else if frames_queued > self.scheduled_drops()
            && frames_queued - self.scheduled_drops() > t.max_queued_frames
        {
            self.pending_drops = frames_queued - t.min_queued_frames;
            tracing::debug!(
                frames = self.pending_drops,
                backlog = frames_queued,
                "Pending soft drop of audio frames"
            );
        }

        if self.pending_hard_drops > 0 {
            self.pending_hard_drops -= 1;
            PlayoutDecision::HardDrop
        } else if self.pending_drops > 0
            && self.sample_index.checked_rem(u64::from(t.drop_ratio_denom)) == Some(0)
        {
            self.pending_drops -= 1;
            PlayoutDecision::SoftDrop
        } else {
            PlayoutDecision::Enqueue
        }
    }

    fn scheduled_drops(&self) -> u32 {
        self.pending_hard_drops.saturating_add(self.pending_drops)
    }
}
