//! Playout statistics

use serde::Serialize;

/// Per-session playout counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayoutStats {
    /// Frames passed to `submit` while active
    pub frames_submitted: u64,
    /// Frames handed to the sink successfully
    pub frames_enqueued: u64,
    /// Frames discarded by hard-drop bursts
    pub hard_drops: u64,
    /// Frames discarded by spaced soft drops
    pub soft_drops: u64,
    /// Frames lost because the sink rejected them
    pub enqueue_failures: u64,
    /// Hard-drop bursts scheduled
    pub hard_drop_bursts: u64,
    /// Largest backlog estimate seen, in frames
    pub peak_frames_queued: u32,
}

impl PlayoutStats {
    /// Frames discarded for any reason
    #[must_use]
    pub fn frames_lost(&self) -> u64 {
        self.hard_drops + self.soft_drops + self.enqueue_failures
    }
}
