//! Feed a controller from an async channel
//!
//! The spawned task is the session's only submitter, so frames decoded on
//! any number of async tasks reach the sink in channel order.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::audio::frame::AudioFrame;
use crate::audio::sink::PlaybackSink;

use super::controller::PlayoutController;
use super::stats::PlayoutStats;

/// Run an active controller on its own task until `frames` closes
///
/// Every received frame is submitted in order. Usage errors (e.g. a frame of
/// the wrong size) are logged and the frame skipped. When the channel closes
/// the controller is closed and its final statistics returned.
pub fn spawn_playout<S>(
    mut controller: PlayoutController<S>,
    mut frames: mpsc::Receiver<AudioFrame>,
) -> JoinHandle<PlayoutStats>
where
    S: PlaybackSink + 'static,
{
    tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if let Err(e) = controller.submit(&frame) {
                tracing::warn!(error = %e, "Audio frame rejected");
            }
        }

        tracing::debug!("Audio frame channel closed, stopping playout");
        if let Err(e) = controller.close() {
            tracing::warn!(error = %e, "Failed to close audio device");
        }
        controller.stats().clone()
    })
}
