//! In-process playback sink
//!
//! Queues PCM into a [`SampleQueue`] whose consumer half some other party
//! drains, e.g. a simulated device in tests or an externally driven render
//! callback.

use super::buffer::{QueueConsumer, QueueProducer, SampleQueue};
use super::format::AudioFormat;
use super::sink::{OutputState, PlaybackSink, SinkError};

/// Sink backed by an in-memory queue
pub struct MemorySink {
    capacity: usize,
    idle_padding: u32,
    producer: Option<QueueProducer>,
    consumer: Option<QueueConsumer>,
    format: Option<AudioFormat>,
    state: OutputState,
}

impl MemorySink {
    /// Create a sink whose queue holds up to `capacity` bytes once opened
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            idle_padding: 0,
            producer: None,
            consumer: None,
            format: None,
            state: OutputState::Stopped,
        }
    }

    /// Report `bytes` of extra pending data on every query, the way some
    /// backends count device silence as queued audio.
    #[must_use]
    pub fn with_idle_padding(mut self, bytes: u32) -> Self {
        self.idle_padding = bytes;
        self
    }

    /// Hand out the consumer half of the queue
    ///
    /// Available once per `open`; later calls return `None`.
    pub fn take_consumer(&mut self) -> Option<QueueConsumer> {
        self.consumer.take()
    }

    /// Format the sink was opened with
    #[must_use]
    pub fn format(&self) -> Option<AudioFormat> {
        self.format
    }
}

impl PlaybackSink for MemorySink {
    fn open(
        &mut self,
        format: AudioFormat,
        _frames_per_callback: u32,
    ) -> Result<AudioFormat, SinkError> {
        if self.capacity == 0 {
            return Err(SinkError::DeviceError("zero capacity queue".into()));
        }
        let (producer, consumer) = SampleQueue::new(self.capacity).split();
        producer.set_paused(true);
        self.producer = Some(producer);
        self.consumer = Some(consumer);
        self.format = Some(format);
        self.state = OutputState::Paused;
        Ok(format)
    }

    fn pending_bytes(&self) -> u32 {
        let queued = self.producer.as_ref().map_or(0, QueueProducer::pending);
        u32::try_from(queued)
            .unwrap_or(u32::MAX)
            .saturating_add(self.idle_padding)
    }

    fn enqueue(&mut self, data: &[u8]) -> Result<(), SinkError> {
        let producer = self.producer.as_mut().ok_or(SinkError::NotOpen)?;
        if producer.write_all(data) {
            Ok(())
        } else {
            Err(SinkError::QueueFull {
                requested: data.len(),
                free: producer.free(),
            })
        }
    }

    fn set_paused(&mut self, paused: bool) -> Result<(), SinkError> {
        let producer = self.producer.as_ref().ok_or(SinkError::NotOpen)?;
        producer.set_paused(paused);
        self.state = if paused {
            OutputState::Paused
        } else {
            OutputState::Playing
        };
        Ok(())
    }

    fn state(&self) -> OutputState {
        self.state
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.producer = None;
        self.consumer = None;
        self.format = None;
        self.state = OutputState::Stopped;
        Ok(())
    }
}
