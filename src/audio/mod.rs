//! Audio handling module

pub mod buffer;
pub mod format;
pub mod frame;
pub mod sink;
pub mod sink_cpal;
pub mod sink_memory;

#[cfg(test)]
mod tests;

pub use buffer::{QueueConsumer, QueueProducer, SampleQueue};
pub use format::{AudioFormat, ChannelConfig, SampleFormat};
pub use frame::AudioFrame;
pub use sink::{OutputState, PlaybackSink, SinkError, create_default_sink, probe_sink};
#[cfg(feature = "audio-cpal")]
pub use sink_cpal::CpalSink;
pub use sink_memory::MemorySink;
