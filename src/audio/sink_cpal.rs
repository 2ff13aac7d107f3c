//! CPAL-based playback sink
//!
//! Cross-platform output using the `cpal` crate. Frames are queued in a
//! [`SampleQueue`](super::buffer::SampleQueue) whose consumer half the
//! device callback drains; underruns are filled with silence.

#[cfg(feature = "audio-cpal")]
use super::buffer::QueueConsumer;

/// Decode queued little-endian bytes into device samples, padding with silence
#[cfg(feature = "audio-cpal")]
pub(crate) fn fill_from_queue<T: Copy, const N: usize>(
    queue: &mut QueueConsumer,
    scratch: &mut Vec<u8>,
    out: &mut [T],
    decode: fn([u8; N]) -> T,
    silence: T,
) {
    scratch.resize(out.len() * N, 0);
    let whole = queue.read(scratch) / N;

    for (sample, raw) in out.iter_mut().zip(scratch[..whole * N].chunks_exact(N)) {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(raw);
        *sample = decode(bytes);
    }
    for sample in &mut out[whole..] {
        *sample = silence;
    }
}

#[cfg(feature = "audio-cpal")]
mod implementation {
    use super::fill_from_queue;
    use super::super::buffer::{QueueConsumer, QueueProducer, SampleQueue};
    use super::super::format::{AudioFormat, SampleFormat};
    use super::super::sink::{OutputState, PlaybackSink, SinkError};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    /// Default amount of audio the queue can hold
    const DEFAULT_QUEUE_DURATION: Duration = Duration::from_secs(2);

    enum StreamCommand {
        Pause,
        Resume,
        Stop,
    }

    /// Sink that plays through a `cpal` output stream
    pub struct CpalSink {
        host: cpal::Host,
        device_name: Option<String>,
        queue_duration: Duration,
        producer: Option<QueueProducer>,
        command_tx: Option<mpsc::Sender<StreamCommand>>,
        state: OutputState,
        format: Option<AudioFormat>,
    }

    impl CpalSink {
        /// Create a sink on the default host and default output device
        #[must_use]
        pub fn new() -> Self {
            Self {
                host: cpal::default_host(),
                device_name: None,
                queue_duration: DEFAULT_QUEUE_DURATION,
                producer: None,
                command_tx: None,
                state: OutputState::Stopped,
                format: None,
            }
        }

        /// Use the output device with this name instead of the default
        #[must_use]
        pub fn with_device(mut self, name: impl Into<String>) -> Self {
            self.device_name = Some(name.into());
            self
        }

        /// Size the queue to hold `duration` of audio
        #[must_use]
        pub fn with_queue_duration(mut self, duration: Duration) -> Self {
            self.queue_duration = duration;
            self
        }

        /// Names of the available output devices
        ///
        /// # Errors
        ///
        /// Returns `SinkError::DeviceError` if the host cannot list devices.
        pub fn output_device_names(&self) -> Result<Vec<String>, SinkError> {
            let devices = self
                .host
                .output_devices()
                .map_err(|e| SinkError::DeviceError(e.to_string()))?;
            Ok(devices
                .map(|d| d.name().unwrap_or_else(|_| "Unknown".to_string()))
                .collect())
        }

        fn select_device(&self) -> Result<cpal::Device, SinkError> {
            if let Some(ref name) = self.device_name {
                self.host
                    .output_devices()
                    .map_err(|e| SinkError::DeviceError(e.to_string()))?
                    .find(|d| d.name().ok().as_deref() == Some(name.as_str()))
                    .ok_or_else(|| SinkError::DeviceNotFound(name.clone()))
            } else {
                self.host
                    .default_output_device()
                    .ok_or_else(|| SinkError::DeviceNotFound("No default device".into()))
            }
        }

        fn spawn_stream_thread(
            device: cpal::Device,
            config: cpal::StreamConfig,
            format: AudioFormat,
            queue: QueueConsumer,
            rx: mpsc::Receiver<StreamCommand>,
            status_tx: mpsc::Sender<Result<(), SinkError>>,
        ) {
            thread::spawn(move || {
                let err_fn = |err| tracing::error!("CPAL stream error: {}", err);

                match Self::build_stream(&device, &config, format, queue, err_fn) {
                    Ok(stream) => {
                        // Come up paused; the controller resumes once calibrated.
                        if let Err(e) = stream.pause() {
                            tracing::debug!("Initial pause not supported: {}", e);
                        }

                        if status_tx.send(Ok(())).is_err() {
                            return; // Caller dropped receiver
                        }

                        Self::run_command_loop(stream.as_ref(), &rx);
                    }
                    Err(e) => {
                        let _ = status_tx.send(Err(e));
                    }
                }
            });
        }

        fn build_stream<E>(
            device: &cpal::Device,
            config: &cpal::StreamConfig,
            format: AudioFormat,
            mut queue: QueueConsumer,
            err_fn: E,
        ) -> Result<Box<dyn StreamTrait>, SinkError>
        where
            E: Fn(cpal::StreamError) + Send + 'static + Copy,
        {
            match format.sample_format {
                SampleFormat::I16 => {
                    let mut scratch = Vec::new();
                    let stream = device
                        .build_output_stream(
                            config,
                            move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                                fill_from_queue::<i16, 2>(
                                    &mut queue,
                                    &mut scratch,
                                    data,
                                    i16::from_le_bytes,
                                    0,
                                );
                            },
                            err_fn,
                            None,
                        )
                        .map_err(|e| SinkError::DeviceError(e.to_string()))?;
                    Ok(Box::new(stream))
                }
                SampleFormat::F32 => {
                    let mut scratch = Vec::new();
                    let stream = device
                        .build_output_stream(
                            config,
                            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                                fill_from_queue::<f32, 4>(
                                    &mut queue,
                                    &mut scratch,
                                    data,
                                    f32::from_le_bytes,
                                    0.0,
                                );
                            },
                            err_fn,
                            None,
                        )
                        .map_err(|e| SinkError::DeviceError(e.to_string()))?;
                    Ok(Box::new(stream))
                }
            }
        }

        fn run_command_loop(stream: &dyn StreamTrait, rx: &mpsc::Receiver<StreamCommand>) {
            loop {
                match rx.recv() {
                    Ok(StreamCommand::Stop) | Err(_) => break, // Channel closed
                    Ok(StreamCommand::Pause) => {
                        let _ = stream.pause();
                    }
                    Ok(StreamCommand::Resume) => {
                        let _ = stream.play();
                    }
                }
            }
        }

        fn send(&self, command: StreamCommand) -> Result<(), SinkError> {
            self.command_tx
                .as_ref()
                .ok_or(SinkError::NotOpen)?
                .send(command)
                .map_err(|_| SinkError::StreamError("audio thread exited".into()))
        }
    }

    impl Default for CpalSink {
        fn default() -> Self {
            Self::new()
        }
    }

    impl PlaybackSink for CpalSink {
        fn open(
            &mut self,
            format: AudioFormat,
            frames_per_callback: u32,
        ) -> Result<AudioFormat, SinkError> {
            if self.command_tx.is_some() {
                let _ = self.close();
            }

            let device = self.select_device()?;

            // Period size is left to the backend; many reject non power of two
            // fixed sizes and the queue absorbs the difference.
            let config = cpal::StreamConfig {
                channels: u16::from(format.channels.channels()),
                sample_rate: cpal::SampleRate(format.sample_rate),
                buffer_size: cpal::BufferSize::Default,
            };
            tracing::debug!(
                requested_period = frames_per_callback,
                "Opening CPAL output stream"
            );

            let capacity = format.duration_to_bytes(self.queue_duration).max(1);
            let (producer, consumer) = SampleQueue::new(capacity).split();
            // Backends that cannot pause keep calling back; they get silence.
            producer.set_paused(true);

            let (tx, rx) = mpsc::channel();
            let (status_tx, status_rx) = mpsc::channel();

            Self::spawn_stream_thread(device, config, format, consumer, rx, status_tx);

            // Wait for initialization
            status_rx
                .recv()
                .map_err(|_| SinkError::DeviceError("Audio thread panicked".into()))??;

            self.command_tx = Some(tx);
            self.producer = Some(producer);
            self.format = Some(format);
            self.state = OutputState::Paused;

            Ok(format)
        }

        fn pending_bytes(&self) -> u32 {
            self.producer
                .as_ref()
                .map_or(0, |q| u32::try_from(q.pending()).unwrap_or(u32::MAX))
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
            if paused {
                self.send(StreamCommand::Pause)?;
                self.state = OutputState::Paused;
            } else {
                self.send(StreamCommand::Resume)?;
                self.state = OutputState::Playing;
            }
            if let Some(producer) = self.producer.as_ref() {
                producer.set_paused(paused);
            }
            Ok(())
        }

        fn state(&self) -> OutputState {
            self.state
        }

        fn close(&mut self) -> Result<(), SinkError> {
            if let Some(tx) = self.command_tx.take() {
                let _ = tx.send(StreamCommand::Stop);
            }
            self.producer = None;
            self.format = None;
            self.state = OutputState::Stopped;
            Ok(())
        }
    }

    impl Drop for CpalSink {
        fn drop(&mut self) {
            if let Some(tx) = self.command_tx.take() {
                let _ = tx.send(StreamCommand::Stop);
            }
        }
    }
}

#[cfg(feature = "audio-cpal")]
pub use implementation::CpalSink;
