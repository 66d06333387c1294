use crate::audio::output::OutputTap;
use crate::audio::AudioBackend;
use crate::synth::config::SAMPLE_RATE;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, Stream};

/// Playback drain: pulls mixed samples out of the engine's output ring and
/// fans them across the device's channels. Underruns play silence.
pub struct CpalBackend {
    stream: Option<Stream>,
    tap: Option<OutputTap>,
}

impl CpalBackend {
    pub fn new(tap: OutputTap) -> Self {
        Self {
            stream: None,
            tap: Some(tap),
        }
    }

    fn build_stream(&mut self) -> Result<Stream, Box<dyn std::error::Error>> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("No output device available")?;
        log::info!("output device: {}", device.name().unwrap_or_default());

        let supported_config = device.default_output_config()?;
        let mut stream_config: cpal::StreamConfig = supported_config.clone().into();
        // The engine generates at a fixed rate; ask the device to match.
        stream_config.sample_rate = SampleRate(SAMPLE_RATE);

        let channels = stream_config.channels as usize;
        let mut tap = self.tap.take().ok_or("Output tap already consumed")?;

        let stream = match supported_config.sample_format() {
            SampleFormat::F32 => device.build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        let sample = tap.pop().unwrap_or(0.0);
                        for slot in frame.iter_mut() {
                            *slot = sample;
                        }
                    }
                },
                |err| log::error!("stream error: {err}"),
                None,
            )?,
            _ => return Err("Unsupported sample format".into()),
        };

        Ok(stream)
    }
}

impl AudioBackend for CpalBackend {
    fn start(&mut self) {
        match self.build_stream() {
            Ok(stream) => {
                stream.play().expect("Failed to start stream");
                self.stream = Some(stream);
            }
            Err(e) => log::error!("audio backend failed to start: {e}"),
        }
    }

    fn stop(&mut self) {
        if let Some(stream) = &self.stream {
            stream.pause().expect("Failed to stop stream");
        }
    }
}
