use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::config::{SynthConfig, BACKEND_NAME, OUTPUT_RING_CAPACITY};
use super::note::MAX_KEY;
use super::voice::Voice;
use crate::audio::output::{self, OutputBuffer, OutputTap};

/// Informational fields reported upward for every processed note-on, so the
/// request layer can answer without reaching back into the engine.
#[derive(Debug, Clone, Serialize)]
pub struct NoteOnInfo {
    pub backend: &'static str,
    pub key: u8,
    pub latency_ms: f64,
    pub active_voices: usize,
    pub sample_rate: u32,
    pub buffer_size: usize,
}

/// The real-time mixing engine.
///
/// Owns the map of active voices behind a single mutex, shared with one
/// dedicated generation thread. Each cycle the thread locks the map, advances
/// every voice for one buffer of samples, drops finished voices, soft-clips
/// the mix with `tanh`, and pushes it into the output ring; then it sleeps
/// for one buffer period. `note_on` / `note_off` / `active_voice_count`
/// interleave atomically with whole cycles.
pub struct SynthEngine {
    voices: Arc<Mutex<HashMap<u8, Voice>>>,
    running: Arc<AtomicBool>,
    generator: Option<JoinHandle<()>>,
    config: SynthConfig,
}

impl SynthEngine {
    /// Starts the engine with its generation thread. Returns the engine
    /// handle and the consumer half of the output ring, to be handed to an
    /// audio backend for playback.
    pub fn start(config: SynthConfig) -> (Self, OutputTap) {
        let (producer, tap) = output::ring(OUTPUT_RING_CAPACITY);

        let voices: Arc<Mutex<HashMap<u8, Voice>>> = Arc::new(Mutex::new(HashMap::new()));
        let running = Arc::new(AtomicBool::new(true));

        let thread_voices = Arc::clone(&voices);
        let thread_running = Arc::clone(&running);
        let thread_config = config.clone();
        let generator = thread::Builder::new()
            .name("synth-generator".into())
            .spawn(move || {
                generation_loop(thread_voices, thread_running, producer, thread_config);
            })
            .expect("failed to spawn generation thread");

        log::info!(
            "engine started: {} Hz, {}-sample cycles",
            config.sample_rate,
            config.buffer_size
        );

        (
            Self {
                voices,
                running,
                generator: Some(generator),
                config,
            },
            tap,
        )
    }

    /// Starts (or retriggers) a voice for `key`.
    ///
    /// An existing voice for the same key is discarded outright; there is no
    /// crossfade, so a retrigger is audibly discontinuous. Keys above
    /// [`MAX_KEY`] are ignored and return `None`.
    pub fn note_on(&self, key: u8) -> Option<NoteOnInfo> {
        if key > MAX_KEY {
            log::debug!("ignoring note-on for out-of-range key {key}");
            return None;
        }

        let started = Instant::now();
        let active_voices = {
            let mut voices = self.voices.lock().unwrap();
            voices.insert(key, Voice::new(key, &self.config));
            voices.len()
        };

        Some(NoteOnInfo {
            backend: BACKEND_NAME,
            key,
            latency_ms: started.elapsed().as_secs_f64() * 1000.0,
            active_voices,
            sample_rate: self.config.sample_rate,
            buffer_size: self.config.buffer_size,
        })
    }

    /// Requests a graceful release of the voice for `key`, if one is
    /// sounding. A missing key is a silent no-op.
    pub fn note_off(&self, key: u8) {
        let mut voices = self.voices.lock().unwrap();
        if let Some(voice) = voices.get_mut(&key) {
            voice.release();
        }
    }

    /// Number of voices currently in the active set, releasing ones included.
    pub fn active_voice_count(&self) -> usize {
        self.voices.lock().unwrap().len()
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Stops the generation thread and waits for it to finish. No samples
    /// are produced after this returns. Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(generator) = self.generator.take() {
            if generator.join().is_err() {
                log::error!("generation thread panicked");
            } else {
                log::info!("engine stopped");
            }
        }
    }
}

impl Drop for SynthEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One buffer of samples per iteration, holding the voice lock for the whole
/// cycle, then a fixed-period sleep. Never blocks on anything else: the ring
/// push is wait-free and persistence lives on its own worker thread.
fn generation_loop(
    voices: Arc<Mutex<HashMap<u8, Voice>>>,
    running: Arc<AtomicBool>,
    mut output: OutputBuffer,
    config: SynthConfig,
) {
    let period =
        Duration::from_micros(config.buffer_size as u64 * 1_000_000 / config.sample_rate as u64);

    while running.load(Ordering::Acquire) {
        {
            let mut voices = voices.lock().unwrap();
            for _ in 0..config.buffer_size {
                let mut mixed = 0.0_f32;
                for voice in voices.values_mut() {
                    mixed += voice.next_sample();
                }
                voices.retain(|_, voice| !voice.is_finished());

                output.push(mixed.tanh());
            }
        }
        thread::sleep(period);
    }
}
