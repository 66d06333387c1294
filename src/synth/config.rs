/// Engine-wide sample rate in Hz. Fixed; not per-voice.
pub const SAMPLE_RATE: u32 = 44_100;
/// Samples produced per generation cycle.
pub const BUFFER_SIZE: usize = 256;
/// Capacity of the output ring, in samples (one second of audio).
pub const OUTPUT_RING_CAPACITY: usize = SAMPLE_RATE as usize;
/// Identifier reported upward with every processed note-on.
pub const BACKEND_NAME: &str = "realtime-dsp";

/// Configuration parameters for the engine and the voices it creates.
/// Covers envelope timing, oscillator level, and per-voice effect settings.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub sample_rate: u32,
    pub buffer_size: usize,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    /// Base oscillator amplitude before the envelope is applied.
    pub amplitude: f32,
    pub reverb_delay_ms: u32,
    pub reverb_feedback: f32,
    pub reverb_wet: f32,
    pub eq_low_gain: f32,
    pub eq_mid_gain: f32,
    pub eq_high_gain: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            buffer_size: BUFFER_SIZE,
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
            amplitude: 0.5,
            reverb_delay_ms: 50,
            reverb_feedback: 0.5,
            reverb_wet: 0.3,
            eq_low_gain: 1.0,
            eq_mid_gain: 1.0,
            eq_high_gain: 1.0,
        }
    }
}
