use super::config::SynthConfig;
use super::envelope::EnvelopeGenerator;
use super::equalizer::Equalizer;
use super::note::key_to_frequency;
use super::prelude::TAU;
use super::reverb::Reverb;

/// One sounding note: a sine oscillator shaped by an ADSR envelope, fed
/// through the voice's own equalizer and reverb. Effect state is never
/// shared between voices.
pub struct Voice {
    pub key: u8,
    frequency: f32,
    phase: f32,
    amplitude: f32,
    sample_rate: f32,
    envelope: EnvelopeGenerator,
    equalizer: Equalizer,
    reverb: Reverb,
}

impl Voice {
    /// Creates a voice for `key`, starting its envelope in the attack stage.
    pub fn new(key: u8, config: &SynthConfig) -> Self {
        Self {
            key,
            frequency: key_to_frequency(key),
            phase: 0.0,
            amplitude: config.amplitude,
            sample_rate: config.sample_rate as f32,
            envelope: EnvelopeGenerator::new(
                config.attack,
                config.decay,
                config.sustain,
                config.release,
                config.sample_rate as f32,
            ),
            equalizer: Equalizer::new(
                config.eq_low_gain,
                config.eq_mid_gain,
                config.eq_high_gain,
            ),
            reverb: Reverb::new(
                config.sample_rate,
                config.reverb_delay_ms,
                config.reverb_feedback,
                config.reverb_wet,
            ),
        }
    }

    /// Generates the next sample and advances the voice by one sample period.
    ///
    /// The envelope is updated first; an idle voice produces silence without
    /// touching the oscillator or effects. Otherwise the enveloped sine
    /// sample runs through the equalizer and then the reverb.
    pub fn next_sample(&mut self) -> f32 {
        let envelope = self.envelope.next();
        if self.envelope.is_idle() {
            return 0.0;
        }

        let raw = (TAU * self.phase).sin() * self.amplitude * envelope;
        self.phase += self.frequency / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        let shaped = self.equalizer.process(raw);
        self.reverb.process(shaped)
    }

    /// Requests a graceful release. No-op if already releasing or finished.
    pub fn release(&mut self) {
        self.envelope.release();
    }

    /// True once the envelope has reached its terminal stage; the engine
    /// drops finished voices from the active set.
    pub fn is_finished(&self) -> bool {
        self.envelope.is_idle()
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> f32 {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a4_voice() -> Voice {
        Voice::new(69, &SynthConfig::default())
    }

    #[test]
    fn phase_increment_is_frequency_over_sample_rate() {
        let mut voice = a4_voice();
        assert_eq!(voice.phase(), 0.0);
        voice.next_sample();
        assert_eq!(voice.phase(), 440.0 / 44_100.0);
    }

    #[test]
    fn phase_wraps_and_stays_in_unit_range() {
        let mut voice = a4_voice();
        // 44100 / 440 is about 100.2 samples per period; 150 samples is
        // enough for at least one wraparound.
        let mut wrapped = false;
        let mut prev = voice.phase();
        for _ in 0..150 {
            voice.next_sample();
            let phase = voice.phase();
            assert!((0.0..1.0).contains(&phase), "phase {phase} out of range");
            if phase < prev {
                wrapped = true;
            }
            prev = phase;
        }
        assert!(wrapped, "phase never wrapped");
    }

    #[test]
    fn released_voice_finishes_within_release_time() {
        let mut voice = a4_voice();
        // Run through attack + decay into sustain.
        for _ in 0..(0.12 * 44_100.0) as usize {
            voice.next_sample();
        }
        assert!(!voice.is_finished());

        voice.release();
        for _ in 0..(0.3 * 44_100.0) as usize + 4 {
            voice.next_sample();
        }
        assert!(voice.is_finished());
        assert_eq!(voice.next_sample(), 0.0);
    }

    #[test]
    fn finished_voice_is_silent() {
        let mut voice = a4_voice();
        voice.release();
        for _ in 0..(0.35 * 44_100.0) as usize {
            voice.next_sample();
        }
        for _ in 0..100 {
            assert_eq!(voice.next_sample(), 0.0);
        }
    }

    #[test]
    fn sustained_voice_keeps_producing_bounded_output() {
        let mut voice = a4_voice();
        let mut peak = 0.0_f32;
        for _ in 0..44_100 {
            peak = peak.max(voice.next_sample().abs());
        }
        assert!(peak > 0.01, "sustained voice should be audible");
        // amplitude 0.5 plus the reverb wet tail stays well under 1.0
        assert!(peak < 1.0, "voice output {peak} unexpectedly hot");
    }
}
