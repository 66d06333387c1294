/// ADSR stages. `Idle` is terminal: the voice is silent and removable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Attack,
    Decay,
    Sustain,
    Release,
    Idle,
}

/// Linear ADSR envelope generator, advanced one sample per call.
///
/// Time within a stage is counted in samples from the most recent stage
/// entry; every transition resets that counter. A freshly constructed
/// generator starts in `Attack` at level 0.
#[derive(Debug, Clone)]
pub struct EnvelopeGenerator {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    stage: Stage,
    level: f32,
    /// Level held at the moment release was requested; the release ramp
    /// falls linearly from here to 0.
    release_from: f32,
    stage_elapsed: u64,
    sample_rate: f32,
}

impl EnvelopeGenerator {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32, sample_rate: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
            stage: Stage::Attack,
            level: 0.0,
            release_from: sustain,
            stage_elapsed: 0,
            sample_rate,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_idle(&self) -> bool {
        self.stage == Stage::Idle
    }

    /// Begin the release ramp from the current level.
    /// No-op if already releasing or idle.
    pub fn release(&mut self) {
        if self.stage != Stage::Release && self.stage != Stage::Idle {
            self.release_from = self.level;
            self.enter(Stage::Release);
        }
    }

    /// Evaluate the envelope for the current sample and advance one sample
    /// period. Stage transitions fire when the elapsed time in the stage
    /// reaches the stage duration.
    pub fn next(&mut self) -> f32 {
        let elapsed = self.stage_elapsed as f32 / self.sample_rate;
        match self.stage {
            Stage::Attack => {
                self.level = (elapsed / self.attack).min(1.0);
                if elapsed >= self.attack {
                    self.level = 1.0;
                    self.enter(Stage::Decay);
                }
            }
            Stage::Decay => {
                let progress = (elapsed / self.decay).min(1.0);
                self.level = 1.0 - (1.0 - self.sustain) * progress;
                if elapsed >= self.decay {
                    self.level = self.sustain;
                    self.enter(Stage::Sustain);
                }
            }
            Stage::Sustain => {
                self.level = self.sustain;
            }
            Stage::Release => {
                let progress = (elapsed / self.release).min(1.0);
                self.level = self.release_from * (1.0 - progress);
                if elapsed >= self.release {
                    self.level = 0.0;
                    self.enter(Stage::Idle);
                }
            }
            Stage::Idle => {
                self.level = 0.0;
            }
        }
        self.stage_elapsed += 1;
        self.level
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.stage_elapsed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44_100.0;

    fn default_env() -> EnvelopeGenerator {
        EnvelopeGenerator::new(0.01, 0.1, 0.7, 0.3, SR)
    }

    fn run(env: &mut EnvelopeGenerator, samples: usize) -> f32 {
        let mut last = env.level();
        for _ in 0..samples {
            last = env.next();
        }
        last
    }

    #[test]
    fn starts_at_zero_in_attack() {
        let mut env = default_env();
        assert_eq!(env.stage(), Stage::Attack);
        assert_eq!(env.next(), 0.0);
    }

    #[test]
    fn reaches_peak_at_attack_boundary() {
        let mut env = default_env();
        let mut peak = 0.0_f32;
        let mut steps = 0;
        while env.stage() == Stage::Attack && steps < 1000 {
            peak = peak.max(env.next());
            steps += 1;
        }
        assert_eq!(env.stage(), Stage::Decay);
        assert_eq!(peak, 1.0, "attack should peak at exactly 1.0");
        // 0.01 s of attack is 441 samples; the boundary sample transitions.
        assert!((441..=443).contains(&steps), "attack took {steps} samples");
    }

    #[test]
    fn decays_to_sustain_and_holds() {
        let mut env = default_env();
        let through_decay = ((0.01 + 0.1) * SR) as usize + 2;
        let level = run(&mut env, through_decay);
        assert!((level - 0.7).abs() < 1e-6, "sustain should be 0.7, got {level}");
        assert_eq!(env.stage(), Stage::Sustain);

        // Holds indefinitely without a release request.
        let later = run(&mut env, 44_100);
        assert!((later - 0.7).abs() < 1e-6);
        assert_eq!(env.stage(), Stage::Sustain);
    }

    #[test]
    fn release_ramps_strictly_down_to_zero() {
        let mut env = default_env();
        run(&mut env, ((0.01 + 0.1) * SR) as usize + 2);
        env.release();
        assert_eq!(env.stage(), Stage::Release);

        // The release moment itself still holds the sustained level.
        let mut prev = env.next();
        assert!((prev - 0.7).abs() < 1e-6);

        let release_samples = (0.3 * SR) as usize;
        for _ in 0..release_samples {
            let level = env.next();
            assert!(
                level < prev || level == 0.0,
                "release should strictly decrease, {level} after {prev}"
            );
            prev = level;
        }
        // At or just past the release duration the envelope is silent.
        assert_eq!(env.level(), 0.0);
        assert!(env.is_idle());
    }

    #[test]
    fn release_from_mid_attack_starts_at_held_level() {
        let mut env = default_env();
        // Halfway through the attack the level is around 0.5.
        run(&mut env, (0.005 * SR) as usize);
        let held = env.level();
        assert!(held > 0.1 && held < 0.9);

        env.release();
        let next = env.next();
        assert!(
            next <= held + 1e-6,
            "release must not jump above the held level: {next} > {held}"
        );
    }

    #[test]
    fn release_is_noop_when_already_releasing_or_idle() {
        let mut env = default_env();
        run(&mut env, ((0.01 + 0.1) * SR) as usize + 2);
        env.release();
        let mid_release = run(&mut env, (0.1 * SR) as usize);

        // A second request must not restart the ramp.
        env.release();
        let after = env.next();
        assert!(after <= mid_release);

        // And once idle, stays idle.
        run(&mut env, (0.3 * SR) as usize + 4);
        assert!(env.is_idle());
        env.release();
        assert!(env.is_idle());
        assert_eq!(env.next(), 0.0);
    }
}
