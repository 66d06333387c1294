/// Toy 3-band equalizer: a fixed-coefficient one-pole low-pass splits the
/// signal, the remainder is treated as the high band, and each band gets its
/// own gain. Not a real crossover; the coefficients are part of the contract.
#[derive(Debug, Clone)]
pub struct Equalizer {
    low_gain: f32,
    mid_gain: f32,
    high_gain: f32,
    low_pass_prev: f32,
}

impl Equalizer {
    pub fn new(low_gain: f32, mid_gain: f32, high_gain: f32) -> Self {
        Self {
            low_gain,
            mid_gain,
            high_gain,
            low_pass_prev: 0.0,
        }
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let low_pass = input * 0.3 + self.low_pass_prev * 0.7;
        self.low_pass_prev = low_pass;

        let high_pass = input - low_pass;

        low_pass * self.low_gain
            + (input - low_pass - high_pass) * self.mid_gain
            + high_pass * self.high_gain
    }
}

impl Default for Equalizer {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}
