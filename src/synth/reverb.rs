/// Single-tap delay reverb.
///
/// A fixed-length circular buffer holds the feedback path; each processed
/// sample reads the delayed value, mixes it in at the wet level, and writes
/// input + feedback back into the line. Buffer length is fixed at
/// construction: `sample_rate * delay_ms / 1000` samples, zero-initialized.
#[derive(Debug, Clone)]
pub struct Reverb {
    delay_buffer: Vec<f32>,
    write_pos: usize,
    feedback: f32,
    wet_level: f32,
}

impl Reverb {
    pub fn new(sample_rate: u32, delay_ms: u32, feedback: f32, wet_level: f32) -> Self {
        let delay_length = (sample_rate as usize * delay_ms as usize / 1000).max(1);
        Self {
            delay_buffer: vec![0.0; delay_length],
            write_pos: 0,
            feedback,
            wet_level,
        }
    }

    /// Delay length in samples.
    pub fn delay_samples(&self) -> usize {
        self.delay_buffer.len()
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.delay_buffer[self.write_pos];
        let output = input + delayed * self.wet_level;

        self.delay_buffer[self.write_pos] = input + delayed * self.feedback;
        self.write_pos = (self.write_pos + 1) % self.delay_buffer.len();

        output
    }
}
