/// Highest valid key number on the 128-key keyboard.
pub const MAX_KEY: u8 = 127;

/// Convert a key number to its equal-tempered frequency, A4 (key 69) = 440 Hz.
pub fn key_to_frequency(key: u8) -> f32 {
    440.0 * 2.0_f32.powf((key as f32 - 69.0) / 12.0)
}
