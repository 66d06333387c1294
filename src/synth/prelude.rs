// Shared float constants for the DSP modules.

pub use core::f32::consts::{FRAC_1_SQRT_2, PI, TAU};
