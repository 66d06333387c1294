pub mod config;
pub mod engine;
pub mod envelope;
pub mod equalizer;
pub mod note;
pub mod prelude;
pub mod reverb;
pub mod voice;

pub use config::SynthConfig;
pub use engine::{NoteOnInfo, SynthEngine};
