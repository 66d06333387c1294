//! Real-time polyphonic synthesis engine for a 128-key piano.
//!
//! The [`synth::SynthEngine`] owns the set of sounding voices and runs a
//! dedicated generation thread that mixes them into a lock-free output ring.
//! Callers drive it with `note_on` / `note_off`; an audio backend drains the
//! ring for playback, and note events can be handed to a [`store::NoteWriter`]
//! without ever blocking the generation cycle.

pub mod audio;
pub mod store;
pub mod synth;
