use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pianosynth::audio::{AudioBackend, CpalBackend};
use pianosynth::store::{MemoryStore, NoteRecord, NoteWriter};
use pianosynth::synth::{SynthConfig, SynthEngine};

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .expect("Failed to init logger");

    // Engine plus playback drain of its output ring.
    let (mut engine, tap) = SynthEngine::start(SynthConfig::default());
    let mut audio_backend = CpalBackend::new(tap);
    audio_backend.start();

    // Persistence runs on its own worker, decoupled from the engine.
    let store = MemoryStore::new();
    let mut writer = NoteWriter::spawn(store.clone(), 1024);

    // Play a C-major chord.
    let chord = [60_u8, 64, 67];
    for &key in &chord {
        if let Some(info) = engine.note_on(key) {
            writer.submit(NoteRecord {
                user_id: "demo".into(),
                key,
                velocity: 0.8,
                timestamp_ms: unix_millis(),
            });
            match serde_json::to_string(&info) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("failed to encode report: {e}"),
            }
        }
    }

    std::thread::sleep(Duration::from_secs(1));

    for &key in &chord {
        engine.note_off(key);
    }
    // Let the releases ring out.
    std::thread::sleep(Duration::from_millis(600));

    writer.close();
    log::info!("stored {} note events", store.recent("demo", 16).len());

    engine.shutdown();
    audio_backend.stop();
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
