//! Fire-and-forget persistence of note events.
//!
//! The engine's callers hand [`NoteRecord`]s to a [`NoteWriter`], which queues
//! them on a bounded channel drained by a single worker thread. Sink failures
//! are logged and never propagate; a full queue drops the record rather than
//! blocking, so persistence latency can never stall the generation cycle.

mod memory;

pub use memory::MemoryStore;

use std::error::Error;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Sender, TrySendError};
use serde::{Deserialize, Serialize};

/// One note event as handed to the persistence boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRecord {
    pub user_id: String,
    pub key: u8,
    pub velocity: f32,
    /// Milliseconds since the Unix epoch, as reported by the caller.
    pub timestamp_ms: i64,
}

/// Destination for note records. Implementations run on the writer's worker
/// thread and may block or fail; neither reaches the submitter.
pub trait NoteSink: Send {
    fn save(&mut self, record: NoteRecord) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Bounded work queue in front of a [`NoteSink`].
pub struct NoteWriter {
    sender: Option<Sender<NoteRecord>>,
    worker: Option<JoinHandle<()>>,
}

impl NoteWriter {
    /// Spawns the worker thread draining into `sink`. `capacity` bounds the
    /// queue; submissions beyond it are dropped with a warning.
    pub fn spawn<S: NoteSink + 'static>(mut sink: S, capacity: usize) -> Self {
        let (sender, receiver) = bounded::<NoteRecord>(capacity);
        let worker = thread::Builder::new()
            .name("note-writer".into())
            .spawn(move || {
                for record in receiver {
                    if let Err(e) = sink.save(record) {
                        log::warn!("failed to save note event: {e}");
                    }
                }
            })
            .expect("failed to spawn note writer thread");

        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Queues a record without blocking. Drops it (with a warning) if the
    /// queue is full or the worker is gone.
    pub fn submit(&self, record: NoteRecord) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => {
                log::warn!("note queue full; dropping event for key {}", record.key);
            }
            Err(TrySendError::Disconnected(record)) => {
                log::warn!("note writer stopped; dropping event for key {}", record.key);
            }
        }
    }

    /// Closes the queue and waits for the worker to finish flushing it.
    /// Also runs on drop.
    pub fn close(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("note writer thread panicked");
            }
        }
    }
}

impl Drop for NoteWriter {
    fn drop(&mut self) {
        self.close();
    }
}
