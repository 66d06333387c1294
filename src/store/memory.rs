use std::sync::{Arc, Mutex};

use super::{NoteRecord, NoteSink};

/// In-memory note store. Clones share the same backing storage, so one clone
/// can sit behind a [`super::NoteWriter`] while another answers queries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<NoteRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent records for `user_id`, newest first.
    pub fn recent(&self, user_id: &str, limit: usize) -> Vec<NoteRecord> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NoteSink for MemoryStore {
    fn save(&mut self, record: NoteRecord) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}
