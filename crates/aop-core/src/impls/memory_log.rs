//! MemoryDeliveryLog - keeps delivery entries for inspection in tests.

use std::sync::Mutex;

use crate::ports::{DeliveryLog, LogEntry};

#[derive(Default)]
pub struct MemoryDeliveryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryDeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Entries carrying the given tag ("data_to_send", "error", "response").
    pub fn tagged(&self, tag: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.tag() == tag)
            .collect()
    }
}

impl DeliveryLog for MemoryDeliveryLog {
    fn record(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}
