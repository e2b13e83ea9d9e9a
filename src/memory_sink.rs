use crate::level::Level;
use crate::record::Record;
use crate::sink::{LogSink, SinkError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Sink that keeps every admitted record in memory.
///
/// Clones share the same buffer, so a test can hand one clone to a
/// factory and inspect the other.
#[derive(Clone, Debug)]
pub struct MemorySink {
    min_level: Level,
    records: Arc<Mutex<Vec<Record>>>,
}

impl MemorySink {
    pub fn new(min_level: Level) -> Self {
        MemorySink {
            min_level,
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of the records collected so far.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Messages of the collected records, in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }
}

impl LogSink for MemorySink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn emit(&self, record: &Record) -> Result<(), SinkError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
