use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use log::info;

/// Writes records with [`log::info!`].
///
/// Stored records are aggregated by [`RecordStorage`] when flushed.
#[derive(Default)]
pub struct LogRecorder {
    name: String,
    storage: RecordStorage,
}

impl LogRecorder {
    /// Constructs the recorder. `name` prefixes every line.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: RecordStorage::new(),
        }
    }

    fn format(record: &Record) -> String {
        let mut items = record
            .iter()
            .map(|(k, v)| match v {
                RecordValue::Scalar(x) => format!("{} = {:.6}", k, x),
                RecordValue::Array1(xs) => format!("{} = {:?}", k, xs),
                RecordValue::Array2(xs, shape) => format!("{} = {:?} {:?}", k, shape, xs),
                RecordValue::String(s) => format!("{} = {}", k, s),
            })
            .collect::<Vec<_>>();
        items.sort();
        items.join(", ")
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        if !record.is_empty() {
            info!("[{}] {}", self.name, Self::format(&record));
        }
    }
}

impl AggregateRecorder for LogRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        let record = self.storage.aggregate();
        if !record.is_empty() {
            info!("[{}] step {}: {}", self.name, step, Self::format(&record));
        }
    }
}
