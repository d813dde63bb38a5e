use super::{AggregateRecorder, Record, Recorder};

/// Buffered recorder.
///
/// Keeps every written or stored record in memory, in arrival order.
#[derive(Debug, Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    n_flushes: usize,
}

impl BufferedRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no record has been kept.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of calls to [`AggregateRecorder::flush`].
    pub fn n_flushes(&self) -> usize {
        self.n_flushes
    }

    /// Values of the scalar `key`, in the order of the records containing it.
    pub fn scalars(&self, key: &str) -> Vec<f64> {
        self.buf
            .iter()
            .filter_map(|r| r.get_scalar(key).ok())
            .collect()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}

impl AggregateRecorder for BufferedRecorder {
    fn store(&mut self, record: Record) {
        self.buf.push(record);
    }

    fn flush(&mut self, _step: i64) {
        self.n_flushes += 1;
    }
}
