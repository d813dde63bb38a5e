use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
pub trait Recorder {
    /// Writes a record.
    fn write(&mut self, record: Record);
}

/// A [`Recorder`] that can keep records and write them out later.
pub trait AggregateRecorder: Recorder {
    /// Stores the record.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records.
    ///
    /// `step` is the index of the optimization step or sweep at the time of flushing.
    fn flush(&mut self, step: i64);
}
