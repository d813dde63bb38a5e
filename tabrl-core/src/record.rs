//! Records of training and solving metrics.
//!
//! Solvers report what happens during a run, such as the value change of a sweep
//! or the KL divergence of a trust-region step, as [`Record`]s: maps from string
//! keys to [`RecordValue`]s. Records are handed to a [`Recorder`], which decides
//! what to do with them.
//!
//! ```rust
//! use tabrl_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("delta", 0.25);
//! record.insert("sweep", RecordValue::Scalar(3.0));
//! assert_eq!(record.get_scalar("delta").unwrap(), 0.25);
//! ```
//!
//! * [`NullRecorder`] discards everything.
//! * [`BufferedRecorder`] keeps every record in memory.
//! * [`LogRecorder`] aggregates stored records with [`RecordStorage`] and writes the
//!   result to the log.
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
