//! Record storage and aggregation.
use super::{Record, RecordValue};
use log::warn;
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// Stores records and aggregates them.
///
/// Scalars are summarized by their minimum, maximum and mean; a key seen only
/// once is kept as is. For the other value types the most recent value is kept.
#[derive(Debug, Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &[f64]) -> RecordValue {
    RecordValue::Scalar(vs.iter().cloned().fold(f64::INFINITY, f64::min))
}

fn max(vs: &[f64]) -> RecordValue {
    RecordValue::Scalar(vs.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
}

fn mean(vs: &[f64]) -> RecordValue {
    RecordValue::Scalar(vs.iter().sum::<f64>() / vs.len() as f64)
}

impl RecordStorage {
    fn get_keys(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for record in self.data.iter() {
            for k in record.keys() {
                keys.insert(k.clone());
            }
        }
        keys
    }

    fn latest(&self, key: &str) -> Option<&RecordValue> {
        self.data.iter().rev().find_map(|record| record.get(key))
    }

    fn scalar(&self, key: &str) -> Record {
        let vs: Vec<f64> = self
            .data
            .iter()
            .filter_map(|record| match record.get(key) {
                Some(RecordValue::Scalar(v)) => Some(*v),
                Some(_) => {
                    warn!("Expect RecordValue::Scalar for {}", key);
                    None
                }
                None => None,
            })
            .collect();

        if vs.len() == 1 {
            Record::from_scalar(key, vs[0])
        } else {
            Record::from_slice(&[
                (format!("{}_min", key), min(&vs)),
                (format!("{}_max", key), max(&vs)),
                (format!("{}_mean", key), mean(&vs)),
            ])
        }
    }

    /// Creates an empty storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Aggregates the stored records and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut record = Record::empty();

        for key in self.get_keys().iter() {
            let r = match self.latest(key) {
                Some(RecordValue::Scalar(..)) => self.scalar(key),
                Some(value) => Record::from_slice(&[(key, value.clone())]),
                None => continue,
            };
            record.merge_inplace(r);
        }

        self.data.clear();

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate() {
        let mut storage = RecordStorage::new();
        for i in 0..4 {
            let mut record = Record::from_scalar("delta", i as f64);
            record.insert("stage", RecordValue::String(format!("sweep{}", i)));
            storage.store(record);
        }
        storage.store(Record::from_scalar("once", -1.0));

        let record = storage.aggregate();
        assert!(storage.is_empty());
        assert_eq!(record.get_scalar("delta_min").unwrap(), 0.0);
        assert_eq!(record.get_scalar("delta_max").unwrap(), 3.0);
        assert_eq!(record.get_scalar("delta_mean").unwrap(), 1.5);
        assert_eq!(record.get_scalar("once").unwrap(), -1.0);
        assert_eq!(record.get_string("stage").unwrap(), "sweep3");
    }
}
