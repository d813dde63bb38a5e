//! Simple replay buffer.
use super::SimpleReplayBufferConfig;
use crate::{ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use rand::Rng;
use std::collections::VecDeque;

/// A replay buffer with a fixed capacity.
///
/// When full, pushing an item evicts the oldest one. Batches are sampled uniformly
/// with replacement.
#[derive(Debug, Clone)]
pub struct SimpleReplayBuffer<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> SimpleReplayBuffer<T> {
    /// The maximum number of items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the items from the oldest to the most recent.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> ExperienceBufferBase for SimpleReplayBuffer<T> {
    type Item = T;

    fn push(&mut self, tr: T) -> Result<()> {
        if self.capacity == 0 {
            return Ok(());
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(tr);
        Ok(())
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T: Clone> ReplayBufferBase for SimpleReplayBuffer<T> {
    type Config = SimpleReplayBufferConfig;
    type Batch = Vec<T>;

    fn build(config: &Self::Config) -> Self {
        Self {
            capacity: config.capacity,
            items: VecDeque::with_capacity(config.capacity.min(1 << 16)),
        }
    }

    /// Samples `size` items uniformly with replacement.
    ///
    /// `size` is clamped to the number of stored items, so an empty buffer
    /// yields an empty batch.
    fn batch<R: Rng>(&mut self, size: usize, rng: &mut R) -> Result<Vec<T>> {
        let n = self.items.len();
        let size = size.min(n);
        Ok((0..size)
            .map(|_| self.items[rng.gen_range(0..n)].clone())
            .collect())
    }
}
