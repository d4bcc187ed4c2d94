// Licensed under the Apache License, Version 2.0 (the "License"); you may
// not use this file except in compliance with the License. You may obtain
// a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations
// under the License.

//! Maps an ordered node pair `(u, v)` to the storage slot of arc `u -> v`.

use std::hash::BuildHasher;

use ahash::RandomState;

const MIN_BUCKETS: usize = 16;
const INITIAL_BUCKET_CAPACITY: usize = 4;

/// Hash index from ordered node pairs to arc slots.
///
/// The pair is packed into one integer key, `u * node_count + v`, and the
/// key is hashed into a bucket table whose size is fixed at construction.
/// A bucket that fills up doubles on its own; the table is never rehashed.
#[derive(Debug, Clone)]
pub struct ArcLocator {
    node_count: u64,
    buckets: Vec<Vec<(u64, usize)>>,
    hasher: RandomState,
    len: usize,
}

impl ArcLocator {
    /// Creates a locator for pairs of nodes in `[0, node_count)`, sized for
    /// about `expected_arcs` entries.
    pub fn new(node_count: usize, expected_arcs: usize) -> Self {
        let bucket_count = expected_arcs.max(MIN_BUCKETS).next_power_of_two();
        ArcLocator {
            node_count: node_count as u64,
            buckets: vec![Vec::new(); bucket_count],
            hasher: RandomState::new(),
            len: 0,
        }
    }

    #[inline]
    fn key(&self, u: usize, v: usize) -> u64 {
        debug_assert!((u as u64) < self.node_count && (v as u64) < self.node_count);
        u as u64 * self.node_count + v as u64
    }

    #[inline]
    fn bucket_of(&self, key: u64) -> usize {
        // bucket count is a power of two
        (BuildHasher::hash_one(&self.hasher, key) as usize) & (self.buckets.len() - 1)
    }

    /// Associates `(u, v)` with `slot`, replacing any previous slot.
    pub fn set(&mut self, u: usize, v: usize, slot: usize) {
        let key = self.key(u, v);
        let pos = self.bucket_of(key);
        let bucket = &mut self.buckets[pos];
        if let Some(entry) = bucket.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = slot;
            return;
        }
        if bucket.len() == bucket.capacity() {
            let grown = (bucket.capacity() * 2).max(INITIAL_BUCKET_CAPACITY);
            bucket.reserve_exact(grown - bucket.len());
        }
        bucket.push((key, slot));
        self.len += 1;
    }

    /// Slot of arc `u -> v`, or `None` if the pair was never set.
    #[inline]
    pub fn get(&self, u: usize, v: usize) -> Option<usize> {
        let key = self.key(u, v);
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, slot)| slot)
    }

    pub fn contains(&self, u: usize, v: usize) -> bool {
        self.get(u, v).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forgets every pair while keeping the bucket allocations.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
        self.len = 0;
    }
}
