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

use super::Distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    node: usize,
    dist: Distance,
}

#[inline]
fn parent(slot: usize) -> usize {
    (slot - 1) / 2
}

#[inline]
fn first_child(slot: usize) -> usize {
    2 * slot + 1
}

/// Binary min-heap over a fixed set of nodes `0..n` whose keys can only go
/// down.
///
/// Every node always owns exactly one heap slot; nodes that were never
/// decreased, and nodes already extracted, sit in the heap with the
/// `infinity` key. `position[node]` is the slot of `node`, which makes
/// [`IndexedMinHeap::decrease`] `O(log n)` without searching.
#[derive(Debug, Clone)]
pub struct IndexedMinHeap {
    entries: Vec<Entry>,
    position: Vec<usize>,
    infinity: Distance,
}

impl IndexedMinHeap {
    /// A heap over nodes `0..nodes`, every key set to `infinity`.
    pub fn new(nodes: usize, infinity: Distance) -> Self {
        let mut heap = IndexedMinHeap {
            entries: Vec::with_capacity(nodes),
            position: Vec::with_capacity(nodes),
            infinity,
        };
        heap.resize(nodes);
        heap
    }

    /// Number of node slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn infinity(&self) -> Distance {
        self.infinity
    }

    /// Puts every node back at `infinity` in slot order, without touching
    /// the allocation.
    pub fn reset(&mut self) {
        for (slot, entry) in self.entries.iter_mut().enumerate() {
            *entry = Entry {
                node: slot,
                dist: self.infinity,
            };
        }
        for (node, pos) in self.position.iter_mut().enumerate() {
            *pos = node;
        }
    }

    /// Changes the number of node slots and resets the heap. Storage is
    /// kept when shrinking.
    pub fn resize(&mut self, nodes: usize) {
        let infinity = self.infinity;
        self.entries.resize(
            nodes,
            Entry {
                node: 0,
                dist: infinity,
            },
        );
        self.position.resize(nodes, 0);
        self.reset();
    }

    /// Current key of `node`.
    pub fn key(&self, node: usize) -> Distance {
        self.entries[self.position[node]].dist
    }

    /// The node with the smallest finite key, without removing it.
    pub fn peek(&self) -> Option<(usize, Distance)> {
        self.entries
            .first()
            .filter(|entry| entry.dist < self.infinity)
            .map(|entry| (entry.node, entry.dist))
    }

    /// Lowers the key of `node` to `dist`.
    ///
    /// # Panics
    ///
    /// If `dist` is not strictly smaller than the current key.
    pub fn decrease(&mut self, node: usize, dist: Distance) {
        let slot = self.position[node];
        assert!(
            dist < self.entries[slot].dist,
            "key of node {} can only decrease: {} is not below {}",
            node,
            dist,
            self.entries[slot].dist
        );
        self.entries[slot].dist = dist;
        self.sift_up(slot);
    }

    /// Removes the node with the smallest key and returns it with its key.
    ///
    /// Returns `None` once every remaining key is `infinity`. The extracted
    /// node is parked in the last slot with key `infinity`.
    pub fn extract_min(&mut self) -> Option<(usize, Distance)> {
        let first = *self.entries.first()?;
        if first.dist >= self.infinity {
            return None;
        }

        let last = self.entries.len() - 1;
        self.entries[0] = self.entries[last];
        self.position[self.entries[0].node] = 0;
        self.entries[last] = Entry {
            node: first.node,
            dist: self.infinity,
        };
        self.position[first.node] = last;
        self.sift_down(0);

        Some((first.node, first.dist))
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.position[self.entries[a].node] = a;
        self.position[self.entries[b].node] = b;
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let up = parent(slot);
            if self.entries[up].dist <= self.entries[slot].dist {
                break;
            }
            self.swap(up, slot);
            slot = up;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let mut child = first_child(slot);
            if child >= len {
                break;
            }
            if child + 1 < len && self.entries[child + 1].dist < self.entries[child].dist {
                child += 1;
            }
            if self.entries[slot].dist <= self.entries[child].dist {
                break;
            }
            self.swap(slot, child);
            slot = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IndexedMinHeap;
    use priority_queue::PriorityQueue;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;
    use std::cmp::Reverse;

    const INF: i32 = 1_000;

    #[test]
    fn test_extract_in_key_order() {
        let mut heap = IndexedMinHeap::new(5, INF);
        heap.decrease(3, 7);
        heap.decrease(1, 2);
        heap.decrease(4, 9);
        heap.decrease(4, 1);
        assert_eq!(heap.peek(), Some((4, 1)));
        assert_eq!(heap.extract_min(), Some((4, 1)));
        assert_eq!(heap.extract_min(), Some((1, 2)));
        assert_eq!(heap.extract_min(), Some((3, 7)));
        assert_eq!(heap.extract_min(), None);
        assert_eq!(heap.peek(), None);
    }

    #[test]
    fn test_extracted_node_parked_at_infinity() {
        let mut heap = IndexedMinHeap::new(3, INF);
        heap.decrease(0, 4);
        heap.decrease(2, 6);
        assert_eq!(heap.extract_min(), Some((0, 4)));
        assert_eq!(heap.key(0), INF);
        // positions stay valid for every node
        for node in 0..3 {
            let key = heap.key(node);
            assert!(key == INF || key == 6);
        }
        heap.decrease(1, 5);
        assert_eq!(heap.extract_min(), Some((1, 5)));
        assert_eq!(heap.extract_min(), Some((2, 6)));
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn test_reset_and_resize() {
        let mut heap = IndexedMinHeap::new(4, INF);
        heap.decrease(2, 1);
        heap.reset();
        assert_eq!(heap.key(2), INF);
        assert_eq!(heap.extract_min(), None);

        heap.resize(1);
        heap.decrease(0, 3);
        assert_eq!(heap.extract_min(), Some((0, 3)));
        assert_eq!(heap.extract_min(), None);

        heap.resize(0);
        assert!(heap.is_empty());
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    #[should_panic(expected = "can only decrease")]
    fn test_increase_is_rejected() {
        let mut heap = IndexedMinHeap::new(2, INF);
        heap.decrease(1, 5);
        heap.decrease(1, 5);
    }

    #[test]
    fn test_matches_priority_queue_crate() {
        let mut rng = Pcg64::seed_from_u64(17);
        let n = 200;
        let mut heap = IndexedMinHeap::new(n, INF);
        let mut reference: PriorityQueue<usize, Reverse<i32>> = PriorityQueue::new();
        let mut keys = vec![INF; n];
        for _ in 0..2_000 {
            let node = rng.gen_range(0..n);
            let dist = rng.gen_range(0..INF);
            if dist < keys[node] {
                keys[node] = dist;
                heap.decrease(node, dist);
                reference.push(node, Reverse(dist));
            }
        }
        while let Some((_, Reverse(expected))) = reference.pop() {
            let (node, dist) = heap.extract_min().unwrap();
            assert_eq!(dist, expected);
            assert_eq!(keys[node], dist);
        }
        assert_eq!(heap.extract_min(), None);
    }
}
