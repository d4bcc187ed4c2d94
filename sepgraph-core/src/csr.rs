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

//! Compact adjacency storage shared by the flow and shortest path engines.
//!
//! A [`Csr`] keeps one flat array with every arc of the graph, grouped by
//! tail, plus an offset array so that the outgoing arcs of node `u` live in
//! `arcs[start[u]..start[u + 1]]`. The payload type `A` is chosen by the
//! engine: the flow engine stores residual capacities and twin pointers, the
//! shortest path engine stores heads and weights.

use std::ops::Range;

/// How backing storage grows when a rebuilt graph no longer fits.
///
/// Below `threshold` elements the capacity grows by `small_factor`, at or
/// above it by `large_factor`. Storage never shrinks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthPolicy {
    pub threshold: usize,
    pub small_factor: f64,
    pub large_factor: f64,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        GrowthPolicy {
            threshold: 1000,
            small_factor: 1.5,
            large_factor: 1.1,
        }
    }
}

impl GrowthPolicy {
    /// Capacity to allocate when at least `required` elements must fit.
    pub fn grow(&self, required: usize) -> usize {
        let factor = if required < self.threshold {
            self.small_factor
        } else {
            self.large_factor
        };
        let grown = (required as f64 * factor.max(1.0)) as usize;
        grown.max(required)
    }

    /// Makes sure `vec` can hold `required` elements, reallocating only when
    /// its current capacity is too small. Existing contents are preserved.
    pub fn reserve<T>(&self, vec: &mut Vec<T>, required: usize) {
        if vec.capacity() < required {
            let target = self.grow(required);
            vec.reserve_exact(target - vec.len());
        }
    }
}

#[derive(Debug, Clone)]
pub struct Csr<A> {
    start: Vec<usize>,
    arcs: Vec<A>,
}

impl<A> Default for Csr<A> {
    fn default() -> Self {
        Csr {
            start: vec![0],
            arcs: Vec::new(),
        }
    }
}

impl<A> Csr<A> {
    /// An empty graph with no nodes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.start.len() - 1
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Storage slots of the arcs leaving `u`.
    #[inline]
    pub fn arc_range(&self, u: usize) -> Range<usize> {
        self.start[u]..self.start[u + 1]
    }

    #[inline]
    pub fn out_arcs(&self, u: usize) -> &[A] {
        &self.arcs[self.arc_range(u)]
    }

    #[inline]
    pub fn out_arcs_mut(&mut self, u: usize) -> &mut [A] {
        let range = self.arc_range(u);
        &mut self.arcs[range]
    }

    #[inline]
    pub fn arc(&self, slot: usize) -> &A {
        &self.arcs[slot]
    }

    #[inline]
    pub fn arc_mut(&mut self, slot: usize) -> &mut A {
        &mut self.arcs[slot]
    }

    pub fn arcs(&self) -> &[A] {
        &self.arcs
    }

    pub fn offsets(&self) -> &[usize] {
        &self.start
    }

    /// Number of nodes and arcs the current allocation holds without
    /// reallocating.
    pub fn capacity(&self) -> (usize, usize) {
        (self.start.capacity().saturating_sub(1), self.arcs.capacity())
    }

    /// Groups `(tail, payload)` pairs by tail with a counting sort.
    ///
    /// Arcs keep their relative input order inside each bucket. The second
    /// element of the result holds, for every input arc, the slot it was
    /// stored in.
    pub fn bucket_by_tail(node_count: usize, arcs: Vec<(usize, A)>) -> (Self, Vec<usize>) {
        let mut start = vec![0usize; node_count + 1];
        for &(tail, _) in &arcs {
            start[tail + 1] += 1;
        }
        for u in 0..node_count {
            start[u + 1] += start[u];
        }

        let mut next = start.clone();
        let mut slot_of = Vec::with_capacity(arcs.len());
        let mut placed: Vec<Option<A>> = Vec::with_capacity(arcs.len());
        placed.resize_with(arcs.len(), || None);
        for (tail, payload) in arcs {
            let slot = next[tail];
            next[tail] += 1;
            placed[slot] = Some(payload);
            slot_of.push(slot);
        }

        let arcs = placed.into_iter().flatten().collect();
        (Csr { start, arcs }, slot_of)
    }

    /// Replaces the graph with `arcs`, which must be sorted by tail.
    ///
    /// Offsets and arcs are written into the existing allocations; they only
    /// grow, following `policy`, when the new graph does not fit.
    pub fn rebuild_sorted<I>(&mut self, node_count: usize, arcs: I, policy: &GrowthPolicy)
    where
        I: ExactSizeIterator<Item = (usize, A)>,
    {
        self.start.clear();
        self.arcs.clear();
        policy.reserve(&mut self.start, node_count + 1);
        policy.reserve(&mut self.arcs, arcs.len());

        self.start.push(0);
        for (tail, payload) in arcs {
            debug_assert!(tail + 1 >= self.start.len(), "arcs not sorted by tail");
            while self.start.len() <= tail {
                self.start.push(self.arcs.len());
            }
            self.arcs.push(payload);
        }
        while self.start.len() <= node_count {
            self.start.push(self.arcs.len());
        }
    }

    /// Replaces the graph with prebuilt offsets and payloads.
    ///
    /// The caller guarantees `start` is a valid offset array for `arcs`.
    pub fn rebuild_from_parts<I>(&mut self, start: &[usize], arcs: I, policy: &GrowthPolicy)
    where
        I: ExactSizeIterator<Item = A>,
    {
        self.start.clear();
        self.arcs.clear();
        policy.reserve(&mut self.start, start.len());
        policy.reserve(&mut self.arcs, arcs.len());
        self.start.extend_from_slice(start);
        self.arcs.extend(arcs);
    }
}

#[cfg(test)]
mod tests {
    use super::{Csr, GrowthPolicy};

    #[test]
    fn test_bucket_by_tail_keeps_input_order() {
        let arcs = vec![(2, 'a'), (0, 'b'), (2, 'c'), (1, 'd'), (0, 'e')];
        let (csr, slots) = Csr::bucket_by_tail(3, arcs);
        assert_eq!(csr.offsets(), &[0, 2, 3, 5]);
        assert_eq!(csr.out_arcs(0), &['b', 'e']);
        assert_eq!(csr.out_arcs(1), &['d']);
        assert_eq!(csr.out_arcs(2), &['a', 'c']);
        assert_eq!(slots, vec![3, 0, 4, 2, 1]);
    }

    #[test]
    fn test_rebuild_sorted_with_isolated_nodes() {
        let mut csr = Csr::new();
        let arcs = vec![(1, 10), (1, 11), (3, 12)];
        csr.rebuild_sorted(5, arcs.into_iter(), &GrowthPolicy::default());
        assert_eq!(csr.node_count(), 5);
        assert_eq!(csr.arc_count(), 3);
        assert_eq!(csr.offsets(), &[0, 0, 2, 2, 3, 3]);
        assert!(csr.out_arcs(0).is_empty());
        assert_eq!(csr.out_arcs(1), &[10, 11]);
        assert!(csr.out_arcs(4).is_empty());
    }

    #[test]
    fn test_rebuild_reuses_storage() {
        let policy = GrowthPolicy::default();
        let mut csr = Csr::new();
        csr.rebuild_sorted(10, (0..10).map(|u| (u, u)), &policy);
        let (nodes, arcs) = csr.capacity();
        assert!(nodes >= 15);
        assert!(arcs >= 15);

        csr.rebuild_sorted(4, (0..4).map(|u| (u, u * 2)), &policy);
        assert_eq!(csr.capacity(), (nodes, arcs));
        assert_eq!(csr.out_arcs(3), &[6]);
    }

    #[test]
    fn test_growth_policy_factors() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.grow(100), 150);
        assert_eq!(policy.grow(2000), 2200);
        assert_eq!(policy.grow(0), 0);
        let flat = GrowthPolicy {
            threshold: 10,
            small_factor: 0.5,
            large_factor: 1.0,
        };
        assert_eq!(flat.grow(7), 7);
        assert_eq!(flat.grow(70), 70);
    }
}
