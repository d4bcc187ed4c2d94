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

//! Shortest paths on a weighted digraph with non-negative integer weights.
//!
//! [`ShortestPathsFinder`] holds one graph at a time. It answers
//! single-source queries with Dijkstra's algorithm, driven by the
//! decrease-only [`IndexedMinHeap`], and all-pairs queries with
//! Floyd-Warshall. The graph can be replaced, or single arcs edited, between
//! queries without giving up the allocated storage.

mod finder;
mod floyd_warshall;
mod heap;

pub use finder::ShortestPathsFinder;
pub use heap::IndexedMinHeap;

/// Path length type.
pub type Distance = i32;

/// Distance of unreachable nodes and weight of muted arcs.
///
/// Small enough that adding two of them does not overflow a [`Distance`].
pub const INFINITY: Distance = Distance::MAX / 2 - 1;

/// A weighted arc, input of [`ShortestPathsFinder::update_digraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arc {
    pub tail: usize,
    pub head: usize,
    pub weight: Distance,
}

impl Arc {
    pub fn new(tail: usize, head: usize, weight: Distance) -> Self {
        Arc { tail, head, weight }
    }
}

/// Stored form of an arc inside the engine's adjacency array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Neighbor {
    pub head: usize,
    pub weight: Distance,
}
