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

use hashbrown::HashMap;
use log::debug;

use super::floyd_warshall::AllPairs;
use super::heap::IndexedMinHeap;
use super::{Arc, Distance, Neighbor, INFINITY};
use crate::csr::{Csr, GrowthPolicy};
use crate::err::{Error, Result};

/// Single-source and all-pairs shortest paths over a replaceable digraph.
///
/// The graph is loaded with [`update_digraph`](Self::update_digraph) or
/// [`update_graph`](Self::update_graph) and can be loaded again any number
/// of times; node and arc storage only ever grows, following the
/// [`GrowthPolicy`]. Each neighbour list is kept sorted by head so that a
/// single arc can be found, reweighted or muted in `O(log deg)`.
///
/// # Example
/// ```rust
/// use sepgraph_core::shortest_path::{Arc, ShortestPathsFinder, INFINITY};
///
/// let mut spf = ShortestPathsFinder::new();
/// spf.update_digraph(
///     4,
///     &[Arc::new(0, 1, 2), Arc::new(1, 3, 2), Arc::new(0, 2, 1), Arc::new(2, 3, 5)],
/// )
/// .unwrap();
/// spf.find(0).unwrap();
/// assert_eq!(spf.dist(3), 4);
/// assert_eq!(spf.path(3), vec![0, 1, 3]);
///
/// spf.temp_remove_arc(1, 3).unwrap();
/// spf.find(0).unwrap();
/// assert_eq!(spf.path(3), vec![0, 2, 3]);
///
/// spf.restore_arc(1, 3).unwrap();
/// spf.fw_find();
/// assert_eq!(spf.fw_dist(0, 3), 4);
/// assert_eq!(spf.fw_dist(3, 0), INFINITY);
/// ```
#[derive(Debug, Clone)]
pub struct ShortestPathsFinder {
    graph: Csr<Neighbor>,
    growth: GrowthPolicy,
    /// Reused buffer for sorting `update_digraph` input.
    scratch: Vec<Arc>,
    /// Reused duplicate marker for `update_graph` input.
    last_tail: Vec<usize>,
    /// Weight of every muted arc before it was muted, keyed by slot.
    muted: HashMap<usize, Distance>,
    dist: Vec<Distance>,
    previous: Vec<Option<usize>>,
    heap: IndexedMinHeap,
    origin: Option<usize>,
    all_pairs: AllPairs,
}

impl Default for ShortestPathsFinder {
    fn default() -> Self {
        Self::with_growth(GrowthPolicy::default())
    }
}

impl ShortestPathsFinder {
    /// An engine holding the empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_growth(growth: GrowthPolicy) -> Self {
        ShortestPathsFinder {
            graph: Csr::new(),
            growth,
            scratch: Vec::new(),
            last_tail: Vec::new(),
            muted: HashMap::new(),
            dist: Vec::new(),
            previous: Vec::new(),
            heap: IndexedMinHeap::new(0, INFINITY),
            origin: None,
            all_pairs: AllPairs::default(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn arc_count(&self) -> usize {
        self.graph.arc_count()
    }

    /// Replaces the graph with `nodes` nodes and the given arcs.
    ///
    /// Arcs may come in any order. On error the previous graph is left
    /// untouched.
    pub fn update_digraph(&mut self, nodes: usize, arcs: &[Arc]) -> Result<()> {
        for arc in arcs {
            check_arc(nodes, arc.tail, arc.head, arc.weight)?;
        }

        self.scratch.clear();
        self.growth.reserve(&mut self.scratch, arcs.len());
        self.scratch.extend_from_slice(arcs);
        self.scratch.sort_unstable_by_key(|arc| (arc.tail, arc.head));
        if let Some(pair) = self
            .scratch
            .windows(2)
            .find(|pair| (pair[0].tail, pair[0].head) == (pair[1].tail, pair[1].head))
        {
            return Err(Error::DuplicateArc {
                tail: pair[1].tail,
                head: pair[1].head,
            });
        }

        self.graph.rebuild_sorted(
            nodes,
            self.scratch.iter().map(|arc| {
                let nb = Neighbor {
                    head: arc.head,
                    weight: arc.weight,
                };
                (arc.tail, nb)
            }),
            &self.growth,
        );
        self.after_rebuild();
        Ok(())
    }

    /// Replaces the graph with one already in adjacency form: the arcs
    /// leaving node `u` are `heads[start[u]..start[u + 1]]` with the matching
    /// `weights`.
    ///
    /// Neighbour lists need not be sorted. On error the previous graph is
    /// left untouched.
    pub fn update_graph(
        &mut self,
        nodes: usize,
        start: &[usize],
        heads: &[usize],
        weights: &[Distance],
    ) -> Result<()> {
        if start.len() != nodes + 1 {
            return Err(Error::InvalidAdjacency(
                "offset array needs one entry per node plus one",
            ));
        }
        if start[0] != 0 {
            return Err(Error::InvalidAdjacency("first offset must be 0"));
        }
        if start.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidAdjacency("offsets must be non-decreasing"));
        }
        if start[nodes] != heads.len() {
            return Err(Error::InvalidAdjacency("last offset must equal the arc count"));
        }
        if heads.len() != weights.len() {
            return Err(Error::InvalidAdjacency("heads and weights differ in length"));
        }

        self.last_tail.clear();
        self.growth.reserve(&mut self.last_tail, nodes);
        self.last_tail.resize(nodes, usize::MAX);
        for u in 0..nodes {
            for slot in start[u]..start[u + 1] {
                let head = heads[slot];
                check_arc(nodes, u, head, weights[slot])?;
                if self.last_tail[head] == u {
                    return Err(Error::DuplicateArc { tail: u, head });
                }
                self.last_tail[head] = u;
            }
        }

        self.graph.rebuild_from_parts(
            start,
            heads
                .iter()
                .zip(weights)
                .map(|(&head, &weight)| Neighbor { head, weight }),
            &self.growth,
        );
        for u in 0..nodes {
            self.graph.out_arcs_mut(u).sort_unstable_by_key(|nb| nb.head);
        }
        self.after_rebuild();
        Ok(())
    }

    fn after_rebuild(&mut self) {
        let n = self.graph.node_count();
        self.muted.clear();
        self.growth.reserve(&mut self.dist, n);
        self.dist.clear();
        self.dist.resize(n, INFINITY);
        self.growth.reserve(&mut self.previous, n);
        self.previous.clear();
        self.previous.resize(n, None);
        self.heap.resize(n);
        self.origin = None;
        self.all_pairs.invalidate();
        debug!(
            "shortest path graph rebuilt: {} nodes, {} arcs",
            n,
            self.graph.arc_count()
        );
    }

    /// Slot of arc `tail -> head`.
    fn locate(&self, tail: usize, head: usize) -> Result<usize> {
        let node_count = self.graph.node_count();
        if tail >= node_count {
            return Err(Error::NodeOutOfRange {
                node: tail,
                node_count,
            });
        }
        self.graph
            .out_arcs(tail)
            .binary_search_by_key(&head, |nb| nb.head)
            .map(|i| self.graph.arc_range(tail).start + i)
            .map_err(|_| Error::ArcNotFound { tail, head })
    }

    /// Current weight of `tail -> head`; `INFINITY` while the arc is muted.
    pub fn arc_weight(&self, tail: usize, head: usize) -> Result<Distance> {
        let slot = self.locate(tail, head)?;
        Ok(self.graph.arc(slot).weight)
    }

    /// Sets the weight of `tail -> head`. A muted arc is unmuted for good:
    /// a later [`restore_arc`](Self::restore_arc) does nothing.
    pub fn update_arc(&mut self, tail: usize, head: usize, weight: Distance) -> Result<()> {
        if weight > INFINITY {
            return Err(Error::WeightOutOfRange { tail, head, weight });
        }
        let slot = self.locate(tail, head)?;
        self.graph.arc_mut(slot).weight = weight;
        self.muted.remove(&slot);
        Ok(())
    }

    /// Makes `tail -> head` unusable until [`restore_arc`](Self::restore_arc)
    /// by raising its weight to `INFINITY`.
    ///
    /// Muting an arc twice keeps the weight it had before the first call.
    pub fn temp_remove_arc(&mut self, tail: usize, head: usize) -> Result<()> {
        let slot = self.locate(tail, head)?;
        let arc = self.graph.arc_mut(slot);
        self.muted.entry(slot).or_insert(arc.weight);
        arc.weight = INFINITY;
        Ok(())
    }

    /// Gives a muted arc back the weight it had before
    /// [`temp_remove_arc`](Self::temp_remove_arc). Arcs that are not muted
    /// are left alone.
    pub fn restore_arc(&mut self, tail: usize, head: usize) -> Result<()> {
        let slot = self.locate(tail, head)?;
        if let Some(weight) = self.muted.remove(&slot) {
            self.graph.arc_mut(slot).weight = weight;
        }
        Ok(())
    }

    /// Runs Dijkstra's algorithm from `origin`, replacing the results of any
    /// previous run.
    pub fn find(&mut self, origin: usize) -> Result<()> {
        let node_count = self.graph.node_count();
        if origin >= node_count {
            return Err(Error::NodeOutOfRange {
                node: origin,
                node_count,
            });
        }

        self.dist.fill(INFINITY);
        self.previous.fill(None);
        self.heap.reset();
        self.dist[origin] = 0;
        self.heap.decrease(origin, 0);
        self.origin = Some(origin);

        let mut settled = 0usize;
        while let Some((u, du)) = self.heap.extract_min() {
            settled += 1;
            for nb in self.graph.out_arcs(u) {
                let candidate = du + nb.weight;
                if candidate < self.dist[nb.head] {
                    self.dist[nb.head] = candidate;
                    self.previous[nb.head] = Some(u);
                    self.heap.decrease(nb.head, candidate);
                }
            }
        }
        debug!(
            "dijkstra from {}: {} of {} nodes reached",
            origin, settled, node_count
        );
        Ok(())
    }

    /// Origin of the last [`find`](Self::find) since the graph was loaded.
    pub fn origin(&self) -> Option<usize> {
        self.origin
    }

    /// Distance from the origin to `node`, `INFINITY` if unreached.
    pub fn dist(&self, node: usize) -> Distance {
        self.dist[node]
    }

    pub fn distances(&self) -> &[Distance] {
        &self.dist
    }

    /// Predecessor of `node` on its shortest path from the origin.
    pub fn previous(&self, node: usize) -> Option<usize> {
        self.previous[node]
    }

    /// Shortest path from the origin to `target`; empty if `target` was not
    /// reached or is the origin.
    pub fn path(&self, target: usize) -> Vec<usize> {
        let mut out = Vec::new();
        self.path_into(target, &mut out);
        out
    }

    /// Writes the shortest path from the origin to `target` into `out`,
    /// origin first and target last, and returns its number of nodes.
    /// Writes nothing and returns 0 if `target` was not reached or is the
    /// origin.
    pub fn path_into(&self, target: usize, out: &mut Vec<usize>) -> usize {
        out.clear();
        if self.previous[target].is_none() {
            return 0;
        }
        let mut node = target;
        out.push(node);
        while let Some(prev) = self.previous[node] {
            out.push(prev);
            node = prev;
        }
        out.reverse();
        out.len()
    }

    /// Computes all-pairs shortest paths with Floyd-Warshall.
    pub fn fw_find(&mut self) {
        self.all_pairs.solve(&self.graph);
        debug!(
            "floyd-warshall over {} nodes done",
            self.graph.node_count()
        );
    }

    /// Whether [`fw_find`](Self::fw_find) ran since the graph was last
    /// loaded. Arc edits and mutes do not reset it.
    pub fn fw_ran(&self) -> bool {
        self.all_pairs.ran()
    }

    /// All-pairs distance from `from` to `to`. `INFINITY` when there is no
    /// path or [`fw_find`](Self::fw_find) has not run on the current graph.
    ///
    /// # Panics
    ///
    /// If either node is out of range of the last all-pairs solve.
    pub fn fw_dist(&self, from: usize, to: usize) -> Distance {
        self.all_pairs.dist(from, to)
    }

    pub fn fw_path(&self, from: usize, to: usize) -> Vec<usize> {
        let mut out = Vec::new();
        self.all_pairs.path_into(from, to, &mut out);
        out
    }

    /// Same contract as [`path_into`](Self::path_into) for the all-pairs
    /// results.
    pub fn fw_path_into(&self, from: usize, to: usize, out: &mut Vec<usize>) -> usize {
        self.all_pairs.path_into(from, to, out)
    }
}

fn check_arc(nodes: usize, tail: usize, head: usize, weight: Distance) -> Result<()> {
    for node in [tail, head] {
        if node >= nodes {
            return Err(Error::NodeOutOfRange {
                node,
                node_count: nodes,
            });
        }
    }
    if weight > INFINITY {
        return Err(Error::WeightOutOfRange { tail, head, weight });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ShortestPathsFinder;
    use crate::csr::GrowthPolicy;
    use crate::err::Error;
    use crate::shortest_path::{Arc, INFINITY};

    fn diamond() -> ShortestPathsFinder {
        let mut spf = ShortestPathsFinder::new();
        spf.update_digraph(
            5,
            &[
                Arc::new(2, 3, 1),
                Arc::new(0, 1, 1),
                Arc::new(1, 3, 5),
                Arc::new(0, 2, 2),
                Arc::new(3, 4, 1),
            ],
        )
        .unwrap();
        spf
    }

    #[test]
    fn test_three_node_path() {
        let mut spf = ShortestPathsFinder::new();
        spf.update_digraph(3, &[Arc::new(0, 1, 1), Arc::new(1, 2, 1)])
            .unwrap();
        spf.find(0).unwrap();
        assert_eq!(spf.origin(), Some(0));
        assert_eq!(spf.distances(), &[0, 1, 2]);
        assert_eq!(spf.path(2), vec![0, 1, 2]);
        assert_eq!(spf.previous(1), Some(0));
        assert_eq!(spf.previous(0), None);
        assert!(spf.path(0).is_empty());
    }

    #[test]
    fn test_unreachable_nodes() {
        let mut spf = diamond();
        spf.find(3).unwrap();
        assert_eq!(spf.dist(4), 1);
        assert_eq!(spf.dist(0), INFINITY);
        let mut out = vec![9, 9];
        assert_eq!(spf.path_into(0, &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_mute_and_restore() {
        let mut spf = diamond();
        spf.find(0).unwrap();
        assert_eq!(spf.path(4), vec![0, 2, 3, 4]);

        spf.temp_remove_arc(2, 3).unwrap();
        assert_eq!(spf.arc_weight(2, 3), Ok(INFINITY));
        spf.find(0).unwrap();
        assert_eq!(spf.path(4), vec![0, 1, 3, 4]);
        assert_eq!(spf.dist(4), 7);

        // muting twice keeps the first remembered weight
        spf.temp_remove_arc(2, 3).unwrap();
        spf.restore_arc(2, 3).unwrap();
        assert_eq!(spf.arc_weight(2, 3), Ok(1));
        spf.find(0).unwrap();
        assert_eq!(spf.dist(4), 4);

        // restoring an arc that is not muted changes nothing
        spf.restore_arc(0, 1).unwrap();
        assert_eq!(spf.arc_weight(0, 1), Ok(1));
    }

    #[test]
    fn test_update_arc_forgets_muted_weight() {
        let mut spf = diamond();
        spf.temp_remove_arc(0, 1).unwrap();
        spf.update_arc(0, 1, 6).unwrap();
        spf.restore_arc(0, 1).unwrap();
        assert_eq!(spf.arc_weight(0, 1), Ok(6));
    }

    #[test]
    fn test_rebuild_forgets_muted_arcs() {
        let mut spf = diamond();
        spf.temp_remove_arc(0, 1).unwrap();
        spf.update_digraph(2, &[Arc::new(0, 1, 3)]).unwrap();
        spf.restore_arc(0, 1).unwrap();
        assert_eq!(spf.arc_weight(0, 1), Ok(3));
        assert_eq!(spf.origin(), None);
    }

    #[test]
    fn test_missing_arcs_and_nodes() {
        let mut spf = diamond();
        assert_eq!(
            spf.arc_weight(1, 0),
            Err(Error::ArcNotFound { tail: 1, head: 0 })
        );
        assert_eq!(
            spf.update_arc(7, 0, 1),
            Err(Error::NodeOutOfRange {
                node: 7,
                node_count: 5
            })
        );
        assert_eq!(
            spf.update_arc(0, 1, INFINITY + 1),
            Err(Error::WeightOutOfRange {
                tail: 0,
                head: 1,
                weight: INFINITY + 1
            })
        );
        assert_eq!(
            spf.find(5),
            Err(Error::NodeOutOfRange {
                node: 5,
                node_count: 5
            })
        );
    }

    #[test]
    fn test_invalid_digraph_keeps_previous_graph() {
        let mut spf = diamond();
        assert_eq!(
            spf.update_digraph(3, &[Arc::new(0, 1, 1), Arc::new(0, 3, 1)]),
            Err(Error::NodeOutOfRange {
                node: 3,
                node_count: 3
            })
        );
        assert_eq!(
            spf.update_digraph(3, &[Arc::new(0, 1, 1), Arc::new(2, 0, 1), Arc::new(0, 1, 4)]),
            Err(Error::DuplicateArc { tail: 0, head: 1 })
        );
        assert_eq!(spf.node_count(), 5);
        assert_eq!(spf.arc_count(), 5);
    }

    #[test]
    fn test_update_graph_sorts_neighbours() {
        let mut spf = ShortestPathsFinder::new();
        spf.update_graph(4, &[0, 3, 3, 4, 4], &[3, 1, 2, 3], &[9, 1, 4, 2])
            .unwrap();
        assert_eq!(spf.arc_count(), 4);
        assert_eq!(spf.arc_weight(0, 2), Ok(4));
        assert_eq!(spf.arc_weight(0, 3), Ok(9));
        spf.find(0).unwrap();
        assert_eq!(spf.path(3), vec![0, 2, 3]);
        assert_eq!(spf.dist(3), 6);
    }

    #[test]
    fn test_update_graph_rejects_bad_adjacency() {
        let mut spf = ShortestPathsFinder::new();
        assert!(matches!(
            spf.update_graph(2, &[0, 1], &[1], &[1]),
            Err(Error::InvalidAdjacency(_))
        ));
        assert!(matches!(
            spf.update_graph(2, &[0, 2, 1], &[1], &[1]),
            Err(Error::InvalidAdjacency(_))
        ));
        assert!(matches!(
            spf.update_graph(2, &[0, 1, 2], &[1], &[1]),
            Err(Error::InvalidAdjacency(_))
        ));
        assert!(matches!(
            spf.update_graph(2, &[0, 1, 1], &[1], &[1, 2]),
            Err(Error::InvalidAdjacency(_))
        ));
        assert_eq!(
            spf.update_graph(2, &[0, 2, 2], &[1, 1], &[1, 2]),
            Err(Error::DuplicateArc { tail: 0, head: 1 })
        );
        assert_eq!(
            spf.update_graph(2, &[0, 1, 1], &[2], &[1]),
            Err(Error::NodeOutOfRange {
                node: 2,
                node_count: 2
            })
        );
        assert_eq!(spf.node_count(), 0);
    }

    #[test]
    fn test_storage_grows_by_policy_and_is_reused() {
        let growth = GrowthPolicy {
            threshold: 10,
            small_factor: 2.0,
            large_factor: 1.0,
        };
        let mut spf = ShortestPathsFinder::with_growth(growth);
        let arcs: Vec<Arc> = (0..5).map(|u| Arc::new(u, u + 1, 1)).collect();
        spf.update_digraph(6, &arcs).unwrap();
        assert_eq!(spf.graph.capacity(), (13, 10));

        spf.update_digraph(3, &arcs[..2]).unwrap();
        assert_eq!(spf.graph.capacity(), (13, 10));
        spf.find(0).unwrap();
        assert_eq!(spf.path(2), vec![0, 1, 2]);
    }

    #[test]
    fn test_all_pairs_matches_single_source() {
        let mut spf = diamond();
        assert!(!spf.fw_ran());
        spf.fw_find();
        assert!(spf.fw_ran());
        for origin in 0..5 {
            spf.find(origin).unwrap();
            for target in 0..5 {
                assert_eq!(spf.fw_dist(origin, target), spf.dist(target));
                let fw = spf.fw_path(origin, target);
                let dij = spf.path(target);
                assert_eq!(fw.len(), dij.len());
                assert_eq!(fw.first(), dij.first());
                assert_eq!(fw.last(), dij.last());
            }
        }
        assert_eq!(spf.fw_path(0, 4), vec![0, 2, 3, 4]);

        spf.update_arc(0, 2, 8).unwrap();
        assert!(spf.fw_ran());
        spf.update_digraph(5, &[]).unwrap();
        assert!(!spf.fw_ran());
    }

    #[test]
    fn test_empty_graph() {
        let mut spf = ShortestPathsFinder::new();
        spf.update_digraph(0, &[]).unwrap();
        assert_eq!(spf.node_count(), 0);
        assert!(spf.find(0).is_err());
        spf.fw_find();
        assert!(spf.fw_ran());
    }
}
