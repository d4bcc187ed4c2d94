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

use std::fmt::Display;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use log::{debug, trace};
use num_traits::PrimInt;

use super::ford_fulkerson::{PathSearch, Traversal};
use super::residual::ResNet;
use crate::err::{Error, Result};

/// Maximum flow / minimum cut solver for one `s`-`t` pair.
///
/// The solver is built once from an arc list and then solved with
/// [`MinCut::optimize`]. Node identifiers may be any `usize` values, they do
/// not have to be contiguous; all results are reported with the caller's
/// identifiers.
///
/// # Example
/// ```rust
/// use sepgraph_core::flow::MinCut;
///
/// let mut cut = MinCut::new([(10, 20, 5i64)], 10, 20).unwrap();
/// assert_eq!(cut.optimize(), 5);
/// assert_eq!(cut.cut_arcs(), &[(10, 20)]);
/// assert!(cut.in_source_side(10));
/// assert!(!cut.in_source_side(20));
/// ```
#[derive(Debug, Clone)]
pub struct MinCut<C = i64> {
    network: ResNet<C>,
    source: usize,
    sink: usize,
    traversal: Traversal,
    search: PathSearch,
    stack: Vec<usize>,
    source_side: FixedBitSet,
    total_flow: C,
    cut: Vec<(usize, usize)>,
}

impl<C> MinCut<C>
where
    C: PrimInt + Display,
{
    /// Builds the residual network for `arcs`, given as
    /// `(tail, head, capacity)` triples.
    ///
    /// Fails if `source == sink`, if an arc is a self loop, if the same
    /// `(tail, head)` pair appears twice, if a capacity is negative or if
    /// the capacities are too large for the flow to fit in `C`.
    pub fn new<I>(arcs: I, source: usize, sink: usize) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, C)>,
    {
        let network = ResNet::build(arcs.into_iter().collect(), source, sink)?;
        let n = network.node_count();
        Ok(MinCut {
            source: network.source,
            sink: network.sink,
            network,
            traversal: Traversal::default(),
            search: PathSearch::new(n),
            stack: Vec::with_capacity(n),
            source_side: FixedBitSet::with_capacity(n),
            total_flow: C::zero(),
            cut: Vec::new(),
        })
    }

    /// Same as [`MinCut::new`] with the arcs given as parallel arrays.
    pub fn from_parallel(
        tails: &[usize],
        heads: &[usize],
        capacities: &[C],
        source: usize,
        sink: usize,
    ) -> Result<Self> {
        if tails.len() != heads.len() || tails.len() != capacities.len() {
            return Err(Error::LengthMismatch {
                tails: tails.len(),
                heads: heads.len(),
                capacities: capacities.len(),
            });
        }
        let arcs = tails
            .iter()
            .zip(heads)
            .zip(capacities)
            .map(|((&u, &v), &cap)| (u, v, cap));
        Self::new(arcs, source, sink)
    }

    /// Selects the order used to search for augmenting paths.
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Augments flow until no augmenting path is left, then computes the
    /// minimum cut.
    ///
    /// Returns the flow added by this call, so calling it again on a
    /// saturated network returns zero. The accumulated value is available
    /// from [`MinCut::flow_value`].
    pub fn optimize(&mut self) -> C {
        let mut added = C::zero();
        let mut augmentations = 0usize;
        while self.network.find_augmenting_path(
            self.source,
            self.sink,
            self.traversal,
            &mut self.search,
        ) {
            let delta = self
                .network
                .augment(self.source, self.sink, &self.search.parent_arc);
            trace!("augmenting path {} carries {}", augmentations, delta);
            added = added + delta;
            augmentations += 1;
        }
        self.total_flow = self.total_flow + added;
        self.extract_cut();
        debug!(
            "max flow {} after {} augmentations, {} cut arcs",
            self.total_flow,
            augmentations,
            self.cut.len()
        );
        added
    }

    fn extract_cut(&mut self) {
        self.network
            .mark_reachable(self.source, &mut self.source_side, &mut self.stack);
        self.cut.clear();
        let graph = &self.network.graph;
        for u in self.source_side.ones() {
            for arc in graph.out_arcs(u) {
                if arc.original && !self.source_side.contains(arc.head) {
                    self.cut.push((
                        self.network.original_id(u),
                        self.network.original_id(arc.head),
                    ));
                }
            }
        }
    }

    /// Total flow sent from source to sink so far.
    pub fn flow_value(&self) -> C {
        self.total_flow
    }

    /// Number of distinct nodes, including the source and sink.
    pub fn node_count(&self) -> usize {
        self.network.node_count()
    }

    /// Number of residual arcs, including the added reverse arcs.
    pub fn arc_count(&self) -> usize {
        self.network.graph.arc_count()
    }

    pub fn source(&self) -> usize {
        self.network.original_id(self.source)
    }

    pub fn sink(&self) -> usize {
        self.network.original_id(self.sink)
    }

    /// Number of arcs in the minimum cut.
    pub fn cut_len(&self) -> usize {
        self.cut.len()
    }

    /// The `i`-th cut arc as `(source, destination)`.
    ///
    /// # Panics
    ///
    /// If `i >= self.cut_len()`.
    pub fn cut_arc(&self, i: usize) -> (usize, usize) {
        self.cut[i]
    }

    pub fn cut_arc_source(&self, i: usize) -> usize {
        self.cut[i].0
    }

    pub fn cut_arc_destination(&self, i: usize) -> usize {
        self.cut[i].1
    }

    pub fn cut_arcs(&self) -> &[(usize, usize)] {
        &self.cut
    }

    /// Whether node `id` lies on the source side of the cut. Unknown nodes
    /// are never on the source side, and neither is any node before the
    /// first call to [`MinCut::optimize`].
    pub fn in_source_side(&self, id: usize) -> bool {
        self.network
            .dense_index(id)
            .is_some_and(|u| self.source_side.contains(u))
    }

    /// Nodes on the source side of the cut.
    pub fn source_side(&self) -> impl Iterator<Item = usize> + '_ {
        self.source_side
            .ones()
            .map(|u| self.network.original_id(u))
    }

    /// Remaining capacity of arc `tail -> head`, or `None` if neither the
    /// caller nor the preprocessing created it.
    pub fn residual_capacity(&self, tail: usize, head: usize) -> Option<C> {
        let u = self.network.dense_index(tail)?;
        let v = self.network.dense_index(head)?;
        self.network.residual(u, v)
    }

    /// Flow carried by every arc given with a positive capacity.
    pub fn arc_flows(&self) -> HashMap<(usize, usize), C> {
        let graph = &self.network.graph;
        let mut flows = HashMap::with_capacity(graph.arc_count() / 2);
        for u in 0..graph.node_count() {
            for slot in graph.arc_range(u) {
                let arc = graph.arc(slot);
                if !arc.original {
                    continue;
                }
                let initial = self.network.initial[slot];
                let flow = if initial > arc.cap {
                    initial - arc.cap
                } else {
                    C::zero()
                };
                flows.insert(
                    (
                        self.network.original_id(u),
                        self.network.original_id(arc.head),
                    ),
                    flow,
                );
            }
        }
        flows
    }
}
