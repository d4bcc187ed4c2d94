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

use fixedbitset::FixedBitSet;
use indexmap::IndexSet;
use log::debug;
use num_traits::PrimInt;

use crate::arc_locator::ArcLocator;
use crate::csr::Csr;
use crate::err::{Error, Result};

/// One arc of the residual network.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResArc<C> {
    pub head: usize,
    /// Remaining capacity, never negative.
    pub cap: C,
    /// Slot of the arc `head -> tail`.
    pub twin: usize,
    /// Whether the caller supplied this arc with a positive capacity.
    pub original: bool,
}

/// Residual network over densely renumbered nodes.
#[derive(Debug, Clone)]
pub(crate) struct ResNet<C> {
    pub graph: Csr<ResArc<C>>,
    pub locator: ArcLocator,
    /// Capacity of every slot before any flow was pushed.
    pub initial: Vec<C>,
    /// Caller id of every dense node, in first-seen order.
    pub nodes: IndexSet<usize>,
    /// Dense index of the source.
    pub source: usize,
    /// Dense index of the sink.
    pub sink: usize,
}

impl<C: PrimInt> ResNet<C> {
    /// Renumbers the caller's nodes, validates the arcs, adds the missing
    /// reverse arcs and lays everything out by tail.
    ///
    /// `source` and `sink` are caller ids; they get a dense index even when
    /// no arc touches them.
    ///
    /// Capacities must leave room for the flow: `cap(u, v) + cap(v, u)` has
    /// to fit in `C` for every pair, and so does the total capacity leaving
    /// the source. Together these bound every residual capacity and the flow
    /// value.
    pub fn build(arcs: Vec<(usize, usize, C)>, source: usize, sink: usize) -> Result<Self> {
        let mut nodes = IndexSet::with_capacity(arcs.len() + 2);
        let tails: Vec<usize> = arcs.iter().map(|&(u, _, _)| nodes.insert_full(u).0).collect();
        let heads: Vec<usize> = arcs.iter().map(|&(_, v, _)| nodes.insert_full(v).0).collect();
        let s = nodes.insert_full(source).0;
        let t = nodes.insert_full(sink).0;
        if source == sink {
            return Err(Error::SourceIsSink(source));
        }

        let node_count = nodes.len();
        let mut locator = ArcLocator::new(node_count, 2 * arcs.len());
        let mut dense: Vec<(usize, usize, C)> = Vec::with_capacity(2 * arcs.len());
        for (i, &(tail, head, cap)) in arcs.iter().enumerate() {
            let (u, v) = (tails[i], heads[i]);
            if u == v {
                return Err(Error::SelfLoop { node: tail });
            }
            if cap < C::zero() {
                return Err(Error::NegativeCapacity { tail, head });
            }
            if locator.contains(u, v) {
                return Err(Error::DuplicateArc { tail, head });
            }
            locator.set(u, v, i);
            dense.push((u, v, cap));
        }

        let supplied = dense.len();
        for i in 0..supplied {
            let (u, v, _) = dense[i];
            if !locator.contains(v, u) {
                locator.set(v, u, dense.len());
                dense.push((v, u, C::zero()));
            }
        }

        let (mut graph, slots) = Csr::bucket_by_tail(
            node_count,
            dense
                .iter()
                .map(|&(u, v, cap)| {
                    let arc = ResArc {
                        head: v,
                        cap,
                        twin: usize::MAX,
                        original: cap > C::zero(),
                    };
                    (u, arc)
                })
                .collect(),
        );

        // re-point every pair at its final slot
        for (&(u, v, _), &slot) in dense.iter().zip(slots.iter()) {
            locator.set(u, v, slot);
        }
        for u in 0..node_count {
            for slot in graph.arc_range(u) {
                let head = graph.arc(slot).head;
                let twin = locator.get(head, u).ok_or_else(|| Error::ArcNotFound {
                    tail: nodes[head],
                    head: nodes[u],
                })?;
                if graph.arc(slot).cap.checked_add(&graph.arc(twin).cap).is_none() {
                    return Err(Error::CapacityOverflow { node: nodes[u] });
                }
                graph.arc_mut(slot).twin = twin;
            }
        }
        graph
            .out_arcs(s)
            .iter()
            .try_fold(C::zero(), |total, arc| total.checked_add(&arc.cap))
            .ok_or(Error::CapacityOverflow { node: source })?;

        debug!(
            "residual network: {} nodes, {} arcs ({} reverse arcs added)",
            node_count,
            dense.len(),
            dense.len() - supplied
        );

        let initial = graph.arcs().iter().map(|arc| arc.cap).collect();
        Ok(ResNet {
            graph,
            locator,
            initial,
            nodes,
            source: s,
            sink: t,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dense_index(&self, id: usize) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    pub fn original_id(&self, u: usize) -> usize {
        self.nodes[u]
    }

    /// Remaining capacity of `u -> v`, dense indices.
    pub fn residual(&self, u: usize, v: usize) -> Option<C> {
        self.locator.get(u, v).map(|slot| self.graph.arc(slot).cap)
    }

    /// Marks every node reachable from `root` through arcs with positive
    /// residual capacity. `stack` is scratch space.
    pub fn mark_reachable(&self, root: usize, visited: &mut FixedBitSet, stack: &mut Vec<usize>) {
        visited.clear();
        stack.clear();
        visited.insert(root);
        stack.push(root);
        while let Some(u) = stack.pop() {
            for arc in self.graph.out_arcs(u) {
                if arc.cap > C::zero() && !visited.put(arc.head) {
                    stack.push(arc.head);
                }
            }
        }
    }
}
