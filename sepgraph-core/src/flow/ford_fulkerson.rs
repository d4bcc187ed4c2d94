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

use std::collections::VecDeque;
use std::hash::Hash;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use num_traits::PrimInt;
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};

use super::residual::ResNet;
use super::MinCut;
use crate::err::Error;

/// Order in which the augmenting path search expands its frontier.
///
/// Any order finds *some* augmenting path, which is all the Ford-Fulkerson
/// method needs. The order only changes how many augmentations are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Expand the most recently discovered node first.
    #[default]
    DepthFirst,
    /// Expand nodes in discovery order, giving shortest augmenting paths
    /// (Edmonds-Karp).
    BreadthFirst,
}

/// Scratch space for the augmenting path search, reused across searches.
#[derive(Debug, Clone)]
pub(crate) struct PathSearch {
    pub visited: FixedBitSet,
    pub frontier: VecDeque<usize>,
    /// Slot of the arc through which each node was discovered.
    pub parent_arc: Vec<usize>,
}

impl PathSearch {
    pub fn new(node_count: usize) -> Self {
        PathSearch {
            visited: FixedBitSet::with_capacity(node_count),
            frontier: VecDeque::with_capacity(node_count),
            parent_arc: vec![usize::MAX; node_count],
        }
    }
}

impl<C: PrimInt> ResNet<C> {
    /// Searches for a path from `source` to `sink` using only arcs with
    /// positive residual capacity. On success the path can be read back
    /// from `search.parent_arc`, starting at `sink`.
    pub(crate) fn find_augmenting_path(
        &self,
        source: usize,
        sink: usize,
        traversal: Traversal,
        search: &mut PathSearch,
    ) -> bool {
        let PathSearch {
            visited,
            frontier,
            parent_arc,
        } = search;
        visited.clear();
        frontier.clear();
        visited.insert(source);
        frontier.push_back(source);

        loop {
            let next = match traversal {
                Traversal::DepthFirst => frontier.pop_back(),
                Traversal::BreadthFirst => frontier.pop_front(),
            };
            let Some(u) = next else {
                return false;
            };
            for slot in self.graph.arc_range(u) {
                let arc = self.graph.arc(slot);
                if arc.cap <= C::zero() || visited.put(arc.head) {
                    continue;
                }
                parent_arc[arc.head] = slot;
                if arc.head == sink {
                    return true;
                }
                frontier.push_back(arc.head);
            }
        }
    }

    /// Pushes the bottleneck capacity along the path recorded in
    /// `parent_arc` and returns it.
    pub(crate) fn augment(&mut self, source: usize, sink: usize, parent_arc: &[usize]) -> C {
        let mut bottleneck = C::max_value();
        let mut v = sink;
        while v != source {
            let arc = self.graph.arc(parent_arc[v]);
            bottleneck = bottleneck.min(arc.cap);
            v = self.graph.arc(arc.twin).head;
        }
        debug_assert!(bottleneck > C::zero());

        let mut v = sink;
        while v != source {
            let slot = parent_arc[v];
            let arc = self.graph.arc_mut(slot);
            arc.cap = arc.cap - bottleneck;
            let twin = arc.twin;
            let reverse = self.graph.arc_mut(twin);
            reverse.cap = reverse.cap + bottleneck;
            v = reverse.head;
        }
        bottleneck
    }
}

/// The return type for [`ford_fulkerson()`].
///
/// * `value` - the maximum flow value
/// * `flow_edges` - flow on every edge of the input graph with a positive
///     capacity, keyed by `(source, target)`
/// * `cut` - the edges of a minimum cut, leaving the source side
#[derive(Debug, Clone)]
pub struct MaxFlowReturn<N, C> {
    pub value: C,
    pub flow_edges: HashMap<(N, N), C>,
    pub cut: Vec<(N, N)>,
}

/// Compute a maximum flow and a minimum cut between `source` and `sink`.
///
/// The graph is copied into a [`MinCut`] engine, solved with the
/// Ford-Fulkerson augmenting path method and the results are translated
/// back into the graph's node identifiers. Parallel edges and self loops are
/// rejected, as are negative capacities and capacities too large for the
/// flow to fit in `C`.
///
/// Arguments:
///
/// * `graph` - The directed graph to run the algorithm on
/// * `source` - The node flow leaves from
/// * `sink` - The node flow arrives at
/// * `capacity` - A function which receives an edge reference and returns
///     the integer capacity of that edge. Errors it returns are passed
///     through unchanged.
///
/// # Example
/// ```rust
/// use sepgraph_core::petgraph;
/// use sepgraph_core::petgraph::visit::EdgeRef;
/// use sepgraph_core::flow::ford_fulkerson;
/// use sepgraph_core::Error;
///
/// let mut graph = petgraph::graph::DiGraph::<(), i64>::new();
/// let s = graph.add_node(());
/// let a = graph.add_node(());
/// let b = graph.add_node(());
/// let t = graph.add_node(());
/// graph.add_edge(s, a, 3);
/// graph.add_edge(a, t, 2);
/// graph.add_edge(s, b, 2);
/// graph.add_edge(b, t, 3);
///
/// let res = ford_fulkerson(&graph, s, t, |e| Ok::<i64, Error>(*e.weight())).unwrap();
/// assert_eq!(res.value, 4);
/// assert_eq!(res.flow_edges[&(a, t)], 2);
/// ```
pub fn ford_fulkerson<G, F, C, E>(
    graph: G,
    source: G::NodeId,
    sink: G::NodeId,
    mut capacity: F,
) -> Result<MaxFlowReturn<G::NodeId, C>, E>
where
    G: IntoEdgeReferences + NodeIndexable,
    G::NodeId: Eq + Hash,
    F: FnMut(G::EdgeRef) -> Result<C, E>,
    C: PrimInt + std::fmt::Display,
    E: From<Error>,
{
    let mut arcs = Vec::new();
    for edge in graph.edge_references() {
        let cap = capacity(edge)?;
        arcs.push((
            graph.to_index(edge.source()),
            graph.to_index(edge.target()),
            cap,
        ));
    }

    let mut engine = MinCut::new(arcs, graph.to_index(source), graph.to_index(sink))?;
    let value = engine.optimize();
    let flow_edges = engine
        .arc_flows()
        .into_iter()
        .map(|((u, v), flow)| ((graph.from_index(u), graph.from_index(v)), flow))
        .collect();
    let cut = engine
        .cut_arcs()
        .iter()
        .map(|&(u, v)| (graph.from_index(u), graph.from_index(v)))
        .collect();
    Ok(MaxFlowReturn {
        value,
        flow_edges,
        cut,
    })
}
