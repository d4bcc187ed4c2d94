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

//! Maximum flow and minimum `s`-`t` cut.
//!
//! [`MinCut`] is the engine: it copies an arc list into a residual network,
//! augments flow along paths with positive residual capacity until none is
//! left (Ford-Fulkerson) and then reports the arcs leaving the set of nodes
//! still reachable from the source. [`ford_fulkerson()`] runs the same engine
//! on a petgraph graph.

mod ford_fulkerson;
mod min_cut;
mod residual;

pub use ford_fulkerson::{ford_fulkerson, MaxFlowReturn, Traversal};
pub use min_cut::MinCut;
