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

//! # sepgraph-core
//!
//! Two small graph engines meant to be called over and over from inside an
//! optimization loop, typically a cutting-plane separation routine:
//!
//! * [`flow::MinCut`] computes a maximum `s`-`t` flow on a capacitated
//!   digraph with integer capacities and reports the arcs of a minimum cut.
//! * [`shortest_path::ShortestPathsFinder`] answers single-source
//!   (Dijkstra) and all-pairs (Floyd-Warshall) shortest path queries on a
//!   weighted digraph that can be rebuilt or edited between solves.
//!
//! Both keep their graphs in the compact adjacency layout of [`csr::Csr`]
//! and reuse their scratch storage across calls.
//!
//! ## Example
//!
//! ```rust
//! use sepgraph_core::flow::MinCut;
//! use sepgraph_core::shortest_path::{Arc, ShortestPathsFinder};
//!
//! let mut cut = MinCut::new([(0, 1, 3), (1, 3, 2), (0, 2, 2), (2, 3, 3)], 0, 3).unwrap();
//! assert_eq!(cut.optimize(), 4);
//! let crossing: i64 = cut.cut_arcs().iter().map(|&(u, v)| match (u, v) {
//!     (0, 1) => 3,
//!     (1, 3) => 2,
//!     (0, 2) => 2,
//!     _ => 3,
//! }).sum();
//! assert_eq!(crossing, 4);
//!
//! let mut spf = ShortestPathsFinder::new();
//! spf.update_digraph(3, &[Arc::new(1, 2, 1), Arc::new(0, 1, 1)]).unwrap();
//! spf.find(0).unwrap();
//! assert_eq!(spf.path(2), vec![0, 1, 2]);
//! ```

pub mod arc_locator;
pub mod csr;
pub mod err;
pub mod flow;
pub mod shortest_path;

pub use err::{Error, Result};

// re-export petgraph so there is only one version in use
pub use petgraph;
