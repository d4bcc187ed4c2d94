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

//! Error type shared by both engines.
//!
//! Every variant describes a malformed input handed to a constructor or an
//! update call. None of them is transient: retrying with the same input
//! fails the same way.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An arc whose tail and head are the same node.
    #[error("arc ({node},{node}) specified (self arc)")]
    SelfLoop { node: usize },

    /// The same ordered pair was given twice.
    #[error("arc ({tail},{head}) specified twice")]
    DuplicateArc { tail: usize, head: usize },

    #[error("source and sink are the same node ({0})")]
    SourceIsSink(usize),

    #[error("arc ({tail},{head}) has a negative capacity")]
    NegativeCapacity { tail: usize, head: usize },

    /// Parallel input arrays of different lengths.
    #[error("input arrays have mismatched lengths: {tails} tails, {heads} heads, {capacities} capacities")]
    LengthMismatch {
        tails: usize,
        heads: usize,
        capacities: usize,
    },

    /// Capacities large enough that the flow could overflow the capacity
    /// type.
    #[error("capacities at node {node} can overflow the capacity type")]
    CapacityOverflow { node: usize },

    #[error("node {node} out of range for a graph with {node_count} nodes")]
    NodeOutOfRange { node: usize, node_count: usize },

    #[error("arc ({tail},{head}) does not exist")]
    ArcNotFound { tail: usize, head: usize },

    /// A weight that could overflow when added to a finite distance.
    #[error("weight {weight} of arc ({tail},{head}) exceeds the distance sentinel")]
    WeightOutOfRange {
        tail: usize,
        head: usize,
        weight: i32,
    },

    #[error("invalid adjacency arrays: {0}")]
    InvalidAdjacency(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
