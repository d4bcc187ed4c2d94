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

use ndarray::Array2;

use super::{Distance, Neighbor, INFINITY};
use crate::csr::Csr;

/// Dense all-pairs distance and predecessor matrices.
///
/// `prev[[i, j]]` is `Some(i)` when the best known `i -> j` path is the
/// direct arc, `Some(k)` when it goes through the intermediate node `k`, and
/// `None` when `j` is unreachable from `i` (or `i == j`). The matrices are
/// kept between solves and only reallocated for a larger graph.
#[derive(Debug, Clone)]
pub(crate) struct AllPairs {
    dist: Array2<Distance>,
    prev: Array2<Option<usize>>,
    nodes: usize,
    ran: bool,
}

impl Default for AllPairs {
    fn default() -> Self {
        AllPairs {
            dist: Array2::from_elem((0, 0), INFINITY),
            prev: Array2::from_elem((0, 0), None),
            nodes: 0,
            ran: false,
        }
    }
}

impl AllPairs {
    pub fn ran(&self) -> bool {
        self.ran
    }

    /// Marks the matrices stale after the graph changed.
    pub fn invalidate(&mut self) {
        self.ran = false;
    }

    pub fn solve(&mut self, graph: &Csr<Neighbor>) {
        let n = graph.node_count();
        if self.dist.nrows() < n {
            self.dist = Array2::from_elem((n, n), INFINITY);
            self.prev = Array2::from_elem((n, n), None);
        }
        self.nodes = n;

        let dist = &mut self.dist;
        let prev = &mut self.prev;
        for i in 0..n {
            for j in 0..n {
                dist[[i, j]] = INFINITY;
                prev[[i, j]] = None;
            }
            dist[[i, i]] = 0;
        }
        for i in 0..n {
            for nb in graph.out_arcs(i) {
                if nb.weight < dist[[i, nb.head]] {
                    dist[[i, nb.head]] = nb.weight;
                    prev[[i, nb.head]] = Some(i);
                }
            }
        }

        for k in 0..n {
            for i in 0..n {
                let dik = dist[[i, k]];
                if dik >= INFINITY {
                    continue;
                }
                for j in 0..n {
                    let via = dik + dist[[k, j]];
                    if via < dist[[i, j]] {
                        dist[[i, j]] = via;
                        prev[[i, j]] = Some(k);
                    }
                }
            }
        }
        self.ran = true;
    }

    /// Length of the shortest `from -> to` path, `INFINITY` when there is
    /// none or no solve happened since the last graph change.
    pub fn dist(&self, from: usize, to: usize) -> Distance {
        assert!(
            from < self.nodes && to < self.nodes,
            "node out of range for all-pairs matrices of {} nodes",
            self.nodes
        );
        if self.ran {
            self.dist[[from, to]]
        } else {
            INFINITY
        }
    }

    /// Writes the shortest `from -> to` path into `out`, both ends included,
    /// and returns its number of nodes. Writes nothing and returns 0 when
    /// `to` is unreachable or equal to `from`.
    pub fn path_into(&self, from: usize, to: usize, out: &mut Vec<usize>) -> usize {
        out.clear();
        if !self.ran || from == to {
            return 0;
        }
        assert!(
            from < self.nodes && to < self.nodes,
            "node out of range for all-pairs matrices of {} nodes",
            self.nodes
        );
        if self.prev[[from, to]].is_none() {
            return 0;
        }

        out.push(from);
        let mut segments = vec![(from, to)];
        while let Some((a, b)) = segments.pop() {
            match self.prev[[a, b]] {
                Some(k) if k == a => out.push(b),
                Some(k) => {
                    segments.push((k, b));
                    segments.push((a, k));
                }
                None => {
                    out.clear();
                    return 0;
                }
            }
        }
        out.len()
    }
}
