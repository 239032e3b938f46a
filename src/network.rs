//! Recurrence networks.
//!
//! A [`RecurrenceNetwork`] reinterprets a recurrence matrix as the adjacency
//! matrix of an undirected, unweighted simple graph: one node per embedded
//! state, one edge per recurrent pair. Isolated states stay in the graph as
//! degree-0 nodes.

use rayon::prelude::*;

use crate::distance::pair_count;
use crate::recurrence::RecurrenceMatrix;

/// Undirected simple graph derived from a [`RecurrenceMatrix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceNetwork {
    /// Sorted neighbour list per node.
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl RecurrenceNetwork {
    /// Derive the network of `matrix`.
    ///
    /// Each node's row is scanned independently (in parallel); neighbour lists
    /// come out sorted by node index.
    #[must_use]
    pub fn from_matrix(matrix: &RecurrenceMatrix) -> Self {
        let n = matrix.size();
        let adjacency: Vec<Vec<usize>> = (0..n)
            .into_par_iter()
            .map(|i| (0..n).filter(|&j| matrix.get(i, j)).collect())
            .collect();

        Self {
            adjacency,
            edge_count: matrix.pair_count(),
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Sorted neighbours of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    /// Whether `a` and `b` are linked.
    ///
    /// # Panics
    ///
    /// Panics if `a` is out of bounds.
    #[must_use]
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].binary_search(&b).is_ok()
    }

    /// Degree of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Degree sequence in node order.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }

    /// Edges `(i, j)` with `i < j`, in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, nbrs)| {
            nbrs.iter().copied().filter(move |&j| j > i).map(move |j| (i, j))
        })
    }

    /// Fraction of possible edges present, `2E / (N(N-1))`; 0 for `N < 2`.
    #[must_use]
    pub fn link_density(&self) -> f64 {
        let possible = pair_count(self.node_count());
        if possible == 0 {
            0.0
        } else {
            self.edge_count as f64 / possible as f64
        }
    }

    /// Connected component label per node, labels numbered from 0 in order of
    /// their smallest node.
    #[must_use]
    pub fn component_labels(&self) -> Vec<usize> {
        let n = self.node_count();
        let mut labels = vec![usize::MAX; n];
        let mut stack = Vec::new();
        let mut next = 0;

        for start in 0..n {
            if labels[start] != usize::MAX {
                continue;
            }
            labels[start] = next;
            stack.push(start);
            while let Some(v) = stack.pop() {
                for &w in &self.adjacency[v] {
                    if labels[w] == usize::MAX {
                        labels[w] = next;
                        stack.push(w);
                    }
                }
            }
            next += 1;
        }
        labels
    }

    /// Number of connected components (isolated nodes count as one each).
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.component_labels()
            .into_iter()
            .max()
            .map_or(0, |max| max + 1)
    }
}

impl From<&RecurrenceMatrix> for RecurrenceNetwork {
    fn from(matrix: &RecurrenceMatrix) -> Self {
        Self::from_matrix(matrix)
    }
}
