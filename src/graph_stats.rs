//! Statistics of recurrence networks.
//!
//! # Conventions
//!
//! - **Average path length** is taken over ordered pairs of distinct nodes
//!   that can reach each other. Unreachable pairs are left out and counted in
//!   [`PathLengthSummary`]; with no reachable pair at all the average is 0.
//! - **Transitivity** is `3 × triangles / connected triples`, 0 without triples.
//! - **Global clustering** is the mean local clustering coefficient over all
//!   nodes, nodes of degree < 2 contributing 0.
//! - **Assortativity** is Newman's degree correlation over edges, NaN when
//!   there are no edges or the endpoint degrees do not vary.

use rayon::prelude::*;
use std::collections::VecDeque;

use crate::network::RecurrenceNetwork;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Average shortest path length and how much of the graph it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathLengthSummary {
    /// Mean hop distance over reachable ordered pairs (0 if there are none).
    pub average: f64,
    /// Ordered pairs `(u, v)`, `u != v`, with a path between them.
    pub reachable_pairs: u64,
    /// Ordered pairs without a path.
    pub unreachable_pairs: u64,
}

impl PathLengthSummary {
    /// Whether every pair of nodes is connected.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.unreachable_pairs == 0
    }

    /// Fraction of ordered pairs that entered the average (1 for fewer than two nodes).
    #[must_use]
    pub fn coverage(&self) -> f64 {
        let total = self.reachable_pairs + self.unreachable_pairs;
        if total == 0 {
            1.0
        } else {
            self.reachable_pairs as f64 / total as f64
        }
    }
}

/// Hop distances from `source` to every node (`usize::MAX` when unreachable).
#[must_use]
pub fn bfs_distances(network: &RecurrenceNetwork, source: usize) -> Vec<usize> {
    let mut dist = vec![usize::MAX; network.node_count()];
    let mut queue = VecDeque::new();
    dist[source] = 0;
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let next = dist[v] + 1;
        for &w in network.neighbors(v) {
            if dist[w] == usize::MAX {
                dist[w] = next;
                queue.push_back(w);
            }
        }
    }
    dist
}

/// Average shortest path length over mutually reachable node pairs.
///
/// One BFS per source, sources processed in parallel. Sums are integers, so
/// the result does not depend on scheduling.
#[must_use]
pub fn average_path_length(network: &RecurrenceNetwork) -> PathLengthSummary {
    let n = network.node_count();
    let (total_hops, reachable) = (0..n)
        .into_par_iter()
        .map(|source| {
            bfs_distances(network, source)
                .into_iter()
                .enumerate()
                .filter(|&(target, d)| target != source && d != usize::MAX)
                .fold((0u64, 0u64), |(hops, count), (_, d)| (hops + d as u64, count + 1))
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    let all_pairs = (n as u64) * (n as u64).saturating_sub(1);
    PathLengthSummary {
        average: if reachable == 0 {
            0.0
        } else {
            total_hops as f64 / reachable as f64
        },
        reachable_pairs: reachable,
        unreachable_pairs: all_pairs - reachable,
    }
}

/// Number of links among the neighbours of `node`.
fn neighbor_links(network: &RecurrenceNetwork, node: usize) -> usize {
    let nbrs = network.neighbors(node);
    nbrs.iter()
        .enumerate()
        .map(|(k, &u)| nbrs[k + 1..].iter().filter(|&&w| network.has_edge(u, w)).count())
        .sum()
}

/// Local clustering coefficient of every node.
///
/// `C_v = links among neighbours / (k_v (k_v - 1) / 2)`, 0 for `k_v < 2`.
#[must_use]
pub fn local_clustering(network: &RecurrenceNetwork) -> Vec<f64> {
    (0..network.node_count())
        .into_par_iter()
        .map(|v| {
            let k = network.degree(v);
            if k < 2 {
                0.0
            } else {
                neighbor_links(network, v) as f64 / (k * (k - 1) / 2) as f64
            }
        })
        .collect()
}

/// Mean local clustering coefficient (0 for an empty graph).
#[must_use]
pub fn global_clustering(network: &RecurrenceNetwork) -> f64 {
    let local = local_clustering(network);
    if local.is_empty() {
        0.0
    } else {
        local.iter().sum::<f64>() / local.len() as f64
    }
}

/// Fraction of connected triples that close into triangles.
#[must_use]
pub fn transitivity(network: &RecurrenceNetwork) -> f64 {
    let (closed, triples) = (0..network.node_count())
        .into_par_iter()
        .map(|v| {
            let k = network.degree(v);
            if k < 2 {
                (0usize, 0usize)
            } else {
                (neighbor_links(network, v), k * (k - 1) / 2)
            }
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    if triples == 0 {
        0.0
    } else {
        closed as f64 / triples as f64
    }
}

/// Newman's degree assortativity coefficient.
///
/// With `M` edges `(u, v)` of endpoint degrees `j`, `k`:
///
/// ```text
/// r = (4M Σ jk − S²) / (2M Σ (j² + k²) − S²),   S = Σ (j + k)
/// ```
///
/// which is the Pearson correlation of endpoint degrees with every edge
/// counted in both directions. Evaluated in exact integer arithmetic.
/// Returns NaN for an edgeless graph or zero degree variance.
#[must_use]
pub fn assortativity(network: &RecurrenceNetwork) -> f64 {
    let degrees = network.degrees();
    let mut m: i128 = 0;
    let mut sum_prod: i128 = 0;
    let mut sum_deg: i128 = 0;
    let mut sum_sq: i128 = 0;

    for (u, v) in network.edges() {
        let j = degrees[u] as i128;
        let k = degrees[v] as i128;
        m += 1;
        sum_prod += j * k;
        sum_deg += j + k;
        sum_sq += j * j + k * k;
    }

    let numerator = 4 * m * sum_prod - sum_deg * sum_deg;
    let denominator = 2 * m * sum_sq - sum_deg * sum_deg;
    if m == 0 || denominator == 0 {
        return f64::NAN;
    }
    numerator as f64 / denominator as f64
}

/// Graph measures of a recurrence network.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NetworkMeasures {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Edge density.
    pub link_density: f64,
    /// Connected components, isolated nodes included.
    pub component_count: usize,
    /// Average path length with coverage.
    pub average_path_length: PathLengthSummary,
    /// Triangle-based transitivity.
    pub transitivity: f64,
    /// Mean local clustering.
    pub global_clustering: f64,
    /// Degree assortativity (NaN when undefined, `null` in serialized form).
    #[cfg_attr(feature = "serde", serde(with = "nan_as_null"))]
    pub assortativity: f64,
}

impl NetworkMeasures {
    /// Compute every measure of `network`.
    #[must_use]
    pub fn compute(network: &RecurrenceNetwork) -> Self {
        Self {
            node_count: network.node_count(),
            edge_count: network.edge_count(),
            link_density: network.link_density(),
            component_count: network.component_count(),
            average_path_length: average_path_length(network),
            transitivity: transitivity(network),
            global_clustering: global_clustering(network),
            assortativity: assortativity(network),
        }
    }
}

/// Maps NaN to `None` and back, since JSON has no NaN.
#[cfg(feature = "serde")]
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::RecurrenceMatrix;
    use approx::assert_relative_eq;

    fn network(n: usize, pairs: &[(usize, usize)]) -> RecurrenceNetwork {
        RecurrenceNetwork::from_matrix(&RecurrenceMatrix::from_pairs(n, pairs).unwrap())
    }

    fn complete(n: usize) -> RecurrenceNetwork {
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        network(n, &pairs)
    }

    #[test]
    fn test_path_graph() {
        let net = network(3, &[(0, 1), (1, 2)]);
        let apl = average_path_length(&net);

        assert_relative_eq!(apl.average, 4.0 / 3.0, epsilon = 1e-12);
        assert_eq!(apl.reachable_pairs, 6);
        assert!(apl.is_connected());
        assert_relative_eq!(transitivity(&net), 0.0);
        assert_relative_eq!(assortativity(&net), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bfs_distances() {
        let net = network(5, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(bfs_distances(&net, 0), vec![0, 1, 2, 3, usize::MAX]);
        assert_eq!(bfs_distances(&net, 4), vec![usize::MAX, usize::MAX, usize::MAX, usize::MAX, 0]);
    }

    #[test]
    fn test_complete_graph() {
        let net = complete(6);
        let measures = NetworkMeasures::compute(&net);

        assert_relative_eq!(measures.average_path_length.average, 1.0);
        assert!(measures.average_path_length.is_connected());
        assert_relative_eq!(measures.transitivity, 1.0);
        assert_relative_eq!(measures.global_clustering, 1.0);
        assert!(measures.assortativity.is_nan());
        assert_relative_eq!(measures.link_density, 1.0);
        assert_eq!(measures.component_count, 1);
    }

    #[test]
    fn test_disconnected_graph() {
        // Triangle plus an isolated node
        let net = network(4, &[(0, 1), (1, 2), (0, 2)]);
        let apl = average_path_length(&net);

        assert_relative_eq!(apl.average, 1.0);
        assert_eq!(apl.reachable_pairs, 6);
        assert_eq!(apl.unreachable_pairs, 6);
        assert!(!apl.is_connected());
        assert_relative_eq!(apl.coverage(), 0.5);

        assert_relative_eq!(transitivity(&net), 1.0);
        assert_relative_eq!(global_clustering(&net), 0.75);
        // All edge endpoints have degree 2
        assert!(assortativity(&net).is_nan());
    }

    #[test]
    fn test_two_components_path_lengths() {
        let net = network(6, &[(0, 1), (1, 2), (3, 4), (4, 5)]);
        let apl = average_path_length(&net);
        // Each path contributes 1+2+1 twice over its 6 ordered pairs
        assert_relative_eq!(apl.average, 4.0 / 3.0, epsilon = 1e-12);
        assert_eq!(apl.reachable_pairs, 12);
        assert_eq!(apl.unreachable_pairs, 18);
    }

    #[test]
    fn test_triangle_with_pendant() {
        let net = network(4, &[(0, 1), (1, 2), (0, 2), (0, 3)]);

        // Triples: 3 at node 0, 1 at nodes 1 and 2; closed: 3
        assert_relative_eq!(transitivity(&net), 0.6, epsilon = 1e-12);
        let local = local_clustering(&net);
        assert_relative_eq!(local[0], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(local[1], 1.0);
        assert_relative_eq!(local[3], 0.0);
        assert_relative_eq!(global_clustering(&net), 7.0 / 12.0, epsilon = 1e-12);

        let r = assortativity(&net);
        assert!(r < 0.0 && r >= -1.0);
    }

    #[test]
    fn test_star_is_disassortative() {
        let net = network(5, &[(0, 1), (0, 2), (0, 3), (0, 4)]);
        assert_relative_eq!(assortativity(&net), -1.0, epsilon = 1e-12);
        assert_relative_eq!(transitivity(&net), 0.0);
        assert_relative_eq!(global_clustering(&net), 0.0);
    }

    #[test]
    fn test_assortative_components() {
        // A triangle and a separate edge: high-degree nodes link to high-degree nodes
        let net = network(5, &[(0, 1), (1, 2), (0, 2), (3, 4)]);
        assert_relative_eq!(assortativity(&net), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_graph() {
        let net = network(4, &[]);
        let measures = NetworkMeasures::compute(&net);

        assert_eq!(measures.average_path_length.average, 0.0);
        assert_eq!(measures.average_path_length.reachable_pairs, 0);
        assert_eq!(measures.average_path_length.unreachable_pairs, 12);
        assert_eq!(measures.transitivity, 0.0);
        assert_eq!(measures.global_clustering, 0.0);
        assert!(measures.assortativity.is_nan());

        let none = NetworkMeasures::compute(&network(0, &[]));
        assert_eq!(none.average_path_length.average, 0.0);
        assert_relative_eq!(none.average_path_length.coverage(), 1.0);
        assert_eq!(none.global_clustering, 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_undefined_assortativity_serializes_as_null() {
        let measures = NetworkMeasures::compute(&complete(4));
        let json = serde_json::to_string(&measures).unwrap();
        assert!(json.contains("\"assortativity\":null"));

        let back: NetworkMeasures = serde_json::from_str(&json).unwrap();
        assert!(back.assortativity.is_nan());
        assert_eq!(back.edge_count, 6);

        let star = NetworkMeasures::compute(&network(4, &[(0, 1), (0, 2), (0, 3)]));
        let back: NetworkMeasures = serde_json::from_str(&serde_json::to_string(&star).unwrap()).unwrap();
        assert_eq!(back, star);
    }
}
