//! Sparse weighted undirected graphs in compressed-row form.
//!
//! [`SparseGraph`] is the input type for every algorithm in this crate. It
//! stores a symmetric adjacency structure: a row-offset array of length
//! `n + 1`, a flat neighbor array, and a parallel weight array. Every
//! off-diagonal edge `(i, j, w)` appears twice, once from each endpoint,
//! while self-loops are stored exactly once on their own row.
//!
//! Two conventions follow from the standard weighted-degree definition:
//!
//! - `degree(v)` counts a self-loop twice, matching the convention that a
//!   self-loop contributes two edge ends to its node.
//! - `total_weight()` is `m`, half the sum of all stored entries with
//!   self-loops counted twice. The two stored directions of an undirected
//!   edge therefore contribute its weight to `m` exactly once.
//!
//! Construction validates the symmetry invariant; algorithms downstream
//! rely on it without re-checking.

use crate::error::{GraphError, Result};
use ndarray::ArrayView2;
use std::collections::HashMap;

/// Immutable weighted undirected graph in compressed sparse row form.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseGraph {
    /// Row offsets, length `n + 1`.
    offsets: Vec<usize>,
    /// Flat neighbor ids, one entry per stored adjacency.
    targets: Vec<usize>,
    /// Weights parallel to `targets`.
    weights: Vec<f64>,
    /// Precomputed weighted degrees (self-loops counted twice).
    degrees: Vec<f64>,
    /// Precomputed total weight `m`.
    total_weight: f64,
}

impl SparseGraph {
    /// Build a graph from raw CSR arrays, validating the storage invariants.
    ///
    /// `offsets` must have length `n + 1`, start at zero, and be
    /// non-decreasing; `targets` and `weights` must both have length
    /// `offsets[n]`. Every off-diagonal entry must have a mirror entry with
    /// identical weight in the target's row.
    ///
    /// # Errors
    ///
    /// [`GraphError::EmptyGraph`] if `n == 0`,
    /// [`GraphError::InvalidShape`] for inconsistent arrays,
    /// [`GraphError::NodeOutOfRange`] for a target outside `[0, n)`,
    /// [`GraphError::InvalidWeight`] for a negative or non-finite weight,
    /// [`GraphError::AsymmetricEdge`] for a missing or mismatched mirror.
    pub fn from_csr(offsets: Vec<usize>, targets: Vec<usize>, weights: Vec<f64>) -> Result<Self> {
        if offsets.len() < 2 {
            return Err(GraphError::EmptyGraph.into());
        }
        let n = offsets.len() - 1;
        if offsets[0] != 0 {
            return Err(GraphError::InvalidShape {
                reason: "offsets must start at zero",
            }
            .into());
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return Err(GraphError::InvalidShape {
                reason: "offsets must be non-decreasing",
            }
            .into());
        }
        if offsets[n] != targets.len() {
            return Err(GraphError::InvalidShape {
                reason: "final offset must equal the number of stored entries",
            }
            .into());
        }
        if targets.len() != weights.len() {
            return Err(GraphError::InvalidShape {
                reason: "targets and weights must have equal length",
            }
            .into());
        }

        for v in 0..n {
            for idx in offsets[v]..offsets[v + 1] {
                let u = targets[idx];
                let w = weights[idx];
                if u >= n {
                    return Err(GraphError::NodeOutOfRange { node: u, len: n }.into());
                }
                if !w.is_finite() || w < 0.0 {
                    return Err(GraphError::InvalidWeight {
                        node: v,
                        neighbor: u,
                        weight: w,
                    }
                    .into());
                }
            }
        }

        // Symmetry: each off-diagonal row segment must be mirrored entry
        // for entry (equal count, equal total weight) by the target's row.
        for v in 0..n {
            for idx in offsets[v]..offsets[v + 1] {
                let u = targets[idx];
                if u == v {
                    continue;
                }
                let (fwd_count, fwd_sum) = scan_row(&offsets, &targets, &weights, v, u);
                let (bwd_count, bwd_sum) = scan_row(&offsets, &targets, &weights, u, v);
                if fwd_count != bwd_count || fwd_sum != bwd_sum {
                    return Err(GraphError::AsymmetricEdge {
                        node: v,
                        neighbor: u,
                    }
                    .into());
                }
            }
        }

        Ok(Self::finish(offsets, targets, weights))
    }

    /// Build a graph from an undirected edge list.
    ///
    /// Each edge may be given once in either orientation; duplicates
    /// accumulate their weights. Self-loops are allowed. The symmetric
    /// mirror entries are created here, so the invariants hold by
    /// construction.
    ///
    /// # Errors
    ///
    /// [`GraphError::EmptyGraph`] if `n == 0`,
    /// [`GraphError::NodeOutOfRange`] for an endpoint outside `[0, n)`,
    /// [`GraphError::InvalidWeight`] for a negative or non-finite weight.
    pub fn from_edges(n: usize, edges: &[(usize, usize, f64)]) -> Result<Self> {
        if n == 0 {
            return Err(GraphError::EmptyGraph.into());
        }

        let mut merged: HashMap<(usize, usize), f64> = HashMap::with_capacity(edges.len());
        for &(u, v, w) in edges {
            if u >= n {
                return Err(GraphError::NodeOutOfRange { node: u, len: n }.into());
            }
            if v >= n {
                return Err(GraphError::NodeOutOfRange { node: v, len: n }.into());
            }
            if !w.is_finite() || w < 0.0 {
                return Err(GraphError::InvalidWeight {
                    node: u,
                    neighbor: v,
                    weight: w,
                }
                .into());
            }
            let key = if u <= v { (u, v) } else { (v, u) };
            *merged.entry(key).or_insert(0.0) += w;
        }

        // Counting sort into CSR. Sorting the merged edges first keeps the
        // row layout independent of hash iteration order.
        let mut sorted: Vec<((usize, usize), f64)> = merged.into_iter().collect();
        sorted.sort_unstable_by_key(|&(key, _)| key);

        let mut counts = vec![0usize; n];
        for &((u, v), _) in &sorted {
            counts[u] += 1;
            if u != v {
                counts[v] += 1;
            }
        }

        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0);
        let mut running = 0;
        for &c in &counts {
            running += c;
            offsets.push(running);
        }

        let mut cursor: Vec<usize> = offsets[..n].to_vec();
        let mut targets = vec![0usize; running];
        let mut weights = vec![0.0f64; running];
        for ((u, v), w) in sorted {
            targets[cursor[u]] = v;
            weights[cursor[u]] = w;
            cursor[u] += 1;
            if u != v {
                targets[cursor[v]] = u;
                weights[cursor[v]] = w;
                cursor[v] += 1;
            }
        }

        Ok(Self::finish(offsets, targets, weights))
    }

    /// Build a graph from a dense adjacency matrix.
    ///
    /// The matrix must be square and symmetric; a diagonal entry is taken
    /// as the weight of a self-loop. Zero entries are absent edges.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidShape`] for a non-square matrix,
    /// [`GraphError::EmptyGraph`] for a `0 x 0` matrix,
    /// [`GraphError::InvalidWeight`] for a negative or non-finite entry,
    /// [`GraphError::AsymmetricEdge`] if `a[i][j] != a[j][i]`.
    pub fn from_dense(adjacency: ArrayView2<'_, f64>) -> Result<Self> {
        let (rows, cols) = adjacency.dim();
        if rows != cols {
            return Err(GraphError::InvalidShape {
                reason: "adjacency matrix must be square",
            }
            .into());
        }
        if rows == 0 {
            return Err(GraphError::EmptyGraph.into());
        }

        let mut edges = Vec::new();
        for i in 0..rows {
            for j in i..cols {
                let w = adjacency[[i, j]];
                if !w.is_finite() || w < 0.0 {
                    return Err(GraphError::InvalidWeight {
                        node: i,
                        neighbor: j,
                        weight: w,
                    }
                    .into());
                }
                if adjacency[[j, i]] != w {
                    return Err(GraphError::AsymmetricEdge {
                        node: i,
                        neighbor: j,
                    }
                    .into());
                }
                if w != 0.0 {
                    edges.push((i, j, w));
                }
            }
        }

        Self::from_edges(rows, &edges)
    }

    fn finish(offsets: Vec<usize>, targets: Vec<usize>, weights: Vec<f64>) -> Self {
        let n = offsets.len() - 1;
        let mut degrees = vec![0.0; n];
        for v in 0..n {
            let mut d = 0.0;
            for idx in offsets[v]..offsets[v + 1] {
                d += weights[idx];
                if targets[idx] == v {
                    // a self-loop contributes both of its edge ends
                    d += weights[idx];
                }
            }
            degrees[v] = d;
        }
        let total_weight = 0.5 * degrees.iter().sum::<f64>();

        Self {
            offsets,
            targets,
            weights,
            degrees,
            total_weight,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether the graph has no nodes. Construction rejects empty graphs,
    /// so this is always `false` for a constructed graph.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of undirected edges, counting self-loops once.
    pub fn edge_count(&self) -> usize {
        let mut loops = 0;
        for v in 0..self.len() {
            loops += self.row(v).0.iter().filter(|&&u| u == v).count();
        }
        (self.targets.len() + loops) / 2
    }

    /// The neighbor and weight slices for one node's row.
    ///
    /// Self-loop entries are included. This is the zero-cost access path
    /// used by the optimizer's hot loop.
    #[inline]
    pub fn row(&self, node: usize) -> (&[usize], &[f64]) {
        let start = self.offsets[node];
        let end = self.offsets[node + 1];
        (&self.targets[start..end], &self.weights[start..end])
    }

    /// Iterate over `(neighbor, weight)` pairs of a node, self-loops included.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (nbrs, ws) = self.row(node);
        nbrs.iter().copied().zip(ws.iter().copied())
    }

    /// Weighted degree of a node, self-loops counted twice.
    #[inline]
    pub fn degree(&self, node: usize) -> f64 {
        self.degrees[node]
    }

    /// Total self-loop weight on a node, counted once.
    pub fn self_loop(&self, node: usize) -> f64 {
        let (nbrs, ws) = self.row(node);
        nbrs.iter()
            .zip(ws)
            .filter(|&(&u, _)| u == node)
            .map(|(_, &w)| w)
            .sum()
    }

    /// Total weight `m` of the graph.
    #[inline]
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }
}

fn scan_row(
    offsets: &[usize],
    targets: &[usize],
    weights: &[f64],
    row: usize,
    target: usize,
) -> (usize, f64) {
    let mut count = 0;
    let mut sum = 0.0;
    for idx in offsets[row]..offsets[row + 1] {
        if targets[idx] == target {
            count += 1;
            sum += weights[idx];
        }
    }
    (count, sum)
}
