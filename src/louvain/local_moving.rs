//! Single-level greedy modularity optimization.
//!
//! Starting from singleton communities, repeatedly move each node to the
//! neighboring community with the highest modularity gain until a full
//! pass commits no move. Community aggregates (total degree and internal
//! weight) are maintained incrementally; the per-node accumulation uses a
//! touched-list scratch buffer so the inner loop performs no allocation
//! and no hashing.

use crate::graph::SparseGraph;
use crate::partition::Partition;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::time::Instant;

pub(crate) struct MoveOpts {
    pub resolution: f64,
    pub min_gain: f64,
    pub max_passes: u32,
    pub deadline: Option<Instant>,
}

pub(crate) struct LevelOutcome {
    /// Refined partition, community ids compacted to `[0, communities)`.
    pub partition: Partition,
    /// Number of non-empty communities.
    pub communities: usize,
    /// Modularity of the refined partition at the configured resolution.
    pub modularity: f64,
    /// Full passes performed.
    pub passes: u32,
}

/// Optimize one level. Nodes are visited in a permutation of `[0, n)`,
/// re-shuffled every pass when a PRNG is supplied.
pub(crate) fn refine(
    graph: &SparseGraph,
    opts: &MoveOpts,
    mut rng: Option<&mut StdRng>,
) -> LevelOutcome {
    let n = graph.len();
    let m = graph.total_weight();

    if m == 0.0 {
        // nothing to optimize; every node stays alone
        return LevelOutcome {
            partition: Partition::singletons(n),
            communities: n,
            modularity: 0.0,
            passes: 0,
        };
    }

    let mut assignment: Vec<usize> = (0..n).collect();

    // Per-community aggregates. Ids never leave [0, n) within a level, so
    // dense arrays replace the hash map a general scorer needs.
    let mut deg: Vec<f64> = (0..n).map(|v| graph.degree(v)).collect();
    let mut inc: Vec<f64> = (0..n).map(|v| graph.self_loop(v)).collect();

    // Scratch accumulator for the weights from one node to each adjacent
    // community, reset via the touched list after every node.
    let mut neigh_weight = vec![0.0f64; n];
    let mut is_adjacent = vec![false; n];
    let mut touched: Vec<usize> = Vec::with_capacity(64);

    let mut order: Vec<usize> = (0..n).collect();

    let inv_m = 1.0 / m;
    let inv_two_m_sq = 1.0 / (2.0 * m * m);

    let mut passes = 0u32;
    while passes < opts.max_passes {
        // checked between passes so aggregates are never left half-updated
        if opts.deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        if let Some(r) = rng.as_mut() {
            order.shuffle(&mut **r);
        }

        let mut moves = 0usize;
        for &v in &order {
            let c_old = assignment[v];
            let k_v = graph.degree(v);

            let (nbrs, ws) = graph.row(v);
            let mut loop_w = 0.0;
            for (idx, &u) in nbrs.iter().enumerate() {
                if u == v {
                    loop_w += ws[idx];
                    continue;
                }
                let c = assignment[u];
                if !is_adjacent[c] {
                    is_adjacent[c] = true;
                    touched.push(c);
                }
                neigh_weight[c] += ws[idx];
            }

            // take v out of its community
            let k_old = neigh_weight[c_old];
            deg[c_old] -= k_v;
            inc[c_old] -= k_old + loop_w;

            let stay = k_old * inv_m - opts.resolution * k_v * deg[c_old] * inv_two_m_sq;
            let mut best_c = c_old;
            let mut best_gain = stay;
            for &c in &touched {
                if c == c_old {
                    continue;
                }
                let gain =
                    neigh_weight[c] * inv_m - opts.resolution * k_v * deg[c] * inv_two_m_sq;
                if gain > best_gain {
                    best_gain = gain;
                    best_c = c;
                }
            }

            if best_c != c_old && best_gain - stay > opts.min_gain {
                assignment[v] = best_c;
                deg[best_c] += k_v;
                inc[best_c] += neigh_weight[best_c] + loop_w;
                moves += 1;
            } else {
                deg[c_old] += k_v;
                inc[c_old] += k_old + loop_w;
            }

            for &c in &touched {
                neigh_weight[c] = 0.0;
                is_adjacent[c] = false;
            }
            touched.clear();
        }

        passes += 1;
        if moves == 0 {
            break;
        }
    }

    let modularity = score(&deg, &inc, m, opts.resolution);

    let mut partition = Partition::from_assignments(assignment);
    let communities = partition.renumber();
    LevelOutcome {
        partition,
        communities,
        modularity,
        passes,
    }
}

/// Fold the maintained aggregates into Q. Empty communities hold zeros and
/// contribute nothing.
fn score(deg: &[f64], inc: &[f64], m: f64, resolution: f64) -> f64 {
    let two_m = 2.0 * m;
    deg.iter()
        .zip(inc)
        .map(|(&d, &i)| {
            let expected = d / two_m;
            resolution * (i / m) - expected * expected
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modularity::modularity;

    fn opts() -> MoveOpts {
        MoveOpts {
            resolution: 1.0,
            min_gain: 1e-7,
            max_passes: u32::MAX,
            deadline: None,
        }
    }

    #[test]
    fn test_two_disjoint_edges_pair_up() {
        let g = SparseGraph::from_edges(4, &[(0, 1, 1.0), (2, 3, 1.0)]).unwrap();
        let out = refine(&g, &opts(), None);

        assert_eq!(out.communities, 2);
        let p = out.partition.as_slice();
        assert_eq!(p[0], p[1]);
        assert_eq!(p[2], p[3]);
        assert_ne!(p[0], p[2]);
        assert!((out.modularity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_edgeless_graph_is_a_fixed_point() {
        let g = SparseGraph::from_edges(3, &[]).unwrap();
        let out = refine(&g, &opts(), None);
        assert_eq!(out.communities, 3);
        assert_eq!(out.partition.as_slice(), &[0, 1, 2]);
        assert_eq!(out.passes, 0);
    }

    #[test]
    fn test_max_passes_zero_leaves_singletons() {
        let g = SparseGraph::from_edges(4, &[(0, 1, 1.0), (2, 3, 1.0)]).unwrap();
        let out = refine(
            &g,
            &MoveOpts {
                max_passes: 0,
                ..opts()
            },
            None,
        );
        assert_eq!(out.communities, 4);
        assert_eq!(out.partition.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_reported_modularity_matches_scorer() {
        let g = SparseGraph::from_edges(
            6,
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (0, 2, 1.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (3, 5, 1.0),
                (2, 3, 1.0),
            ],
        )
        .unwrap();
        let out = refine(&g, &opts(), None);
        let rescored = modularity(&g, &out.partition, 1.0).unwrap();
        assert!((out.modularity - rescored).abs() < 1e-12);
    }

    #[test]
    fn test_expired_deadline_returns_singletons() {
        let g = SparseGraph::from_edges(4, &[(0, 1, 1.0), (2, 3, 1.0)]).unwrap();
        let out = refine(
            &g,
            &MoveOpts {
                deadline: Some(Instant::now()),
                ..opts()
            },
            None,
        );
        assert_eq!(out.communities, 4);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        use rand::SeedableRng;

        let g = SparseGraph::from_edges(
            6,
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (0, 2, 1.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (3, 5, 1.0),
            ],
        )
        .unwrap();

        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let out_a = refine(&g, &opts(), Some(&mut a));
        let out_b = refine(&g, &opts(), Some(&mut b));
        assert_eq!(out_a.partition, out_b.partition);
    }
}
