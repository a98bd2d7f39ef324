//! Graph aggregation: collapse a partition into its quotient graph.
//!
//! Communities become super-nodes. Edge weight between two communities is
//! the sum of the weights of edges crossing them; weight internal to a
//! community becomes a self-loop on its super-node. Total weight is
//! conserved exactly, which is the primary correctness check for this
//! phase.

use crate::error::{PartitionError, Result};
use crate::graph::SparseGraph;
use crate::partition::Partition;
use std::collections::HashMap;

/// Build the quotient graph of `partition` over `graph`.
///
/// Returns the aggregated graph and the node to super-node mapping, with
/// super-node ids compacted to `[0, k)` in first-seen order.
pub(crate) fn aggregate(
    graph: &SparseGraph,
    partition: &Partition,
) -> Result<(SparseGraph, Vec<usize>)> {
    if partition.len() != graph.len() {
        return Err(PartitionError::ShapeMismatch {
            expected: graph.len(),
            found: partition.len(),
        }
        .into());
    }

    let mut mapping = Partition::from_assignments(partition.as_slice().to_vec());
    let k = mapping.renumber();
    let mapping = mapping.into_vec();

    // Each stored entry is visited once: off-diagonal entries from their
    // smaller endpoint, self-loops on their own row.
    let mut quotient: HashMap<(usize, usize), f64> = HashMap::new();
    for v in 0..graph.len() {
        let (nbrs, ws) = graph.row(v);
        for (idx, &u) in nbrs.iter().enumerate() {
            if u < v {
                continue;
            }
            let cv = mapping[v];
            let cu = mapping[u];
            let key = if cv <= cu { (cv, cu) } else { (cu, cv) };
            *quotient.entry(key).or_insert(0.0) += ws[idx];
        }
    }

    let mut edges: Vec<(usize, usize, f64)> = quotient
        .into_iter()
        .map(|((a, b), w)| (a, b, w))
        .collect();
    edges.sort_unstable_by_key(|&(a, b, _)| (a, b));

    let aggregated = SparseGraph::from_edges(k, &edges)?;
    debug_assert!((aggregated.total_weight() - graph.total_weight()).abs() <= 1e-9);

    Ok((aggregated, mapping))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_conserved() {
        let g = SparseGraph::from_edges(
            5,
            &[
                (0, 1, 1.5),
                (1, 2, 2.0),
                (2, 3, 0.5),
                (3, 4, 1.0),
                (0, 0, 0.25),
            ],
        )
        .unwrap();
        let p = Partition::from_assignments(vec![0, 0, 1, 1, 1]);
        let (agg, _) = aggregate(&g, &p).unwrap();
        assert!((agg.total_weight() - g.total_weight()).abs() <= 1e-9);
    }

    #[test]
    fn test_internal_edges_become_self_loops() {
        // two pairs joined by one cross edge
        let g = SparseGraph::from_edges(
            4,
            &[(0, 1, 3.0), (2, 3, 2.0), (1, 2, 1.0)],
        )
        .unwrap();
        let p = Partition::from_assignments(vec![0, 0, 1, 1]);
        let (agg, mapping) = aggregate(&g, &p).unwrap();

        assert_eq!(agg.len(), 2);
        assert_eq!(mapping, vec![0, 0, 1, 1]);
        assert_eq!(agg.self_loop(0), 3.0);
        assert_eq!(agg.self_loop(1), 2.0);
        // cross edge survives with its weight
        assert!(agg.neighbors(0).any(|(u, w)| u == 1 && w == 1.0));
        assert_eq!(agg.total_weight(), g.total_weight());
    }

    #[test]
    fn test_noncontiguous_ids_are_compacted() {
        let g = SparseGraph::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
        let p = Partition::from_assignments(vec![40, 40, 9]);
        let (agg, mapping) = aggregate(&g, &p).unwrap();
        assert_eq!(agg.len(), 2);
        assert_eq!(mapping, vec![0, 0, 1]);
    }

    #[test]
    fn test_existing_self_loops_fold_in() {
        let g = SparseGraph::from_edges(2, &[(0, 0, 1.0), (0, 1, 2.0), (1, 1, 0.5)]).unwrap();
        let p = Partition::from_assignments(vec![0, 0]);
        let (agg, _) = aggregate(&g, &p).unwrap();
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.self_loop(0), 3.5);
        assert_eq!(agg.total_weight(), g.total_weight());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let g = SparseGraph::from_edges(3, &[(0, 1, 1.0)]).unwrap();
        let p = Partition::singletons(2);
        assert!(aggregate(&g, &p).is_err());
    }

    #[test]
    fn test_identity_partition_reproduces_graph() {
        let g = SparseGraph::from_edges(3, &[(0, 1, 1.0), (1, 2, 2.0), (0, 0, 0.5)]).unwrap();
        let p = Partition::singletons(3);
        let (agg, mapping) = aggregate(&g, &p).unwrap();
        assert_eq!(agg, g);
        assert_eq!(mapping, vec![0, 1, 2]);
    }
}
