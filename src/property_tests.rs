//! Property-based checks over randomly generated graphs and partitions.
//!
//! These pin down the algebraic guarantees of the pipeline: score bounds,
//! weight conservation across aggregation, score preservation under
//! quotienting, and seed determinism.

use crate::graph::SparseGraph;
use crate::louvain::aggregate::aggregate;
use crate::louvain::Louvain;
use crate::modularity::modularity;
use crate::partition::Partition;
use proptest::prelude::*;

fn arb_graph() -> impl Strategy<Value = SparseGraph> {
    (1usize..12).prop_flat_map(|n| {
        proptest::collection::vec((0..n, 0..n, 0.1f64..4.0), 0..24)
            .prop_map(move |edges| SparseGraph::from_edges(n, &edges).unwrap())
    })
}

fn arb_graph_and_partition() -> impl Strategy<Value = (SparseGraph, Partition)> {
    (1usize..12).prop_flat_map(|n| {
        let edges = proptest::collection::vec((0..n, 0..n, 0.1f64..4.0), 0..24);
        // community ids deliberately sparse to exercise the hash-map path
        let labels = proptest::collection::vec((0..n).prop_map(|c| c * 13), n);
        (edges, labels).prop_map(move |(e, l)| {
            (
                SparseGraph::from_edges(n, &e).unwrap(),
                Partition::from_assignments(l),
            )
        })
    })
}

proptest! {
    #[test]
    fn modularity_is_bounded((graph, partition) in arb_graph_and_partition()) {
        let q = modularity(&graph, &partition, 1.0).unwrap();
        prop_assert!(q >= -1.0 - 1e-9);
        prop_assert!(q <= 1.0 + 1e-9);
    }

    #[test]
    fn one_community_scores_resolution_minus_one(graph in arb_graph()) {
        let all_in_one = Partition::from_assignments(vec![0; graph.len()]);
        let q = modularity(&graph, &all_in_one, 1.0).unwrap();
        if graph.total_weight() == 0.0 {
            prop_assert_eq!(q, 0.0);
        } else {
            prop_assert!((q - 0.0).abs() < 1e-9);
        }
    }

    #[test]
    fn aggregation_conserves_total_weight((graph, partition) in arb_graph_and_partition()) {
        let (aggregated, _) = aggregate(&graph, &partition).unwrap();
        prop_assert!((aggregated.total_weight() - graph.total_weight()).abs() <= 1e-9);
    }

    #[test]
    fn quotient_singletons_preserve_modularity((graph, partition) in arb_graph_and_partition()) {
        // scoring the quotient graph with every super-node alone must
        // reproduce the original partition's score
        let q_original = modularity(&graph, &partition, 1.0).unwrap();
        let (aggregated, _) = aggregate(&graph, &partition).unwrap();
        let q_quotient =
            modularity(&aggregated, &Partition::singletons(aggregated.len()), 1.0).unwrap();
        prop_assert!((q_original - q_quotient).abs() <= 1e-9);
    }

    #[test]
    fn aggregation_mapping_covers_all_nodes((graph, partition) in arb_graph_and_partition()) {
        let (aggregated, mapping) = aggregate(&graph, &partition).unwrap();
        prop_assert_eq!(mapping.len(), graph.len());
        prop_assert!(mapping.iter().all(|&c| c < aggregated.len()));
    }

    #[test]
    fn best_partition_never_loses_to_singletons(graph in arb_graph()) {
        let detector = Louvain::new().with_seed(11);
        let best = detector.best_partition(&graph).unwrap();
        let q_best = detector.modularity(&graph, &best).unwrap();
        let q_singletons = detector
            .modularity(&graph, &Partition::singletons(graph.len()))
            .unwrap();
        prop_assert!(q_best + 1e-9 >= q_singletons);
    }

    #[test]
    fn fixed_seed_reproduces_dendrograms(graph in arb_graph(), seed in any::<u64>()) {
        let detector = Louvain::new().with_seed(seed);
        let a = detector.find_partitions(&graph).unwrap();
        let b = detector.find_partitions(&graph).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn flat_partition_covers_every_original_node(graph in arb_graph()) {
        let flat = Louvain::new().with_seed(3).best_partition(&graph).unwrap();
        prop_assert_eq!(flat.len(), graph.len());
    }
}
