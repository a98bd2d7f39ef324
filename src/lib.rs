//! # cohort
//!
//! Multi-level Louvain community detection over sparse weighted graphs.
//!
//! Given an undirected weighted graph, find natural groupings where nodes
//! within groups are densely connected and connections between groups are
//! sparse, by greedily maximizing **modularity** across repeated rounds of
//! local moving and graph aggregation.
//!
//! ## Pieces
//!
//! - [`SparseGraph`]: immutable CSR graph, the input to everything here.
//! - [`Louvain`]: the multi-level optimizer, configured builder-style.
//! - [`Dendrogram`]: one partition per aggregation level, composable into
//!   a flat [`Partition`] of the original nodes.
//! - [`modularity`]: the scoring function the optimizer maximizes.
//!
//! ## Usage
//!
//! ```rust
//! use cohort::{Louvain, SparseGraph};
//!
//! // two triangles joined by a single bridge
//! let graph = SparseGraph::from_edges(
//!     6,
//!     &[
//!         (0, 1, 1.0),
//!         (1, 2, 1.0),
//!         (0, 2, 1.0),
//!         (3, 4, 1.0),
//!         (4, 5, 1.0),
//!         (3, 5, 1.0),
//!         (2, 3, 1.0),
//!     ],
//! )
//! .unwrap();
//!
//! let partition = Louvain::new().with_seed(7).best_partition(&graph).unwrap();
//! assert_eq!(partition.community_count(), 2);
//! ```
//!
//! Interop with `petgraph` goes through the [`CommunityDetection`] trait;
//! callers with non-integer node ids build through
//! [`LabeledGraphBuilder`] and get their keys back in the result.

pub mod dendrogram;
/// Error types used across `cohort`.
pub mod error;
pub mod graph;
pub mod labeled;
pub mod louvain;
pub mod modularity;
pub mod partition;
pub mod traits;

#[cfg(test)]
mod property_tests;

pub use dendrogram::Dendrogram;
pub use error::{ConfigError, Error, GraphError, PartitionError, Result};
pub use graph::SparseGraph;
pub use labeled::LabeledGraphBuilder;
pub use louvain::Louvain;
pub use modularity::modularity;
pub use partition::Partition;
pub use traits::CommunityDetection;
