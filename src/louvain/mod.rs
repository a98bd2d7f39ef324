//! Louvain algorithm for community detection.
//!
//! Fast modularity optimization through local node moves and graph
//! aggregation.
//!
//! ## The Algorithm (Blondel et al. 2008)
//!
//! Louvain is a multi-level, greedy modularity optimization algorithm:
//!
//! 1. **Phase 1 (Local Moving)**: Start with each node in its own
//!    community. Repeatedly move nodes to the neighboring community with
//!    the highest modularity gain until no move improves.
//!
//! 2. **Phase 2 (Aggregation)**: Build a quotient graph where communities
//!    become single nodes. Edge weights are sums of edges between
//!    communities. Self-loops represent internal community edges.
//!
//! 3. **Iterate**: Repeat phases 1-2 on the quotient graph until a level
//!    merges nothing.
//!
//! The partitions produced at each level form a [`Dendrogram`]; composing
//! its levels yields the final flat partition over the original nodes.
//!
//! ## Determinism
//!
//! With `randomize` enabled, the traversal permutation is drawn from a
//! PRNG seeded once per run. A fixed seed reproduces the exact dendrogram;
//! without a seed, each run draws fresh entropy. With `randomize`
//! disabled, nodes are visited in id order.
//!
//! ## Bounds
//!
//! Optimization is anytime-capable. `max_passes`, `max_levels`, and a
//! wall-clock `deadline` all stop the run gracefully with the best
//! partition found so far rather than an error.
//!
//! ## References
//!
//! Blondel et al. (2008). "Fast unfolding of communities in large
//! networks." Journal of Statistical Mechanics: Theory and Experiment,
//! P10008.

pub(crate) mod aggregate;
pub(crate) mod local_moving;

use crate::dendrogram::Dendrogram;
use crate::error::{GraphError, Result};
use crate::graph::SparseGraph;
use crate::labeled::LabeledGraphBuilder;
use crate::modularity::{self, validate_resolution};
use crate::partition::Partition;
use crate::traits::CommunityDetection;
use local_moving::MoveOpts;
use log::debug;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Louvain community detection.
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Resolution parameter (gamma).
    resolution: f64,
    /// Visit nodes in a random permutation rather than id order.
    randomize: bool,
    /// PRNG seed; `None` draws fresh entropy per run.
    seed: Option<u64>,
    /// Minimum modularity improvement for a node move to commit.
    min_gain: f64,
    /// Maximum local-moving passes per level.
    max_passes: u32,
    /// Maximum aggregation levels.
    max_levels: usize,
    /// Wall-clock budget for one run.
    deadline: Option<Duration>,
}

impl Louvain {
    /// Create a detector with default settings.
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            randomize: true,
            seed: None,
            min_gain: 1e-7,
            max_passes: u32::MAX,
            max_levels: usize::MAX,
            deadline: None,
        }
    }

    /// Set resolution parameter.
    ///
    /// Higher values produce smaller communities.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Enable or disable randomized traversal order.
    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    /// Set the PRNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set minimum modularity gain for a move to commit.
    pub fn with_min_gain(mut self, min_gain: f64) -> Self {
        self.min_gain = min_gain;
        self
    }

    /// Bound the number of local-moving passes per level.
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Bound the number of aggregation levels.
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    /// Set a wall-clock budget; on expiry the run returns the best
    /// partition found so far.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Run the full multi-level optimization, returning one partition per
    /// aggregation level, finest first.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NonPositiveResolution`](crate::ConfigError::NonPositiveResolution)
    /// for an invalid resolution. Bounds (`max_passes`, `max_levels`,
    /// `deadline`) are not errors; they stop the run early with whatever
    /// was found.
    pub fn find_partitions(&self, graph: &SparseGraph) -> Result<Dendrogram> {
        validate_resolution(self.resolution)?;

        let deadline = self.deadline.map(|d| Instant::now() + d);
        let opts = MoveOpts {
            resolution: self.resolution,
            min_gain: self.min_gain,
            max_passes: self.max_passes,
            deadline,
        };
        let mut rng: Option<StdRng> = if self.randomize {
            Some(match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_rng(&mut rand::rng()),
            })
        } else {
            None
        };

        let mut dendrogram = Dendrogram::new(graph.len());
        // The driver owns each aggregated graph and drops it as soon as
        // the next level's graph replaces it; the caller's graph is only
        // borrowed.
        let mut owned: Option<SparseGraph> = None;

        loop {
            let level_graph = owned.as_ref().unwrap_or(graph);
            let outcome = local_moving::refine(level_graph, &opts, rng.as_mut());
            debug!(
                "level {}: {} nodes -> {} communities in {} passes (Q = {:.6})",
                dendrogram.len(),
                level_graph.len(),
                outcome.communities,
                outcome.passes,
                outcome.modularity,
            );

            // no merges: this level is final
            if outcome.communities == level_graph.len() {
                dendrogram.push_level(outcome.partition);
                break;
            }

            let (aggregated, mapping) = aggregate::aggregate(level_graph, &outcome.partition)?;
            dendrogram.push_level(Partition::from_assignments(mapping));
            owned = Some(aggregated);

            if dendrogram.len() >= self.max_levels {
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
        }

        Ok(dendrogram)
    }

    /// The flat partition over the original nodes, i.e. the composition of
    /// all of [`find_partitions`](Self::find_partitions)'s levels.
    pub fn best_partition(&self, graph: &SparseGraph) -> Result<Partition> {
        Ok(self.find_partitions(graph)?.flatten())
    }

    /// Modularity of a partition at this detector's resolution.
    pub fn modularity(&self, graph: &SparseGraph, partition: &Partition) -> Result<f64> {
        modularity::modularity(graph, partition, self.resolution)
    }

    /// Run [`best_partition`](Self::best_partition) on a labeled graph and
    /// re-key the result to the caller's node identifiers.
    pub fn best_partition_labeled<K>(
        &self,
        builder: &LabeledGraphBuilder<K>,
    ) -> Result<HashMap<K, usize>>
    where
        K: Hash + Eq + Clone,
    {
        let graph = builder.build()?;
        let flat = self.best_partition(&graph)?;
        Ok(flat
            .iter()
            .map(|(node, community)| (builder.labels()[node].clone(), community))
            .collect())
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for Louvain {
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>> {
        let n = graph.node_count();
        if n == 0 {
            return Err(GraphError::EmptyGraph.into());
        }

        // Unit weights; parallel edges accumulate.
        let edges: Vec<(usize, usize, f64)> = graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), 1.0))
            .collect();

        let sparse = SparseGraph::from_edges(n, &edges)?;
        Ok(self.best_partition(&sparse)?.into_vec())
    }

    fn resolution(&self) -> f64 {
        self.resolution
    }
}
