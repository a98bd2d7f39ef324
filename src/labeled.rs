//! Graph construction from arbitrary node identifiers.
//!
//! Callers often hold node ids that are not dense integers (strings,
//! UUIDs, database keys). [`LabeledGraphBuilder`] interns such keys into
//! dense indices, builds a [`SparseGraph`] over them, and keeps the
//! reverse table so partitions can be re-keyed to the caller's
//! identifiers.

use crate::error::Result;
use crate::graph::SparseGraph;
use std::collections::HashMap;
use std::hash::Hash;

/// Accumulates a weighted undirected edge list over arbitrary hashable
/// node keys.
#[derive(Debug, Clone)]
pub struct LabeledGraphBuilder<K> {
    index: HashMap<K, usize>,
    labels: Vec<K>,
    edges: Vec<(usize, usize, f64)>,
}

impl<K: Hash + Eq + Clone> LabeledGraphBuilder<K> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            labels: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Intern a node key, returning its dense index. Idempotent: interning
    /// the same key again returns the existing index.
    pub fn add_node(&mut self, key: K) -> usize {
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.labels.len();
        self.index.insert(key.clone(), i);
        self.labels.push(key);
        i
    }

    /// Add an undirected edge, interning both endpoints. Duplicate edges
    /// accumulate their weights at build time.
    pub fn add_edge(&mut self, a: K, b: K, weight: f64) {
        let i = self.add_node(a);
        let j = self.add_node(b);
        self.edges.push((i, j, weight));
    }

    /// Number of interned nodes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no nodes were interned.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The interned keys, indexed by dense node id.
    pub fn labels(&self) -> &[K] {
        &self.labels
    }

    /// Build the graph over the interned nodes.
    ///
    /// # Errors
    ///
    /// The [`SparseGraph::from_edges`] errors, notably
    /// [`GraphError::EmptyGraph`](crate::GraphError::EmptyGraph) for a
    /// builder with no nodes and
    /// [`GraphError::InvalidWeight`](crate::GraphError::InvalidWeight) for
    /// bad weights.
    pub fn build(&self) -> Result<SparseGraph> {
        SparseGraph::from_edges(self.labels.len(), &self.edges)
    }
}

impl<K: Hash + Eq + Clone> Default for LabeledGraphBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
