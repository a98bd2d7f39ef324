//! Node-to-community assignments.
//!
//! A [`Partition`] maps each node id in `[0, n)` to a community id.
//! Community ids are plain non-negative integers and are not required to
//! be contiguous; [`Partition::renumber`] compacts them to `[0, k)` when an
//! algorithm needs dense bookkeeping.

use crate::error::PartitionError;
use std::collections::HashMap;

/// A community assignment for `n` nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    assignment: Vec<usize>,
}

impl Partition {
    /// The partition placing every node in its own community.
    pub fn singletons(n: usize) -> Self {
        Self {
            assignment: (0..n).collect(),
        }
    }

    /// Wrap a dense assignment vector, `assignment[v]` being the community
    /// of node `v`.
    pub fn from_assignments(assignment: Vec<usize>) -> Self {
        Self { assignment }
    }

    /// Build a partition for `n` nodes from `(node, community)` pairs.
    ///
    /// Later pairs overwrite earlier ones for the same node, matching map
    /// semantics of dictionary-shaped caller input.
    ///
    /// # Errors
    ///
    /// [`PartitionError::NodeOutOfRange`] if a pair references a node
    /// outside `[0, n)`; [`PartitionError::ShapeMismatch`] if some node in
    /// `[0, n)` is left without an assignment.
    pub fn from_pairs<I>(n: usize, pairs: I) -> Result<Self, PartitionError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut slots: Vec<Option<usize>> = vec![None; n];
        for (node, community) in pairs {
            if node >= n {
                return Err(PartitionError::NodeOutOfRange { node, len: n });
            }
            slots[node] = Some(community);
        }

        let found = slots.iter().filter(|s| s.is_some()).count();
        if found != n {
            return Err(PartitionError::ShapeMismatch { expected: n, found });
        }

        Ok(Self {
            assignment: slots.into_iter().flatten().collect(),
        })
    }

    /// Number of nodes covered.
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    /// Whether the partition covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// The community of a node.
    #[inline]
    pub fn community_of(&self, node: usize) -> usize {
        self.assignment[node]
    }

    /// The dense assignment slice.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.assignment
    }

    /// Consume the partition, returning the assignment vector.
    pub fn into_vec(self) -> Vec<usize> {
        self.assignment
    }

    /// Iterate over `(node, community)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.assignment.iter().copied().enumerate()
    }

    /// Number of distinct communities.
    pub fn community_count(&self) -> usize {
        let mut seen: Vec<usize> = self.assignment.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    /// Compact community ids to `[0, k)` in first-seen order and return `k`.
    pub fn renumber(&mut self) -> usize {
        let mut remap: HashMap<usize, usize> = HashMap::new();
        for c in self.assignment.iter_mut() {
            let next = remap.len();
            *c = *remap.entry(*c).or_insert(next);
        }
        remap.len()
    }
}

impl std::ops::Index<usize> for Partition {
    type Output = usize;

    fn index(&self, node: usize) -> &usize {
        &self.assignment[node]
    }
}
