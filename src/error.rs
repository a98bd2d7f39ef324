use core::fmt;

/// Result alias for `cohort`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing or validating a [`SparseGraph`](crate::SparseGraph).
///
/// All graph errors are fatal: a graph that fails construction is never
/// handed to the clustering pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The graph has no nodes.
    EmptyGraph,

    /// An off-diagonal entry is missing its mirror, or the mirror carries
    /// a different weight.
    AsymmetricEdge {
        /// Source node of the offending entry.
        node: usize,
        /// Target node of the offending entry.
        neighbor: usize,
    },

    /// The CSR arrays are inconsistent (offset monotonicity, array lengths).
    InvalidShape {
        /// Description of the inconsistency.
        reason: &'static str,
    },

    /// An edge weight is negative, NaN, or infinite.
    InvalidWeight {
        /// Source node of the entry.
        node: usize,
        /// Target node of the entry.
        neighbor: usize,
        /// The offending weight.
        weight: f64,
    },

    /// An edge endpoint is outside `[0, n)`.
    NodeOutOfRange {
        /// The offending node id.
        node: usize,
        /// Number of nodes in the graph.
        len: usize,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::EmptyGraph => write!(f, "graph has no nodes"),
            GraphError::AsymmetricEdge { node, neighbor } => {
                write!(f, "edge ({node}, {neighbor}) has no matching mirror entry")
            }
            GraphError::InvalidShape { reason } => {
                write!(f, "inconsistent adjacency arrays: {reason}")
            }
            GraphError::InvalidWeight {
                node,
                neighbor,
                weight,
            } => {
                write!(f, "edge ({node}, {neighbor}) has invalid weight {weight}")
            }
            GraphError::NodeOutOfRange { node, len } => {
                write!(f, "node {node} out of range for graph of {len} nodes")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Errors raised when a caller-supplied partition does not match the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionError {
    /// A partition entry references a node outside `[0, n)`.
    NodeOutOfRange {
        /// The offending node id.
        node: usize,
        /// Number of nodes the partition must cover.
        len: usize,
    },

    /// The partition does not assign exactly one community to every node.
    ShapeMismatch {
        /// Number of nodes the graph has.
        expected: usize,
        /// Number of nodes the partition covers.
        found: usize,
    },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionError::NodeOutOfRange { node, len } => {
                write!(f, "partition references node {node}, graph has {len} nodes")
            }
            PartitionError::ShapeMismatch { expected, found } => {
                write!(f, "partition covers {found} nodes, expected {expected}")
            }
        }
    }
}

impl std::error::Error for PartitionError {}

/// Errors raised by invalid algorithm configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The resolution parameter must be a positive finite number.
    NonPositiveResolution {
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveResolution { value } => {
                write!(f, "resolution must be > 0, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Unified error type returned by the public entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Graph construction or validation failed.
    Graph(GraphError),
    /// A caller-supplied partition is malformed.
    Partition(PartitionError),
    /// The algorithm configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Graph(e) => write!(f, "{e}"),
            Error::Partition(e) => write!(f, "{e}"),
            Error::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Graph(e) => Some(e),
            Error::Partition(e) => Some(e),
            Error::Config(e) => Some(e),
        }
    }
}

impl From<GraphError> for Error {
    fn from(e: GraphError) -> Self {
        Error::Graph(e)
    }
}

impl From<PartitionError> for Error {
    fn from(e: PartitionError) -> Self {
        Error::Partition(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}
