//! Errors returned by graph construction and centre finding.

/// Graph error types.
///
/// Vertex keys are rendered with their `Debug` implementation so the error isn't generic over the
/// key type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The operation needs at least one vertex.
    #[error("empty graph")]
    EmptyGraph,

    /// An edge was given the same vertex at both ends.
    #[error("self loop on vertex {0}")]
    SelfLoop(String),

    /// More than one vertex carries the same key.
    #[error("duplicate vertex key {0}")]
    DuplicateKey(String),

    /// One half of an adjacency pair is missing.
    #[error("{from} lists {to} as a neighbour but not the reverse")]
    AsymmetricAdjacency { from: String, to: String },

    /// The graph is a forest rather than a single tree.
    #[error("graph is disconnected ({components} components)")]
    Disconnected { components: usize },

    /// Peeling stalled before reaching the centre.
    #[error("graph contains a cycle, {remaining} vertices could not be peeled")]
    Cyclic { remaining: usize },
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Renders a vertex key for inclusion in an error.
pub(crate) fn key<T: std::fmt::Debug>(vertex: &T) -> String {
    format!("{vertex:?}")
}
