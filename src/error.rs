//! Error type shared by graph construction, model construction and the sampler.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ErgmError>;

/// Errors reported before any sampling state is mutated.
///
/// All of these are programmer errors (bad sizes, bad ids, bad settings). None of them
/// stem from I/O, so callers are not expected to retry.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErgmError {
    /// A model was built with a different number of terms and parameters.
    #[error("model has {terms} terms but {params} parameters")]
    ParameterMismatch { terms: usize, params: usize },

    /// A vertex attribute vector does not have one entry per vertex.
    #[error("vertex attribute `{name}` has {got} values, expected {expected}")]
    AttributeLength {
        name: String,
        expected: usize,
        got: usize,
    },

    /// An edge attribute was set on a pair that is not an edge.
    #[error("no edge between vertices {u} and {v}")]
    MissingEdge { u: usize, v: usize },

    /// A 1-based vertex id outside `1..=n`.
    #[error("vertex {vertex} is out of range for a graph with {n} vertices")]
    VertexOutOfRange { vertex: usize, n: usize },

    /// Simple graphs have no self-loops.
    #[error("self-loop on vertex {vertex} is not allowed")]
    SelfLoop { vertex: usize },

    /// The edge-toggle proposal needs two distinct vertices.
    #[error("sampling needs at least 2 vertices, graph has {n}")]
    TooFewVertices { n: usize },

    /// A sampler setting that cannot be honoured.
    #[error("invalid sampler configuration: {0}")]
    InvalidConfig(String),

    /// A convergence diagnostic could not be computed from the given samples.
    #[error("diagnostic error: {0}")]
    Diagnostic(String),
}
