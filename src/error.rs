//! Error types for verge.

use thiserror::Error;

/// Errors that can occur during index construction or search.
///
/// Every variant is caller misuse. Recoverable conditions inside the
/// library (degenerate splits during build, candidate-budget exhaustion
/// during search) are handled internally and never surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between query and indexed points.
    #[error("dimension mismatch: query has {query_dim} dimensions, index has {index_dim}")]
    DimensionMismatch { query_dim: usize, index_dim: usize },

    /// Query hyperplane normal has (near-)zero magnitude, so the
    /// point-to-hyperplane distance is undefined.
    #[error("degenerate query: hyperplane normal has near-zero norm")]
    DegenerateQuery,

    /// No points supplied at construction.
    #[error("index is empty")]
    EmptyIndex,
}

pub type Result<T> = std::result::Result<T, IndexError>;
