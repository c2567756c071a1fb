use maple_causal_stats::StatsError;
use thiserror::Error;

/// Errors from the discovery procedure.
///
/// Non-identifiability is not an error: it is reported through
/// [`ResolutionStatus`](crate::structure::ResolutionStatus) on a successful run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("sample table is empty")]
    EmptyTable,

    #[error("not enough observations: {got} (need at least {need})")]
    InsufficientSamples { got: usize, need: usize },

    #[error("non-finite value at observation {row}, variable {column}")]
    NonFiniteValue { row: usize, column: usize },

    #[error("variable names mismatch: {names} names for {variables} variables")]
    NameCountMismatch { names: usize, variables: usize },

    #[error("ragged rows: observation {row} has {got} values, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(e: serde_json::Error) -> Self {
        DiscoveryError::InvalidConfig(e.to_string())
    }
}

/// Convenience type alias for discovery results.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
