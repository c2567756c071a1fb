use thiserror::Error;

/// Errors raised by the statistical primitives.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("sample length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("not enough samples: {got} (need at least {need})")]
    InsufficientSamples { got: usize, need: usize },

    #[error("degenerate sample: {0}")]
    DegenerateSample(String),

    #[error("significance level out of range: {0} (must be in (0, 1))")]
    InvalidAlpha(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("distribution error: {0}")]
    Distribution(String),
}

/// Convenience type alias for statistics results.
pub type StatsResult<T> = Result<T, StatsError>;

/// Wrap a distribution construction failure from `statrs`.
pub(crate) fn distribution_error(e: impl std::fmt::Display) -> StatsError {
    StatsError::Distribution(e.to_string())
}

/// Check that two samples can be compared pairwise.
pub(crate) fn ensure_same_length(left: usize, right: usize) -> StatsResult<()> {
    if left != right {
        return Err(StatsError::LengthMismatch { left, right });
    }
    Ok(())
}
