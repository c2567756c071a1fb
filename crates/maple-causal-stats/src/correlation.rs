//! Pairwise linear-correlation significance test.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::config::validate_alpha;
use crate::error::{distribution_error, ensure_same_length, StatsError, StatsResult};
use crate::moments::covariance;

/// Outcome of a pairwise hypothesis test.
///
/// `passed` carries the test-specific verdict (significantly correlated for
/// [`CorrelationTest`], independent for
/// [`IndependenceTest`](crate::independence::IndependenceTest)); `statistic`
/// is the p-value the verdict was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub passed: bool,
    pub statistic: f64,
}

impl TestOutcome {
    pub fn new(passed: bool, statistic: f64) -> Self {
        Self { passed, statistic }
    }
}

/// Pluggable correlation test.
pub trait CorrelationTest {
    /// Whether `x` and `y` are linearly correlated above the significance level.
    fn test(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<TestOutcome>;

    /// Name of this test (for log provenance).
    fn name(&self) -> &str;
}

// ── Pearson ─────────────────────────────────────────────────────────────

/// Pearson correlation with a two-sided Student-t p-value (n − 2 dof).
#[derive(Clone, Debug)]
pub struct PearsonCorrelation {
    /// Significance level (default: 0.01).
    pub alpha: f64,
}

impl PearsonCorrelation {
    pub fn new(alpha: f64) -> StatsResult<Self> {
        validate_alpha(alpha)?;
        Ok(Self { alpha })
    }

    /// Pearson correlation coefficient.
    pub fn coefficient(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<f64> {
        let sxy = covariance(x, y)?;
        let sxx = covariance(x, x)?;
        let syy = covariance(y, y)?;
        if sxx <= 0.0 || syy <= 0.0 {
            return Err(StatsError::DegenerateSample(
                "zero variance in correlation test".into(),
            ));
        }
        Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
    }

    /// Two-sided p-value for H0: ρ = 0.
    pub fn p_value(r: f64, n: usize) -> StatsResult<f64> {
        if n < 3 {
            return Err(StatsError::InsufficientSamples { got: n, need: 3 });
        }
        let dof = (n - 2) as f64;
        let denom = 1.0 - r * r;
        if denom <= 0.0 {
            return Ok(0.0);
        }
        let t = r * (dof / denom).sqrt();
        let dist = StudentsT::new(0.0, 1.0, dof).map_err(distribution_error)?;
        Ok((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
    }
}

impl Default for PearsonCorrelation {
    fn default() -> Self {
        Self {
            alpha: super::DEFAULT_CORRELATION_ALPHA,
        }
    }
}

impl CorrelationTest for PearsonCorrelation {
    fn test(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<TestOutcome> {
        ensure_same_length(x.len(), y.len())?;
        let r = Self::coefficient(x, y)?;
        let p = Self::p_value(r, x.len())?;
        Ok(TestOutcome::new(p < self.alpha, p))
    }

    fn name(&self) -> &str {
        "pearson"
    }
}
