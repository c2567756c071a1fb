//! Conservative adapter over the statistical primitives.
//!
//! A failing primitive never aborts a run. The substituted verdict is always
//! the one that claims less structure:
//!
//! | primitive     | on failure            |
//! |---------------|-----------------------|
//! | correlation   | not correlated        |
//! | independence  | not independent       |
//! | residual      | not independent       |
//! | cumulants     | candidate skipped     |

use maple_causal_stats::{StatsResult, StatsSuite};
use ndarray::ArrayView1;
use tracing::warn;

/// Borrowed view of a [`StatsSuite`] that folds failures into defaults.
#[derive(Clone, Copy, Debug)]
pub struct Probe<'a> {
    suite: &'a StatsSuite,
}

impl<'a> Probe<'a> {
    pub fn new(suite: &'a StatsSuite) -> Self {
        Self { suite }
    }

    /// Significant linear correlation between `x` and `y`.
    pub fn correlated(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> bool {
        match self.suite.correlation(x, y) {
            Ok(outcome) => outcome.passed,
            Err(e) => {
                warn!(error = %e, "correlation test failed, treating as uncorrelated");
                false
            }
        }
    }

    /// `independence(pr(x, y, z), z)`: the residual of `x` after conditioning
    /// on `z` (scaled through `y`) carries nothing of `z`.
    pub fn residual_independent(
        &self,
        x: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
        z: ArrayView1<'_, f64>,
    ) -> bool {
        let residual = match self.suite.residual(x, y, z) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "partial residual failed, treating as dependent");
                return false;
            }
        };
        match self.suite.independence(residual.view(), z) {
            Ok(outcome) => outcome.passed,
            Err(e) => {
                warn!(error = %e, "independence test failed, treating as dependent");
                false
            }
        }
    }

    pub fn cum22(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Option<f64> {
        finite(self.suite.cum22(x, y), "cum22")
    }

    pub fn cum31(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Option<f64> {
        finite(self.suite.cum31(x, y), "cum31")
    }
}

fn finite(value: StatsResult<f64>, what: &str) -> Option<f64> {
    match value {
        Ok(v) if v.is_finite() => Some(v),
        Ok(v) => {
            warn!(statistic = what, value = v, "non-finite cumulant, skipping");
            None
        }
        Err(e) => {
            warn!(statistic = what, error = %e, "cumulant failed, skipping");
            None
        }
    }
}
