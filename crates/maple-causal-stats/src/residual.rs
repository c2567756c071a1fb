//! Partial-residual operator.
//!
//! The residual of `x` after removing the direction that `z` reveals, scaled
//! through the reference `y`:
//!
//! ```text
//!   pr(x, y, z) = x − cov(x, z) / cov(y, z) · y
//! ```
//!
//! When `z` is a proxy for a common source of `x` and `y`, the residual is
//! free of that source and can be tested for independence against `z`.

use ndarray::{Array1, ArrayView1};

use crate::error::{ensure_same_length, StatsError, StatsResult};
use crate::moments::covariance;

/// Pluggable partial-residual strategy.
pub trait PartialResidual {
    /// Residual of `x` conditioned on `z`, with `y` as the scaling reference.
    fn residual(
        &self,
        x: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
        z: ArrayView1<'_, f64>,
    ) -> StatsResult<Array1<f64>>;

    /// Name of this strategy (for log provenance).
    fn name(&self) -> &str;
}

/// Covariance-ratio pseudo-residual.
#[derive(Clone, Copy, Debug, Default)]
pub struct PseudoResidual;

impl PseudoResidual {
    pub fn new() -> Self {
        Self
    }
}

impl PartialResidual for PseudoResidual {
    fn residual(
        &self,
        x: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
        z: ArrayView1<'_, f64>,
    ) -> StatsResult<Array1<f64>> {
        ensure_same_length(x.len(), y.len())?;
        ensure_same_length(x.len(), z.len())?;
        let cov_yz = covariance(y, z)?;
        if cov_yz == 0.0 {
            return Err(StatsError::DegenerateSample(
                "reference uncorrelated with conditioning sample".into(),
            ));
        }
        let scale = covariance(x, z)? / cov_yz;
        Ok(&x - &(&y * scale))
    }

    fn name(&self) -> &str {
        "pseudo-residual"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn residual_is_uncorrelated_with_conditioning_sample() {
        let z = array![0.5, -1.0, 2.0, 0.1, -0.7, 1.4];
        let x = array![1.0, 0.3, -0.2, 2.2, 0.4, -1.1];
        let y = &z * 2.0 + &array![0.2, -0.1, 0.0, 0.3, -0.2, 0.1];
        let r = PseudoResidual::new()
            .residual(x.view(), y.view(), z.view())
            .unwrap();
        assert!(covariance(r.view(), z.view()).unwrap().abs() < 1e-12);
    }

    #[test]
    fn regression_residual_when_reference_equals_condition() {
        // pr(x, z, z) is the OLS residual of x on z.
        let z = array![1.0, 2.0, 3.0, 4.0];
        let x = array![3.0, 5.0, 7.0, 9.0];
        let r = PseudoResidual::new()
            .residual(x.view(), z.view(), z.view())
            .unwrap();
        let m = r.mean().unwrap();
        assert!(r.iter().all(|v| (v - m).abs() < 1e-12));
    }

    #[test]
    fn uncorrelated_reference_is_degenerate() {
        let z = array![1.0, -1.0, 1.0, -1.0];
        let y = array![1.0, 1.0, -1.0, -1.0];
        let x = array![0.0, 1.0, 2.0, 3.0];
        let res = PseudoResidual::new().residual(x.view(), y.view(), z.view());
        assert!(matches!(res, Err(StatsError::DegenerateSample(_))));
    }

    #[test]
    fn length_mismatch() {
        let a = array![1.0, 2.0, 3.0];
        let b = array![1.0, 2.0];
        assert!(PseudoResidual::new()
            .residual(a.view(), a.view(), b.view())
            .is_err());
    }
}
