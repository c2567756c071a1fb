//! Sample moments and cross-cumulants.
//!
//! Covariance follows the unbiased (n − 1) convention. Cumulants are computed
//! on centred samples:
//!
//! ```text
//!   cum22(x, y) = E[x²y²] − E[x²]E[y²] − 2E[xy]²
//!   cum31(x, y) = E[x³y]  − 3E[x²]E[xy]
//! ```
//!
//! Both vanish for jointly Gaussian data, which is why they only carry
//! information about linear effects when the sources are non-Gaussian.

use ndarray::{Array1, ArrayView1};

use crate::error::{ensure_same_length, StatsError, StatsResult};

// ── Moments ─────────────────────────────────────────────────────────────

/// Arithmetic mean. Empty samples have no mean.
pub fn mean(x: ArrayView1<'_, f64>) -> StatsResult<f64> {
    x.mean()
        .ok_or(StatsError::InsufficientSamples { got: 0, need: 1 })
}

/// Unbiased sample covariance of two equally long samples.
pub fn covariance(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<f64> {
    ensure_same_length(x.len(), y.len())?;
    let n = x.len();
    if n < 2 {
        return Err(StatsError::InsufficientSamples { got: n, need: 2 });
    }
    let mx = mean(x)?;
    let my = mean(y)?;
    let sum: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(a, b)| (a - mx) * (b - my))
        .sum();
    Ok(sum / (n - 1) as f64)
}

/// Unbiased sample variance.
pub fn variance(x: ArrayView1<'_, f64>) -> StatsResult<f64> {
    covariance(x, x)
}

/// Median of a slice; the two middle values are averaged for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Subtract the mean from every observation.
pub fn centred(x: ArrayView1<'_, f64>) -> StatsResult<Array1<f64>> {
    let m = mean(x)?;
    Ok(x.mapv(|v| v - m))
}

// ── Cross-cumulants ─────────────────────────────────────────────────────

/// Fourth-order cross-cumulant estimator.
///
/// Implementations must be deterministic for a given pair of samples.
pub trait CrossCumulant {
    /// Second/second cross-cumulant of `(x, y)`.
    fn cum22(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<f64>;

    /// Third/first cross-cumulant of `(x, y)`: three powers of `x`, one of `y`.
    fn cum31(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<f64>;

    /// Name of this estimator (for log provenance).
    fn name(&self) -> &str;
}

/// Plug-in cumulant estimator over centred samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct SampleCumulants;

impl SampleCumulants {
    pub fn new() -> Self {
        Self
    }

    fn centred_pair(
        x: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> StatsResult<(Array1<f64>, Array1<f64>)> {
        ensure_same_length(x.len(), y.len())?;
        if x.is_empty() {
            return Err(StatsError::InsufficientSamples { got: 0, need: 1 });
        }
        Ok((centred(x)?, centred(y)?))
    }
}

impl CrossCumulant for SampleCumulants {
    fn cum22(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<f64> {
        let (x, y) = Self::centred_pair(x, y)?;
        let n = x.len() as f64;
        let x2 = &x * &x;
        let y2 = &y * &y;
        let e_x2y2 = (&x2 * &y2).sum() / n;
        let e_x2 = x2.sum() / n;
        let e_y2 = y2.sum() / n;
        let e_xy = x.dot(&y) / n;
        Ok(e_x2y2 - e_x2 * e_y2 - 2.0 * e_xy * e_xy)
    }

    fn cum31(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<f64> {
        let (x, y) = Self::centred_pair(x, y)?;
        let n = x.len() as f64;
        let x2 = &x * &x;
        let e_x3y = (&x2 * &x * &y).sum() / n;
        let e_x2 = x2.sum() / n;
        let e_xy = x.dot(&y) / n;
        Ok(e_x3y - 3.0 * e_x2 * e_xy)
    }

    fn name(&self) -> &str {
        "sample-cumulants"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn covariance_matches_hand_computation() {
        let x = array![1.0, 2.0, 3.0, 4.0];
        let y = array![2.0, 4.0, 6.0, 8.0];
        // mean x = 2.5, deviations (-1.5,-0.5,0.5,1.5); sum of squares 5 → var 5/3
        let cov = covariance(x.view(), y.view()).unwrap();
        assert!((cov - 10.0 / 3.0).abs() < 1e-12);
        assert!((variance(x.view()).unwrap() - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn covariance_rejects_short_or_mismatched() {
        let x = array![1.0];
        assert!(matches!(
            covariance(x.view(), x.view()),
            Err(StatsError::InsufficientSamples { got: 1, need: 2 })
        ));
        let y = array![1.0, 2.0];
        assert!(matches!(
            covariance(x.view(), y.view()),
            Err(StatsError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn median_orders_infinities_totally() {
        let values = [f64::INFINITY, -1.0, f64::NEG_INFINITY, 0.5, -0.0];
        assert_eq!(median(&values), Some(-0.0));
        assert_eq!(median(&[f64::INFINITY, 2.0, f64::NEG_INFINITY]), Some(2.0));
    }

    #[test]
    fn median_ignores_single_outlier() {
        let pool = [1.0, 1.1, 0.9, 1.05, 50.0];
        let med = median(&pool).unwrap();
        let mean: f64 = pool.iter().sum::<f64>() / pool.len() as f64;
        assert!((med - 1.05).abs() < 1e-12);
        assert!(mean > 10.0);
    }

    #[test]
    fn cumulants_vanish_for_symmetric_binary_pair_with_zero_product_moments() {
        // x and y independent ±1 patterns: E[xy]=0, E[x²y²]=1=E[x²]E[y²]
        let x = array![1.0, 1.0, -1.0, -1.0];
        let y = array![1.0, -1.0, 1.0, -1.0];
        let c = SampleCumulants::new();
        assert!(c.cum22(x.view(), y.view()).unwrap().abs() < 1e-12);
        assert!(c.cum31(x.view(), y.view()).unwrap().abs() < 1e-12);
    }

    #[test]
    fn cum31_of_identical_samples_is_excess_fourth_cumulant() {
        // For y = x, cum31 = E[x⁴] − 3E[x²]², cum22 = same quantity.
        let x = array![1.0, -1.0, 3.0, -3.0];
        let c = SampleCumulants::new();
        let k4 = (1.0 + 1.0 + 81.0 + 81.0) / 4.0 - 3.0 * 25.0;
        assert!((c.cum31(x.view(), x.view()).unwrap() - k4).abs() < 1e-9);
        assert!((c.cum22(x.view(), x.view()).unwrap() - k4).abs() < 1e-9);
    }

    #[test]
    fn cumulants_are_shift_invariant() {
        let x = array![0.3, -1.2, 2.5, 0.7, -0.4, 1.9];
        let y = array![1.1, 0.2, -0.5, 2.2, -1.0, 0.4];
        let c = SampleCumulants::new();
        let base = c.cum31(x.view(), y.view()).unwrap();
        let shifted = c
            .cum31(x.mapv(|v| v + 10.0).view(), y.mapv(|v| v - 3.0).view())
            .unwrap();
        assert!((base - shifted).abs() < 1e-9);
    }
}
