//! Pairwise independence test: HSIC with a gamma-approximated null.
//!
//! ```text
//!   x, y ──► Gaussian kernels K, L (median-heuristic widths)
//!               │
//!               ├── centre: Kc = HKH, Lc = HLH
//!               ├── statistic  = Σ(Kc ∘ Lc) / n
//!               └── null moments (mean, variance) ──► Gamma(shape, scale)
//!                                                        │
//!                                   p = 1 − F(statistic) ◄┘
//! ```

use ndarray::{Array2, ArrayView1, Axis};
use statrs::distribution::{ContinuousCDF, Gamma};
use tracing::trace;

use crate::config::validate_alpha;
use crate::correlation::TestOutcome;
use crate::error::{distribution_error, ensure_same_length, StatsError, StatsResult};
use crate::moments::median;

/// Pluggable independence test.
pub trait IndependenceTest {
    /// Whether `x` and `y` are statistically independent at the configured level.
    fn test(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<TestOutcome>;

    /// Name of this test (for log provenance).
    fn name(&self) -> &str;
}

// ── HSIC ────────────────────────────────────────────────────────────────

/// Hilbert–Schmidt independence criterion with the gamma approximation.
///
/// O(n²) in time and memory, so only the first `max_samples` observations
/// enter the kernel matrices.
#[derive(Clone, Debug)]
pub struct HsicGammaTest {
    /// Significance level (default: 0.01). Independence is accepted when p > alpha.
    pub alpha: f64,
    /// Cap on observations used for the kernels.
    pub max_samples: usize,
    /// Observations used by the median heuristic.
    pub width_samples: usize,
}

impl HsicGammaTest {
    pub fn new(alpha: f64, max_samples: usize, width_samples: usize) -> StatsResult<Self> {
        validate_alpha(alpha)?;
        if max_samples < super::MIN_HSIC_SAMPLES {
            return Err(StatsError::InvalidConfig(format!(
                "HSIC needs at least {} samples, cap is {}",
                super::MIN_HSIC_SAMPLES,
                max_samples
            )));
        }
        Ok(Self {
            alpha,
            max_samples,
            width_samples: width_samples.max(2),
        })
    }

    /// HSIC p-value under the gamma approximation.
    pub fn p_value(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<f64> {
        ensure_same_length(x.len(), y.len())?;
        let n = x.len().min(self.max_samples);
        if n < super::MIN_HSIC_SAMPLES {
            return Err(StatsError::InsufficientSamples {
                got: n,
                need: super::MIN_HSIC_SAMPLES,
            });
        }
        let x: Vec<f64> = x.iter().take(n).copied().collect();
        let y: Vec<f64> = y.iter().take(n).copied().collect();

        let width_x = self.kernel_width(&x)?;
        let width_y = self.kernel_width(&y)?;

        let k = rbf_gram(&x, width_x);
        let l = rbf_gram(&y, width_y);
        let kc = double_centre(&k);
        let lc = double_centre(&l);

        let nf = n as f64;
        let product = &kc * &lc;
        let statistic = product.sum() / nf;

        // Null variance.
        let var_terms = product.mapv(|v| (v / 6.0).powi(2));
        let var_trace: f64 = var_terms.diag().sum();
        let mut var_hsic = (var_terms.sum() - var_trace) / nf / (nf - 1.0);
        var_hsic *= 72.0 * (nf - 4.0) * (nf - 5.0) / nf / (nf - 1.0) / (nf - 2.0) / (nf - 3.0);

        // Null mean, off-diagonal kernel averages.
        let mu_x = (k.sum() - k.diag().sum()) / nf / (nf - 1.0);
        let mu_y = (l.sum() - l.diag().sum()) / nf / (nf - 1.0);
        let m_hsic = (1.0 + mu_x * mu_y - mu_x - mu_y) / nf;

        if !(var_hsic > 0.0) || !(m_hsic > 0.0) {
            return Err(StatsError::DegenerateSample(format!(
                "HSIC null moments not positive (mean={m_hsic:e}, var={var_hsic:e})"
            )));
        }

        let shape = m_hsic * m_hsic / var_hsic;
        let scale = var_hsic * nf / m_hsic;
        let null = Gamma::new(shape, 1.0 / scale).map_err(distribution_error)?;
        let p = (1.0 - null.cdf(statistic)).clamp(0.0, 1.0);

        trace!(n, statistic, shape, scale, p, "hsic gamma test");
        Ok(p)
    }

    /// Median heuristic: sqrt(0.5 · median of positive squared distances).
    fn kernel_width(&self, sample: &[f64]) -> StatsResult<f64> {
        let m = sample.len().min(self.width_samples.max(2));
        let mut dists = Vec::with_capacity(m * m.saturating_sub(1) / 2);
        for a in 0..m {
            for b in (a + 1)..m {
                let d = sample[a] - sample[b];
                let d2 = d * d;
                if d2 > 0.0 {
                    dists.push(d2);
                }
            }
        }
        match median(&dists) {
            Some(med) if med > 0.0 => Ok((0.5 * med).sqrt()),
            _ => Err(StatsError::DegenerateSample(
                "constant sample, kernel width undefined".into(),
            )),
        }
    }
}

impl Default for HsicGammaTest {
    fn default() -> Self {
        Self {
            alpha: super::DEFAULT_INDEPENDENCE_ALPHA,
            max_samples: super::DEFAULT_HSIC_MAX_SAMPLES,
            width_samples: super::DEFAULT_KERNEL_WIDTH_SAMPLES,
        }
    }
}

impl IndependenceTest for HsicGammaTest {
    fn test(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<TestOutcome> {
        let p = self.p_value(x, y)?;
        Ok(TestOutcome::new(p > self.alpha, p))
    }

    fn name(&self) -> &str {
        "hsic-gamma"
    }
}

// ── Kernel helpers ──────────────────────────────────────────────────────

/// Gaussian Gram matrix: exp(−(a − b)² / (2w²)).
fn rbf_gram(sample: &[f64], width: f64) -> Array2<f64> {
    let n = sample.len();
    let denom = 2.0 * width * width;
    Array2::from_shape_fn((n, n), |(a, b)| {
        let d = sample[a] - sample[b];
        (-(d * d) / denom).exp()
    })
}

/// HKH with H = I − 11ᵀ/n, computed from row and grand means.
fn double_centre(gram: &Array2<f64>) -> Array2<f64> {
    let n = gram.nrows() as f64;
    let row_means = gram.sum_axis(Axis(1)) / n;
    let col_means = gram.sum_axis(Axis(0)) / n;
    let grand = gram.sum() / (n * n);
    Array2::from_shape_fn(gram.dim(), |(a, b)| {
        gram[[a, b]] - row_means[a] - col_means[b] + grand
    })
}
