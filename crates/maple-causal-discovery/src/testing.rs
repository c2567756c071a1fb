//! Scripted primitives for deterministic unit tests.
//!
//! Vectors are recognised by exact equality with an observed row, so the
//! script applies to calls made before the rows involved are residualized.
//! Unrecognised vectors are reported uncorrelated and dependent.

use std::collections::BTreeSet;

use maple_causal_stats::{
    CorrelationTest, IndependenceTest, PartialResidual, SampleCumulants, StatsResult, StatsSuite,
    TestOutcome,
};
use ndarray::{Array1, Array2, ArrayView1};

#[derive(Clone, Debug)]
pub(crate) struct Oracle {
    rows: Vec<Array1<f64>>,
    correlated: BTreeSet<(usize, usize)>,
    /// `(x, z)`: `pr(O[x], ·, O[z])` is independent of `O[z]`.
    independent: BTreeSet<(usize, usize)>,
}

impl Oracle {
    pub(crate) fn new(observed: &Array2<f64>) -> Self {
        Self {
            rows: observed.rows().into_iter().map(|r| r.to_owned()).collect(),
            correlated: BTreeSet::new(),
            independent: BTreeSet::new(),
        }
    }

    pub(crate) fn correlate(mut self, a: usize, b: usize) -> Self {
        self.correlated.insert((a.min(b), a.max(b)));
        self
    }

    pub(crate) fn correlate_all(mut self) -> Self {
        let n = self.rows.len();
        for a in 0..n {
            for b in a + 1..n {
                self.correlated.insert((a, b));
            }
        }
        self
    }

    pub(crate) fn independent(mut self, x: usize, z: usize) -> Self {
        self.independent.insert((x, z));
        self
    }

    /// Every residual conditioned on one of `roots` passes the independence test.
    pub(crate) fn with_roots(mut self, roots: &[usize]) -> Self {
        for &z in roots {
            for x in 0..self.rows.len() {
                if x != z {
                    self.independent.insert((x, z));
                }
            }
        }
        self
    }

    fn id(&self, v: ArrayView1<'_, f64>) -> Option<usize> {
        self.rows.iter().position(|r| r.view() == v)
    }
}

impl CorrelationTest for Oracle {
    fn test(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<TestOutcome> {
        let passed = match (self.id(x), self.id(y)) {
            (Some(a), Some(b)) if a == b => true,
            (Some(a), Some(b)) => self.correlated.contains(&(a.min(b), a.max(b))),
            _ => false,
        };
        Ok(TestOutcome::new(passed, 0.0))
    }

    fn name(&self) -> &str {
        "oracle"
    }
}

impl IndependenceTest for Oracle {
    fn test(&self, x: ArrayView1<'_, f64>, z: ArrayView1<'_, f64>) -> StatsResult<TestOutcome> {
        let passed = match (self.id(x), self.id(z)) {
            (Some(a), Some(b)) => self.independent.contains(&(a, b)),
            _ => false,
        };
        Ok(TestOutcome::new(passed, 0.0))
    }

    fn name(&self) -> &str {
        "oracle"
    }
}

/// `pr(x, y, z) = x`, keeping `x` recognisable to the oracle.
pub(crate) struct PassThrough;

impl PartialResidual for PassThrough {
    fn residual(
        &self,
        x: ArrayView1<'_, f64>,
        _: ArrayView1<'_, f64>,
        _: ArrayView1<'_, f64>,
    ) -> StatsResult<Array1<f64>> {
        Ok(x.to_owned())
    }

    fn name(&self) -> &str {
        "pass-through"
    }
}

/// `pr(x, y, z) = y`. Observed-root checks then query `(i, i)` while
/// latent-root checks query `(k, i)`, so the two can be scripted apart.
pub(crate) struct Reference;

impl PartialResidual for Reference {
    fn residual(
        &self,
        _: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
        _: ArrayView1<'_, f64>,
    ) -> StatsResult<Array1<f64>> {
        Ok(y.to_owned())
    }

    fn name(&self) -> &str {
        "reference"
    }
}

/// `O[v] = loadings[v] · L + 0.1 · e[v]` over 64 samples, where `L` and the
/// `e[v]` are Rademacher square waves of distinct periods: zero mean and
/// exactly orthogonal, so every covariance is known in closed form
/// (`var(L) = 64 / 63`). Supports up to four variables.
pub(crate) fn indicators(loadings: &[f64]) -> Array2<f64> {
    let n = 64;
    let wave = |period: usize| {
        Array1::from_iter((0..n).map(move |t| if t % period < period / 2 { 1.0 } else { -1.0 }))
    };
    let latent = wave(2);
    let mut m = Array2::zeros((loadings.len(), n));
    for (v, &a) in loadings.iter().enumerate() {
        let noise = wave(4 << v) * 0.1;
        m.row_mut(v).assign(&(&latent * a + &noise));
    }
    m
}

/// Oracle tests, pass-through residual, real sample cumulants.
pub(crate) fn oracle_suite(oracle: Oracle) -> StatsSuite {
    StatsSuite::with_primitives(
        Box::new(oracle.clone()),
        Box::new(oracle),
        Box::new(PassThrough),
        Box::new(SampleCumulants::new()),
    )
}
