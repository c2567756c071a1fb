//! Bundle of the statistical primitives consumed by causal discovery.

use ndarray::{Array1, ArrayView1};

use crate::config::StatsConfig;
use crate::correlation::{CorrelationTest, PearsonCorrelation, TestOutcome};
use crate::error::StatsResult;
use crate::independence::{HsicGammaTest, IndependenceTest};
use crate::moments::{CrossCumulant, SampleCumulants};
use crate::residual::{PartialResidual, PseudoResidual};

/// One implementation of each primitive, owned for the lifetime of a run.
///
/// Built from a [`StatsConfig`] with the default implementations; any single
/// primitive can be swapped through the `with_*` builders.
pub struct StatsSuite {
    correlation: Box<dyn CorrelationTest>,
    independence: Box<dyn IndependenceTest>,
    residual: Box<dyn PartialResidual>,
    cumulants: Box<dyn CrossCumulant>,
}

impl StatsSuite {
    /// Default primitives configured from `config`.
    pub fn new(config: &StatsConfig) -> StatsResult<Self> {
        config.validate()?;
        Ok(Self {
            correlation: Box::new(PearsonCorrelation::new(config.correlation_alpha)?),
            independence: Box::new(HsicGammaTest::new(
                config.independence_alpha,
                config.hsic_max_samples,
                config.kernel_width_samples,
            )?),
            residual: Box::new(PseudoResidual::new()),
            cumulants: Box::new(SampleCumulants::new()),
        })
    }

    /// Create with fully custom primitives.
    pub fn with_primitives(
        correlation: Box<dyn CorrelationTest>,
        independence: Box<dyn IndependenceTest>,
        residual: Box<dyn PartialResidual>,
        cumulants: Box<dyn CrossCumulant>,
    ) -> Self {
        Self {
            correlation,
            independence,
            residual,
            cumulants,
        }
    }

    pub fn with_correlation(mut self, test: Box<dyn CorrelationTest>) -> Self {
        self.correlation = test;
        self
    }

    pub fn with_independence(mut self, test: Box<dyn IndependenceTest>) -> Self {
        self.independence = test;
        self
    }

    pub fn with_residual(mut self, residual: Box<dyn PartialResidual>) -> Self {
        self.residual = residual;
        self
    }

    pub fn with_cumulants(mut self, cumulants: Box<dyn CrossCumulant>) -> Self {
        self.cumulants = cumulants;
        self
    }

    pub fn correlation(
        &self,
        x: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> StatsResult<TestOutcome> {
        self.correlation.test(x, y)
    }

    pub fn independence(
        &self,
        x: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> StatsResult<TestOutcome> {
        self.independence.test(x, y)
    }

    pub fn residual(
        &self,
        x: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
        z: ArrayView1<'_, f64>,
    ) -> StatsResult<Array1<f64>> {
        self.residual.residual(x, y, z)
    }

    pub fn cum22(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<f64> {
        self.cumulants.cum22(x, y)
    }

    pub fn cum31(&self, x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> StatsResult<f64> {
        self.cumulants.cum31(x, y)
    }

    /// Names of the active primitives, in (correlation, independence,
    /// residual, cumulants) order.
    pub fn describe(&self) -> [&str; 4] {
        [
            self.correlation.name(),
            self.independence.name(),
            self.residual.name(),
            self.cumulants.name(),
        ]
    }
}

impl Default for StatsSuite {
    fn default() -> Self {
        Self::with_primitives(
            Box::new(PearsonCorrelation::default()),
            Box::new(HsicGammaTest::default()),
            Box::new(PseudoResidual::new()),
            Box::new(SampleCumulants::new()),
        )
    }
}

impl std::fmt::Debug for StatsSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [c, i, r, k] = self.describe();
        f.debug_struct("StatsSuite")
            .field("correlation", &c)
            .field("independence", &i)
            .field("residual", &r)
            .field("cumulants", &k)
            .finish()
    }
}
