//! Configuration shared by the default statistical primitives.

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Tuning knobs for the default correlation and independence tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Significance level of the Pearson correlation test. Default: 0.01.
    pub correlation_alpha: f64,
    /// Significance level of the HSIC independence test. Default: 0.01.
    pub independence_alpha: f64,
    /// Maximum observations fed into the HSIC kernel matrices (memory bound).
    pub hsic_max_samples: usize,
    /// Observations used by the median heuristic for the kernel width.
    pub kernel_width_samples: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            correlation_alpha: super::DEFAULT_CORRELATION_ALPHA,
            independence_alpha: super::DEFAULT_INDEPENDENCE_ALPHA,
            hsic_max_samples: super::DEFAULT_HSIC_MAX_SAMPLES,
            kernel_width_samples: super::DEFAULT_KERNEL_WIDTH_SAMPLES,
        }
    }
}

impl StatsConfig {
    /// Reject significance levels outside (0, 1) and unusable sample caps.
    pub fn validate(&self) -> StatsResult<()> {
        validate_alpha(self.correlation_alpha)?;
        validate_alpha(self.independence_alpha)?;
        if self.hsic_max_samples < super::MIN_HSIC_SAMPLES {
            return Err(StatsError::InvalidConfig(format!(
                "hsic_max_samples must be at least {}, got {}",
                super::MIN_HSIC_SAMPLES,
                self.hsic_max_samples
            )));
        }
        if self.kernel_width_samples < 2 {
            return Err(StatsError::InvalidConfig(format!(
                "kernel_width_samples must be at least 2, got {}",
                self.kernel_width_samples
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_alpha(alpha: f64) -> StatsResult<()> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidAlpha(alpha))
    }
}
