//! # maple-causal-stats
//!
//! Statistical primitives for linear causal discovery with latent confounders.
//!
//! Every primitive sits behind a trait so callers can swap the numerical
//! recipe without touching the discovery procedure:
//!
//! ```text
//!   CorrelationTest   ── PearsonCorrelation  (Student-t p-value)
//!   IndependenceTest  ── HsicGammaTest       (kernel test, gamma null)
//!   PartialResidual   ── PseudoResidual      (covariance-ratio residual)
//!   CrossCumulant     ── SampleCumulants     (cum22 / cum31)
//!            │
//!            └──► StatsSuite (one boxed implementation of each)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use maple_causal_stats::{StatsConfig, StatsSuite};
//! use ndarray::array;
//!
//! let suite = StatsSuite::new(&StatsConfig::default()).unwrap();
//! let x = array![0.1, 0.9, 2.1, 2.9, 4.2, 5.1, 5.8, 7.2];
//! let y = x.mapv(|v| 2.0 * v + 1.0);
//! assert!(suite.correlation(x.view(), y.view()).unwrap().passed);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod correlation;
pub mod error;
pub mod independence;
pub mod moments;
pub mod residual;
pub mod suite;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use config::StatsConfig;
pub use correlation::{CorrelationTest, PearsonCorrelation, TestOutcome};
pub use error::{StatsError, StatsResult};
pub use independence::{HsicGammaTest, IndependenceTest};
pub use moments::{covariance, mean, median, variance, CrossCumulant, SampleCumulants};
pub use residual::{PartialResidual, PseudoResidual};
pub use suite::StatsSuite;

// ── Defaults ────────────────────────────────────────────────────────────

/// Default significance level of the correlation test.
pub const DEFAULT_CORRELATION_ALPHA: f64 = 0.01;

/// Default significance level of the independence test.
pub const DEFAULT_INDEPENDENCE_ALPHA: f64 = 0.01;

/// Default cap on observations entering the HSIC kernel matrices.
pub const DEFAULT_HSIC_MAX_SAMPLES: usize = 1000;

/// Default number of observations used by the kernel-width median heuristic.
pub const DEFAULT_KERNEL_WIDTH_SAMPLES: usize = 100;

/// The HSIC null variance needs n > 5.
pub const MIN_HSIC_SAMPLES: usize = 6;
