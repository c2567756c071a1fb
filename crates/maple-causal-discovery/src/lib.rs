//! # maple-causal-discovery
//!
//! Partial identification of linear causal structure with latent
//! confounders.
//!
//! Given samples of observed variables, the procedure repeatedly finds
//! *roots* (variables with no remaining unresolved parent), estimates their
//! linear effects and subtracts them out. Roots are either observed
//! variables or latent variables recognised through their homologous
//! indicators. The result is a mixing matrix over observed and discovered
//! latent variables.
//!
//! ## Architecture
//!
//! ```text
//!   SampleTable ──► PartialIdentification::run
//!                        │
//!                        ▼
//!                 ┌──────────────────┐      ┌──────────────┐
//!                 │  DiscoveryState  │◄─────│    Probe     │◄── StatsSuite
//!                 │  O, Õ, M, U      │      │ (fail ⇒ safe │    (maple-causal-stats)
//!                 └────────┬─────────┘      │   default)   │
//!                          │                └──────────────┘
//!        ┌─────────────────┼──────────────────────┐
//!        ▼                 ▼                      ▼
//!   observed roots    latent candidates ──► merge ──► select ──► estimate
//!                          │
//!                          ▼
//!                   CausalStructure  (M, counts, status, trace)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use maple_causal_discovery::{DiscoveryConfig, PartialIdentification, SampleTable};
//! use ndarray::Array2;
//!
//! let observations: Array2<f64> = Array2::zeros((500, 4)); // your samples
//! let runner = PartialIdentification::new(DiscoveryConfig::default()).unwrap();
//! let min_samples = runner.config().min_samples;
//! let table = SampleTable::from_observations(observations.view(), min_samples).unwrap();
//! let structure = runner.run(table).unwrap();
//!
//! for edge in structure.edges(0.05) {
//!     let (from, to) = (structure.label(edge.source), structure.label(edge.target));
//!     println!("{from} -> {to}: {:.3}", edge.weight);
//! }
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod data;
pub mod error;
pub mod latent;
pub mod observed;
pub mod orchestrator;
pub mod probe;
pub mod state;
pub mod structure;

#[cfg(test)]
pub(crate) mod testing;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use config::DiscoveryConfig;
pub use data::SampleTable;
pub use error::{DiscoveryError, DiscoveryResult};
pub use latent::{
    find_latent_roots, merge_overlaps, remove_latent_roots, select_true_roots, EffectEstimator,
    LatentRemoval,
};
pub use observed::{find_observed_roots, remove_observed_roots};
pub use orchestrator::PartialIdentification;
pub use probe::Probe;
pub use state::DiscoveryState;
pub use structure::{CausalStructure, Edge, ResolutionStatus, RunTrace, TraceStep};

pub use maple_causal_stats as stats;

// ── Defaults ────────────────────────────────────────────────────────────

/// Effects at or below this magnitude count as absent.
pub const DEFAULT_SUPPORT_THRESHOLD: f64 = 1e-2;

/// Default minimum number of observations in a [`SampleTable`].
pub const DEFAULT_MIN_SAMPLES: usize = 10;
