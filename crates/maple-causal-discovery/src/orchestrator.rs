//! The partial-identification run loop.
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────┐
//!   │ while unresolved ≠ ∅                                     │
//!   │   ┌─► find_observed_roots ── ∅ ──┐                       │
//!   │   └── remove_observed_roots ◄────┘ found                 │
//!   │   find_latent_roots ─── ∅ ─────────────────► Stalled     │
//!   │   merge_overlaps → select_true_roots                     │
//!   │   remove_latent_roots ── halt ─────────────► NonIdentif. │
//!   └──────────────────────────────────────────────────────────┘
//!   pad M to square, infer latent → latent edges, latent diagonal = 1
//! ```
//!
//! Every batch resolves at least one variable, so the loop terminates after
//! at most `n_observed` batches.

use std::collections::BTreeMap;

use chrono::Utc;
use maple_causal_stats::StatsSuite;
use ndarray::{Array1, Array2};
use tracing::{debug, info, warn};

use crate::config::DiscoveryConfig;
use crate::data::SampleTable;
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::latent::{
    find_latent_roots, merge_overlaps, remove_latent_roots, select_true_roots, LatentRemoval,
};
use crate::observed::{find_observed_roots, remove_observed_roots};
use crate::probe::Probe;
use crate::state::DiscoveryState;
use crate::structure::{CausalStructure, ResolutionStatus, RunTrace, TraceStep};

/// Discovers observed and latent causal structure from a [`SampleTable`].
#[derive(Debug)]
pub struct PartialIdentification {
    config: DiscoveryConfig,
    suite: StatsSuite,
}

impl PartialIdentification {
    /// Validate `config` and build the default primitives from it.
    pub fn new(config: DiscoveryConfig) -> DiscoveryResult<Self> {
        config.validate()?;
        let suite = StatsSuite::new(&config.stats)?;
        Ok(Self { config, suite })
    }

    /// Use caller-supplied primitives; `config.stats` is then only validated.
    pub fn with_suite(config: DiscoveryConfig, suite: StatsSuite) -> DiscoveryResult<Self> {
        config.validate()?;
        Ok(Self { config, suite })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: DiscoveryConfig::default(),
            suite: StatsSuite::default(),
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn suite(&self) -> &StatsSuite {
        &self.suite
    }

    /// Run the procedure to completion or until no further progress is
    /// possible. Non-identifiability is reported through
    /// [`CausalStructure::status`], never as an error.
    pub fn run(&self, table: SampleTable) -> DiscoveryResult<CausalStructure> {
        if table.n_samples() < self.config.min_samples {
            return Err(DiscoveryError::InsufficientSamples {
                got: table.n_samples(),
                need: self.config.min_samples,
            });
        }
        let started_at = Utc::now();
        let (observed, variable_names) = table.into_parts();
        let n_observed = observed.nrows();
        info!(
            variables = n_observed,
            samples = observed.ncols(),
            primitives = ?self.suite.describe(),
            "starting partial identification"
        );

        let probe = Probe::new(&self.suite);
        let mut state = DiscoveryState::new(observed);
        let mut trace = RunTrace::new();
        let status = self.iterate(&mut state, &probe, &mut trace)?;

        let (mixing, latent_indicators, _) = state.into_parts();
        let n_latent = mixing.ncols() - n_observed;
        let mixing = complete_mixing(
            mixing,
            &latent_indicators,
            n_observed,
            self.config.support_threshold,
        )?;

        let finished_at = Utc::now();
        info!(
            n_observed,
            n_latent,
            complete = status.is_complete(),
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "partial identification finished"
        );
        Ok(CausalStructure {
            mixing,
            n_observed,
            n_latent,
            status,
            latent_indicators,
            variable_names,
            trace,
            started_at,
            finished_at,
        })
    }

    fn iterate(
        &self,
        state: &mut DiscoveryState,
        probe: &Probe<'_>,
        trace: &mut RunTrace,
    ) -> DiscoveryResult<ResolutionStatus> {
        while !state.is_resolved() {
            loop {
                let roots = find_observed_roots(state, probe);
                if roots.is_empty() {
                    break;
                }
                remove_observed_roots(state, probe, &roots)?;
                trace.record(TraceStep::ObservedRoots {
                    roots,
                    unresolved: state.unresolved().len(),
                });
            }
            if state.is_resolved() {
                break;
            }

            let candidates = find_latent_roots(state, probe);
            if candidates.is_empty() {
                warn!(unresolved = ?state.unresolved(), "no observed or latent root left");
                return Ok(ResolutionStatus::Stalled {
                    unresolved: state.unresolved().to_vec(),
                });
            }
            let groups = merge_overlaps(state, probe, &candidates);
            let groups = select_true_roots(groups, state, self.config.support_threshold);
            let removal = remove_latent_roots(state, probe, &groups)?;
            let unresolved = state.unresolved().len();

            match removal {
                LatentRemoval::Continue => {
                    trace.record(TraceStep::LatentRoots { groups, unresolved });
                }
                LatentRemoval::Halted { group } => {
                    // The halted group and every later one never got a column.
                    let pending = groups
                        .iter()
                        .position(|g| *g == group)
                        .map_or(&groups[..0], |p| &groups[p..]);
                    let mut left: Vec<usize> = state.unresolved().to_vec();
                    left.extend(pending.iter().flatten().copied());
                    left.sort_unstable();
                    left.dedup();

                    trace.record(TraceStep::LatentRoots { groups, unresolved });
                    trace.record(TraceStep::Halted { group, unresolved });
                    return Ok(ResolutionStatus::NonIdentifiable { unresolved: left });
                }
            }
        }
        Ok(ResolutionStatus::Complete)
    }
}

/// Pad `mixing` with zero rows to a square matrix, add unit edges between
/// latents whose indicators all depend on an earlier latent and set every
/// latent's own effect to one.
fn complete_mixing(
    mut mixing: Array2<f64>,
    latent_indicators: &BTreeMap<usize, Vec<usize>>,
    n_observed: usize,
    threshold: f64,
) -> DiscoveryResult<Array2<f64>> {
    let size = mixing.ncols();
    for _ in mixing.nrows()..size {
        mixing.push_row(Array1::<f64>::zeros(size).view())?;
    }

    for i in n_observed..size {
        for j in i + 1..size {
            let Some(rows) = latent_indicators.get(&j) else {
                continue;
            };
            if rows.iter().all(|&r| mixing[[r, i]].abs() > threshold) {
                mixing[[j, i]] = 1.0;
                debug!(parent = i, child = j, "latent to latent edge");
            }
        }
    }
    for i in n_observed..size {
        mixing[[i, i]] = 1.0;
    }
    Ok(mixing)
}
