//! Effect estimation and removal of latent roots.
//!
//! For a group with first member `i`, the effect of the latent on `O[i]` is
//! taken as the median of a pool of estimates:
//!
//! ```text
//!   group size ≥ 2 ──► second-order pool (covariance ratios through j = group[1])
//!         │ empty
//!         ▼
//!   higher-order pool (cum22 / cum31 ratios against every correlated j)
//!         │ empty
//!         ▼
//!   non-identifiable: halt
//! ```
//!
//! Once `M[i, L]` is known every other correlated variable `k` gets
//! `M[k, L] = cov(Õ[i], O[k]) / M[i, L]` and is residualized on `Õ[i]`.

use maple_causal_stats::{covariance, median};
use tracing::{debug, warn};

use crate::error::DiscoveryResult;
use crate::probe::Probe;
use crate::state::DiscoveryState;

/// Outcome of a latent removal batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LatentRemoval {
    /// Every group received a latent column.
    Continue,
    /// No estimate was available for `group`; later groups were not processed.
    Halted { group: Vec<usize> },
}

/// Estimates the effect of a latent root on its first homologous indicator.
#[derive(Clone, Copy, Debug)]
pub struct EffectEstimator<'a> {
    probe: Probe<'a>,
}

impl<'a> EffectEstimator<'a> {
    pub fn new(probe: Probe<'a>) -> Self {
        Self { probe }
    }

    /// Median of the estimate pool, or `None` when the pool is empty.
    ///
    /// `candidates` are the variables the pools range over (the group
    /// followed by the unresolved set).
    pub fn estimate(
        &self,
        state: &DiscoveryState,
        group: &[usize],
        candidates: &[usize],
    ) -> DiscoveryResult<Option<f64>> {
        let mut pool = self.second_order_pool(state, group, candidates)?;
        if pool.is_empty() {
            pool = self.higher_order_pool(state, group[0], candidates)?;
            debug!(root = group[0], estimates = pool.len(), "higher-order pool");
        } else {
            debug!(root = group[0], estimates = pool.len(), "second-order pool");
        }
        Ok(median(&pool))
    }

    /// `sqrt(cov(Õ[i], O[j]) · cov(Õ[i], O[k]) / cov(Õ[j], O[k]))` for every
    /// `k` correlated with both `Õ[i]` and `Õ[j]`.
    pub fn second_order_pool(
        &self,
        state: &DiscoveryState,
        group: &[usize],
        candidates: &[usize],
    ) -> DiscoveryResult<Vec<f64>> {
        let mut pool = Vec::new();
        let (i, j) = match group {
            [i, j, ..] => (*i, *j),
            _ => return Ok(pool),
        };
        let (ri, rj) = (state.residual(i), state.residual(j));
        for &k in candidates {
            if k == i || k == j {
                continue;
            }
            let ok = state.observed(k);
            if !self.probe.correlated(ri, ok) || !self.probe.correlated(rj, ok) {
                continue;
            }
            let denominator = covariance(rj, ok)?;
            if denominator == 0.0 {
                continue;
            }
            let product = covariance(ri, state.observed(j))?;
            let quotient = covariance(ri, ok)? / denominator;
            push_root(&mut pool, product * quotient);
        }
        Ok(pool)
    }

    /// Cumulant-ratio estimates against every `j` correlated with `Õ[i]`.
    pub fn higher_order_pool(
        &self,
        state: &DiscoveryState,
        i: usize,
        candidates: &[usize],
    ) -> DiscoveryResult<Vec<f64>> {
        let mut pool = Vec::new();
        let ri = state.residual(i);
        for &j in candidates {
            let oj = state.observed(j);
            if j == i || !self.probe.correlated(ri, oj) {
                continue;
            }
            let product = covariance(ri, oj)?;
            let (Some(c22), Some(c31_ij), Some(c31_ji)) = (
                self.probe.cum22(ri, oj),
                self.probe.cum31(ri, oj),
                self.probe.cum31(oj, ri),
            ) else {
                continue;
            };

            if c31_ji != 0.0 {
                push_root(&mut pool, product * (c22 / c31_ji));
            }
            if c22 != 0.0 {
                push_root(&mut pool, product * (c31_ij / c22));
            }
            if c31_ji != 0.0 {
                let squared = c31_ij / c31_ji;
                if squared > 0.0 {
                    let quotient = product.signum() * squared.sqrt();
                    push_root(&mut pool, product * quotient);
                }
            }
        }
        Ok(pool)
    }
}

fn push_root(pool: &mut Vec<f64>, value: f64) {
    if value > 0.0 && value.is_finite() {
        pool.push(value.sqrt());
    }
}

/// Resolve every group member, then give each group (in order) a latent
/// column and residualize its dependents.
///
/// Halts at the first group without any estimate; columns appended for
/// earlier groups are kept.
pub fn remove_latent_roots(
    state: &mut DiscoveryState,
    probe: &Probe<'_>,
    groups: &[Vec<usize>],
) -> DiscoveryResult<LatentRemoval> {
    for group in groups {
        state.resolve(group);
    }
    let estimator = EffectEstimator::new(*probe);

    for group in groups {
        let Some(&i) = group.first() else {
            continue;
        };
        let candidates: Vec<usize> = group
            .iter()
            .chain(state.unresolved())
            .copied()
            .collect();

        let Some(effect) = estimator.estimate(state, group, &candidates)? else {
            warn!(?group, "no effect estimate for latent root, halting");
            return Ok(LatentRemoval::Halted {
                group: group.clone(),
            });
        };

        let column = state.append_latent(group.clone())?;
        state.set_effect(i, column, effect);
        debug!(?group, column, effect, "latent root");

        for &k in &candidates {
            if k == i || !probe.correlated(state.residual(i), state.observed(k)) {
                continue;
            }
            let loading = covariance(state.residual(i), state.observed(k))? / effect;
            state.set_effect(k, column, loading);
            state.residualize(k, i, loading / effect);
            debug!(target = k, column, effect = loading, "latent effect");
        }
    }
    Ok(LatentRemoval::Continue)
}
