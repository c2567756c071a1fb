//! Observed roots: detection and removal.
//!
//! An unresolved variable `i` is an observed root when every unresolved `j`
//! correlated with `Õ[i]` satisfies
//!
//! ```text
//!   pr(O[j], O[i], Õ[i])  ⫫  Õ[i]
//! ```
//!
//! i.e. whatever `j` shares with `i` flows out of `i` and nothing flows in.

use maple_causal_stats::covariance;
use tracing::debug;

use crate::error::DiscoveryResult;
use crate::probe::Probe;
use crate::state::DiscoveryState;

/// Unresolved variables with no unresolved parent. Pure query.
pub fn find_observed_roots(state: &DiscoveryState, probe: &Probe<'_>) -> Vec<usize> {
    let unresolved = state.unresolved();
    let roots: Vec<usize> = unresolved
        .iter()
        .copied()
        .filter(|&i| {
            let ri = state.residual(i);
            unresolved.iter().all(|&j| {
                if i == j || !probe.correlated(ri, state.observed(j)) {
                    return true;
                }
                probe.residual_independent(state.observed(j), state.observed(i), ri)
            })
        })
        .collect();
    debug!(?roots, unresolved = unresolved.len(), "observed root scan");
    roots
}

/// Resolve `roots`, estimate their effects on the remaining variables and
/// residualize those variables.
///
/// All roots leave the unresolved set before any effect is estimated, so a
/// root found in this batch never receives an effect from another one.
pub fn remove_observed_roots(
    state: &mut DiscoveryState,
    probe: &Probe<'_>,
    roots: &[usize],
) -> DiscoveryResult<()> {
    state.resolve(roots);
    for &i in roots {
        let denominator = covariance(state.residual(i), state.observed(i))?;
        if denominator == 0.0 {
            debug!(root = i, "zero self-covariance, effects skipped");
            continue;
        }
        let dependents: Vec<usize> = state.unresolved().to_vec();
        for j in dependents {
            if !probe.correlated(state.residual(i), state.observed(j)) {
                continue;
            }
            let effect = covariance(state.residual(i), state.observed(j))? / denominator;
            state.set_effect(j, i, effect);
            state.residualize(j, i, effect);
            debug!(source = i, target = j, effect, "observed effect");
        }
    }
    Ok(())
}
