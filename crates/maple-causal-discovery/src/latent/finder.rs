//! Latent-root candidates.
//!
//! An unresolved variable `i` is a candidate when, for every pair `(j, k)`
//! of other unresolved variables both correlated with `Õ[i]`,
//!
//! ```text
//!   pr(O[j], O[k], Õ[i])  ⫫  Õ[i]
//! ```
//!
//! Whatever `i` shares with `j` and `k` then comes through a single common
//! source: a latent parent for which `i` is a homologous indicator.

use tracing::debug;

use crate::probe::Probe;
use crate::state::DiscoveryState;

/// All latent-root candidates among the unresolved variables. Pure query.
pub fn find_latent_roots(state: &DiscoveryState, probe: &Probe<'_>) -> Vec<usize> {
    let unresolved = state.unresolved();
    let candidates: Vec<usize> = unresolved
        .iter()
        .copied()
        .filter(|&i| {
            let ri = state.residual(i);
            let partners: Vec<usize> = unresolved
                .iter()
                .copied()
                .filter(|&j| j != i && probe.correlated(ri, state.observed(j)))
                .collect();
            partners.iter().enumerate().all(|(a, &j)| {
                partners[a + 1..].iter().all(|&k| {
                    probe.residual_independent(state.observed(j), state.observed(k), ri)
                })
            })
        })
        .collect();
    debug!(?candidates, unresolved = unresolved.len(), "latent root scan");
    candidates
}
