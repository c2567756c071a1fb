//! Grouping of latent-root candidates.
//!
//! ```text
//!   candidates ──► merge_overlaps ──► groups ──► select_true_roots ──► groups'
//!                  (one per latent)              (fewest latent ancestors)
//! ```

use tracing::debug;

use crate::probe::Probe;
use crate::state::DiscoveryState;

/// Group candidates that indicate the same latent variable.
///
/// Single greedy pass in candidate order: a candidate joins the first group
/// whose representative (its first member) `r` satisfies
/// `correlation(Õ[r], O[candidate])`, otherwise it opens a new group. The
/// relation is not closed transitively.
pub fn merge_overlaps(
    state: &DiscoveryState,
    probe: &Probe<'_>,
    candidates: &[usize],
) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &candidate in candidates {
        let target = groups
            .iter_mut()
            .find(|g| probe.correlated(state.residual(g[0]), state.observed(candidate)));
        match target {
            Some(group) => group.push(candidate),
            None => groups.push(vec![candidate]),
        }
    }
    debug!(?groups, "merged latent candidates");
    groups
}

/// Keep, within each group, the members with the fewest latent ancestors.
///
/// Before any latent has been found every count is zero and the groups pass
/// through unchanged. Ancestors are latent columns whose effect on the
/// member exceeds `threshold` in magnitude.
pub fn select_true_roots(
    groups: Vec<Vec<usize>>,
    state: &DiscoveryState,
    threshold: f64,
) -> Vec<Vec<usize>> {
    if state.n_latent() == 0 {
        return groups;
    }
    let selected: Vec<Vec<usize>> = groups
        .into_iter()
        .map(|group| {
            let counts: Vec<usize> = group
                .iter()
                .map(|&m| state.latent_ancestor_count(m, threshold))
                .collect();
            let fewest = counts.iter().copied().min().unwrap_or(0);
            group
                .into_iter()
                .zip(counts)
                .filter(|&(_, c)| c == fewest)
                .map(|(m, _)| m)
                .collect()
        })
        .collect();
    debug!(groups = ?selected, "selected true latent roots");
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{oracle_suite, Oracle};
    use ndarray::{array, Array2};

    fn table() -> Array2<f64> {
        array![
            [1.0, 2.0, -1.0, 0.5, -2.5],
            [0.5, 1.5, -0.5, 1.0, -2.0],
            [2.0, 1.0, -2.0, 0.0, -1.0],
            [-1.0, 0.0, 1.0, 3.0, 0.5],
        ]
    }

    #[test]
    fn three_indicators_and_a_singleton() {
        let oracle = Oracle::new(&table())
            .correlate(0, 1)
            .correlate(0, 2)
            .correlate(1, 2);
        let suite = oracle_suite(oracle);
        let state = DiscoveryState::new(table());
        let groups = merge_overlaps(&state, &Probe::new(&suite), &[0, 1, 2, 3]);
        assert_eq!(groups, vec![vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn grouping_is_not_transitive() {
        // 1 and 2 are only linked through each other, not through 0.
        let oracle = Oracle::new(&table()).correlate(0, 1).correlate(1, 2);
        let suite = oracle_suite(oracle);
        let state = DiscoveryState::new(table());
        let groups = merge_overlaps(&state, &Probe::new(&suite), &[0, 1, 2]);
        assert_eq!(groups, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn candidate_order_decides_representatives() {
        let oracle = Oracle::new(&table()).correlate(0, 1).correlate(1, 2);
        let suite = oracle_suite(oracle);
        let state = DiscoveryState::new(table());
        let groups = merge_overlaps(&state, &Probe::new(&suite), &[1, 0, 2]);
        assert_eq!(groups, vec![vec![1, 0, 2]]);
    }

    #[test]
    fn no_latents_means_groups_unchanged() {
        let state = DiscoveryState::new(table());
        let groups = vec![vec![2, 0], vec![3]];
        assert_eq!(select_true_roots(groups.clone(), &state, 0.01), groups);
    }

    #[test]
    fn keeps_members_with_fewest_latent_ancestors() {
        let mut state = DiscoveryState::new(table());
        let l1 = state.append_latent(vec![0]).unwrap();
        let l2 = state.append_latent(vec![1]).unwrap();
        state.set_effect(1, l1, 0.8);
        state.set_effect(2, l1, 0.7);
        state.set_effect(2, l2, 0.6);
        state.set_effect(3, l2, 0.005);

        let groups = vec![vec![1, 2, 3], vec![2, 1]];
        let selected = select_true_roots(groups, &state, 0.01);
        // 3 counts zero (0.005 is below threshold); 1 beats 2 in the second group.
        assert_eq!(selected, vec![vec![3], vec![1]]);
    }

    #[test]
    fn ties_keep_every_member_in_order() {
        let mut state = DiscoveryState::new(table());
        let l1 = state.append_latent(vec![0]).unwrap();
        state.set_effect(2, l1, 0.5);
        state.set_effect(3, l1, 0.5);
        let selected = select_true_roots(vec![vec![3, 2]], &state, 0.01);
        assert_eq!(selected, vec![vec![3, 2]]);
    }
}
