//! Working state of a single discovery run.
//!
//! ```text
//!   observed   O  (n × samples)   immutable
//!   residual   Õ  (n × samples)   rows residualized as roots resolve
//!   unresolved    [usize]         shrinks monotonically
//!   mixing     M  (n × n+latent)  one column appended per latent
//!   latent map    col → indicators
//! ```

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::DiscoveryResult;

/// All mutable bookkeeping of one run, owned exclusively by it.
#[derive(Clone, Debug)]
pub struct DiscoveryState {
    observed: Array2<f64>,
    residual: Array2<f64>,
    unresolved: Vec<usize>,
    mixing: Array2<f64>,
    latent_indicators: BTreeMap<usize, Vec<usize>>,
}

impl DiscoveryState {
    /// Start a run over a variables × samples matrix.
    pub fn new(observed: Array2<f64>) -> Self {
        let n = observed.nrows();
        Self {
            residual: observed.clone(),
            observed,
            unresolved: (0..n).collect(),
            mixing: Array2::eye(n),
            latent_indicators: BTreeMap::new(),
        }
    }

    pub fn n_observed(&self) -> usize {
        self.observed.nrows()
    }

    /// Latent columns appended so far.
    pub fn n_latent(&self) -> usize {
        self.mixing.ncols() - self.n_observed()
    }

    /// Raw sample vector `O[i]`.
    pub fn observed(&self, i: usize) -> ArrayView1<'_, f64> {
        self.observed.row(i)
    }

    /// Residualized sample vector `Õ[i]`.
    pub fn residual(&self, i: usize) -> ArrayView1<'_, f64> {
        self.residual.row(i)
    }

    /// Indices not yet classified as a root, in ascending order.
    pub fn unresolved(&self) -> &[usize] {
        &self.unresolved
    }

    pub fn is_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Permanently drop `indices` from the unresolved set.
    pub fn resolve(&mut self, indices: &[usize]) {
        self.unresolved.retain(|i| !indices.contains(i));
    }

    pub fn mixing(&self) -> &Array2<f64> {
        &self.mixing
    }

    pub fn effect(&self, target: usize, source: usize) -> f64 {
        self.mixing[[target, source]]
    }

    pub fn set_effect(&mut self, target: usize, source: usize, value: f64) {
        self.mixing[[target, source]] = value;
    }

    /// `Õ[target] -= coefficient · Õ[source]`.
    pub fn residualize(&mut self, target: usize, source: usize, coefficient: f64) {
        let source_row: Array1<f64> = self.residual.row(source).to_owned();
        self.residual
            .row_mut(target)
            .scaled_add(-coefficient, &source_row);
    }

    /// Append a zero column for a new latent variable and record its
    /// indicators. Returns the new column index.
    pub fn append_latent(&mut self, indicators: Vec<usize>) -> DiscoveryResult<usize> {
        let column = Array1::<f64>::zeros(self.mixing.nrows());
        self.mixing.push_column(column.view())?;
        let index = self.mixing.ncols() - 1;
        self.latent_indicators.insert(index, indicators);
        Ok(index)
    }

    pub fn latent_indicators(&self) -> &BTreeMap<usize, Vec<usize>> {
        &self.latent_indicators
    }

    /// Number of latent columns with an effect on `row` above `threshold`.
    pub fn latent_ancestor_count(&self, row: usize, threshold: f64) -> usize {
        (self.n_observed()..self.mixing.ncols())
            .filter(|&c| self.mixing[[row, c]].abs() > threshold)
            .count()
    }

    /// Hand the mixing matrix and latent map over for post-processing.
    pub fn into_parts(self) -> (Array2<f64>, BTreeMap<usize, Vec<usize>>, Vec<usize>) {
        (self.mixing, self.latent_indicators, self.unresolved)
    }
}
