//! Input sample table.
//!
//! Callers hand over observations as rows and variables as columns; the
//! discovery procedure works on the transposed layout where each row is one
//! variable's sample vector.

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{DiscoveryError, DiscoveryResult};

/// Validated observations of jointly distributed variables.
#[derive(Clone, Debug)]
pub struct SampleTable {
    /// Variables × samples.
    variables: Array2<f64>,
    /// One name per variable.
    names: Vec<String>,
}

impl SampleTable {
    /// Build from an observations × variables matrix with generated names
    /// (`X0`, `X1`, …).
    pub fn from_observations(
        observations: ArrayView2<'_, f64>,
        min_samples: usize,
    ) -> DiscoveryResult<Self> {
        let names = (0..observations.ncols()).map(|i| format!("X{i}")).collect();
        Self::with_names(observations, names, min_samples)
    }

    /// Build from an observations × variables matrix with explicit names.
    pub fn with_names(
        observations: ArrayView2<'_, f64>,
        names: Vec<String>,
        min_samples: usize,
    ) -> DiscoveryResult<Self> {
        let (n_samples, n_variables) = observations.dim();
        if n_samples == 0 || n_variables == 0 {
            return Err(DiscoveryError::EmptyTable);
        }
        if n_samples < min_samples {
            return Err(DiscoveryError::InsufficientSamples {
                got: n_samples,
                need: min_samples,
            });
        }
        if names.len() != n_variables {
            return Err(DiscoveryError::NameCountMismatch {
                names: names.len(),
                variables: n_variables,
            });
        }
        let non_finite = observations.indexed_iter().find(|(_, v)| !v.is_finite());
        if let Some(((row, column), _)) = non_finite {
            return Err(DiscoveryError::NonFiniteValue { row, column });
        }

        Ok(Self {
            variables: observations.t().as_standard_layout().into_owned(),
            names,
        })
    }

    /// Build from row-major observations (`rows[observation][variable]`).
    pub fn from_rows(rows: &[Vec<f64>], min_samples: usize) -> DiscoveryResult<Self> {
        let expected = rows
            .first()
            .map(Vec::len)
            .ok_or(DiscoveryError::EmptyTable)?;
        if let Some(row) = rows.iter().position(|r| r.len() != expected) {
            return Err(DiscoveryError::RaggedRow {
                row,
                got: rows[row].len(),
                expected,
            });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let observations = Array2::from_shape_vec((rows.len(), expected), flat)?;
        Self::from_observations(observations.view(), min_samples)
    }

    pub fn n_variables(&self) -> usize {
        self.variables.nrows()
    }

    pub fn n_samples(&self) -> usize {
        self.variables.ncols()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Sample vector of one variable.
    pub fn variable(&self, index: usize) -> ArrayView1<'_, f64> {
        self.variables.row(index)
    }

    /// Variables × samples matrix.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.variables
    }

    pub(crate) fn into_parts(self) -> (Array2<f64>, Vec<String>) {
        (self.variables, self.names)
    }
}
