//! Result of a discovery run.
//!
//! The mixing matrix is square over `n_observed + n_latent` variables, with
//! observed variables first:
//!
//! ```text
//!            observed    latent
//!          ┌──────────┬──────────┐
//! observed │  M^O_O   │  M^L_O   │
//!          ├──────────┼──────────┤
//!   latent │    0     │  M^L_L   │
//!          └──────────┴──────────┘
//! ```
//!
//! `M[target, source]` is the linear effect of `source` on `target`.

use std::collections::BTreeMap;
use std::ops::Range;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Every variable was classified as a root.
    Complete,
    /// No latent-root candidate was found for the remaining variables.
    Stalled { unresolved: Vec<usize> },
    /// A latent root was found but no estimate of its effect exists.
    NonIdentifiable { unresolved: Vec<usize> },
}

impl ResolutionStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Variables left unclassified.
    pub fn unresolved(&self) -> &[usize] {
        match self {
            Self::Complete => &[],
            Self::Stalled { unresolved } | Self::NonIdentifiable { unresolved } => unresolved,
        }
    }
}

// ── Trace ───────────────────────────────────────────────────────────────

/// One mutation batch of a run. `unresolved` is the count after the batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceStep {
    ObservedRoots {
        roots: Vec<usize>,
        unresolved: usize,
    },
    LatentRoots {
        groups: Vec<Vec<usize>>,
        unresolved: usize,
    },
    Halted {
        group: Vec<usize>,
        unresolved: usize,
    },
}

impl TraceStep {
    pub fn unresolved(&self) -> usize {
        match self {
            Self::ObservedRoots { unresolved, .. }
            | Self::LatentRoots { unresolved, .. }
            | Self::Halted { unresolved, .. } => *unresolved,
        }
    }
}

/// Ordered record of the batches applied during a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTrace {
    steps: Vec<TraceStep>,
}

impl RunTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: TraceStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// Observed roots in discovery order, one entry per batch.
    pub fn observed_batches(&self) -> Vec<&[usize]> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                TraceStep::ObservedRoots { roots, .. } => Some(roots.as_slice()),
                _ => None,
            })
            .collect()
    }
}

// ── Structure ───────────────────────────────────────────────────────────

/// A directed, weighted edge `source → target`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Mixing matrix over observed and latent variables plus run metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CausalStructure {
    pub mixing: Array2<f64>,
    pub n_observed: usize,
    pub n_latent: usize,
    pub status: ResolutionStatus,
    /// Latent column → homologous indicators.
    pub latent_indicators: BTreeMap<usize, Vec<usize>>,
    pub variable_names: Vec<String>,
    pub trace: RunTrace,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CausalStructure {
    pub fn n_variables(&self) -> usize {
        self.n_observed + self.n_latent
    }

    pub fn latent_columns(&self) -> Range<usize> {
        self.n_observed..self.n_variables()
    }

    pub fn is_latent(&self, index: usize) -> bool {
        self.latent_columns().contains(&index)
    }

    /// Effect of `source` on `target`.
    pub fn effect(&self, target: usize, source: usize) -> f64 {
        self.mixing[[target, source]]
    }

    /// Observed variables keep their names; latents are `L1`, `L2`, ….
    pub fn label(&self, index: usize) -> String {
        match self.variable_names.get(index) {
            Some(name) if index < self.n_observed => name.clone(),
            _ => format!("L{}", index.saturating_sub(self.n_observed) + 1),
        }
    }

    /// Off-diagonal effects with magnitude above `threshold`, row-major.
    pub fn edges(&self, threshold: f64) -> Vec<Edge> {
        self.mixing
            .indexed_iter()
            .filter(|&((target, source), w)| target != source && w.abs() > threshold)
            .map(|((target, source), &weight)| Edge {
                source,
                target,
                weight,
            })
            .collect()
    }

    /// Sources with an effect on `index` above `threshold`.
    pub fn parents_of(&self, index: usize, threshold: f64) -> Vec<usize> {
        self.mixing
            .row(index)
            .iter()
            .enumerate()
            .filter(|&(source, w)| source != index && w.abs() > threshold)
            .map(|(source, _)| source)
            .collect()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
