//! Latent roots: candidates, grouping and effect estimation.

pub mod estimator;
pub mod finder;
pub mod grouping;

pub use estimator::{remove_latent_roots, EffectEstimator, LatentRemoval};
pub use finder::find_latent_roots;
pub use grouping::{merge_overlaps, select_true_roots};
