//! Discovery configuration.

use maple_causal_stats::StatsConfig;
use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, DiscoveryResult};

/// Configuration for a discovery run.
///
/// Deserializable from any serde format; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Settings for the default statistical primitives.
    pub stats: StatsConfig,
    /// Effects with magnitude at or below this are treated as absent when
    /// counting latent ancestors and inferring latent-to-latent edges.
    /// Default: 0.01.
    pub support_threshold: f64,
    /// Minimum number of observations accepted by [`SampleTable`](crate::data::SampleTable).
    pub min_samples: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            stats: StatsConfig::default(),
            support_threshold: super::DEFAULT_SUPPORT_THRESHOLD,
            min_samples: super::DEFAULT_MIN_SAMPLES,
        }
    }
}

impl DiscoveryConfig {
    /// Parse a JSON document, filling unspecified fields with defaults.
    pub fn from_json_str(json: &str) -> DiscoveryResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DiscoveryResult<()> {
        self.stats.validate()?;
        if !self.support_threshold.is_finite() || self.support_threshold < 0.0 {
            return Err(DiscoveryError::InvalidConfig(format!(
                "support_threshold must be a non-negative number, got {}",
                self.support_threshold
            )));
        }
        if self.min_samples < 3 {
            return Err(DiscoveryError::InvalidConfig(format!(
                "min_samples must be at least 3, got {}",
                self.min_samples
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = DiscoveryConfig::default();
        assert!((cfg.support_threshold - 0.01).abs() < f64::EPSILON);
        assert_eq!(cfg.min_samples, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_json_fills_defaults() {
        let cfg = DiscoveryConfig::from_json_str(
            r#"{"support_threshold": 0.05, "stats": {"independence_alpha": 0.001}}"#,
        )
        .unwrap();
        assert!((cfg.support_threshold - 0.05).abs() < f64::EPSILON);
        assert!((cfg.stats.independence_alpha - 0.001).abs() < f64::EPSILON);
        assert!((cfg.stats.correlation_alpha - 0.01).abs() < f64::EPSILON);
        assert_eq!(cfg.min_samples, 10);
    }

    #[test]
    fn from_json_rejects_invalid_values() {
        assert!(DiscoveryConfig::from_json_str(r#"{"support_threshold": -1.0}"#).is_err());
        assert!(DiscoveryConfig::from_json_str(r#"{"min_samples": 2}"#).is_err());
        assert!(matches!(
            DiscoveryConfig::from_json_str(r#"{"stats": {"correlation_alpha": 1.0}}"#),
            Err(DiscoveryError::Stats(_))
        ));
        assert!(DiscoveryConfig::from_json_str("{").is_err());
    }

    #[test]
    fn serialization_roundtrip() {
        let cfg = DiscoveryConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let restored: DiscoveryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cfg);
    }
}
