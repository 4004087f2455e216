//! Engine configuration

use crate::error::{EngineError, EngineResult};
use fot_hypothesis::{AggregationConfig, ClinicalContext, EncoderConfig};
use fot_readiness::{AudioGateThresholds, ImageGateThresholds, ReadinessConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every tunable of the engine. Missing sections take their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed RNG seed for reproducible phases and perturbations.
    pub seed: Option<u64>,
    pub readiness: ReadinessConfig,
    pub image_gate: ImageGateThresholds,
    pub audio_gate: AudioGateThresholds,
    pub encoder: EncoderConfig,
    pub aggregation: AggregationConfig,
    pub context: ClinicalContext,
    pub evolution: EvolutionConfig,
}

/// Simulated-time settings for the assess pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub time_step: f64,
    /// Steps applied before scoring. Zero scores the encoded state.
    pub steps: u32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            time_step: 0.1,
            steps: 0,
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> EngineResult<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> EngineResult<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.encoder.dimension == 0 {
            return Err(EngineError::Config("encoder.dimension must be positive".into()));
        }
        let t = self.evolution.time_step;
        if !t.is_finite() || t < 0.0 {
            return Err(EngineError::Config(format!(
                "evolution.time_step must be a non-negative number, got {t}"
            )));
        }
        let agg = &self.aggregation;
        if agg.measure_threshold > agg.collapse_threshold {
            return Err(EngineError::Config(
                "aggregation.measure_threshold exceeds collapse_threshold".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.encoder.dimension, 1024);
        assert_eq!(config.evolution.time_step, 0.1);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_config() {
        let config = EngineConfig::load("/nonexistent/path/fot.toml").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            seed = 7

            [encoder]
            dimension = 64

            [readiness]
            near_miss_factor = 0.75
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.encoder.dimension, 64);
        assert_eq!(config.encoder.hypothesis_seed, 0.1);
        assert_eq!(config.readiness.near_miss_factor, 0.75);
        assert_eq!(config.readiness.gap_penalty, 0.1);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        assert!(matches!(
            EngineConfig::from_toml("encoder = 3"),
            Err(EngineError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml("[encoder]\ndimension = 0"),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn toml_round_trip() {
        let config = EngineConfig::default().with_seed(42);
        let text = config.to_toml().unwrap();
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("fot-engine-{}.toml", std::process::id()));
        std::fs::write(&path, "[evolution]\nsteps = 3\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.evolution.steps, 3);
    }
}
