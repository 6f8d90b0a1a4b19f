//! CoreConfig — every tunable of the core, serde-loadable
//!
//! The core reads no files; callers hand in JSON text.

use crate::breeding::BreedingConfig;
use crate::evolution::{EvolutionRules, SpecialRequirement, VitalsConfig, MAX_EXPERIENCE};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub breeding: BreedingConfig,
    pub evolution: EvolutionRules,
    pub vitals: VitalsConfig,
}

impl CoreConfig {
    /// Parse and validate; missing sections fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.breeding;
        if !(0.0..=1.0).contains(&b.dominance_probability) {
            return Err(ConfigError::Invalid(format!(
                "dominance_probability {} outside [0,1]",
                b.dominance_probability
            )));
        }
        if !(0.0 <= b.mutation_rate_min && b.mutation_rate_min <= b.mutation_rate_max && b.mutation_rate_max <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "mutation range [{}, {}) is not within [0,1]",
                b.mutation_rate_min, b.mutation_rate_max
            )));
        }

        let v = &self.vitals;
        for (name, value) in [
            ("hunger_decay", v.hunger_decay),
            ("hygiene_decay", v.hygiene_decay),
            ("mood_decay", v.mood_decay),
            ("energy_decay", v.energy_decay),
            ("jitter", v.jitter),
            ("care_amount", v.care_amount),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("vitals.{} must be a non-negative number, got {}", name, value)));
            }
        }

        let mut previous_interactions = 0;
        for (state, req) in self.evolution.iter() {
            if req.min_interactions < previous_interactions {
                return Err(ConfigError::Invalid(format!(
                    "{}: min_interactions {} below the previous stage's {}",
                    state, req.min_interactions, previous_interactions
                )));
            }
            previous_interactions = req.min_interactions;
            if req.min_age_secs < 0 {
                return Err(ConfigError::Invalid(format!("{}: negative min_age_secs", state)));
            }
            if !(0.0..=100.0).contains(&req.min_vitals_average) {
                return Err(ConfigError::Invalid(format!(
                    "{}: min_vitals_average {} outside [0,100]",
                    state, req.min_vitals_average
                )));
            }
            if let Some(SpecialRequirement::ExperienceAtLeast(xp)) = req.special {
                if xp > MAX_EXPERIENCE {
                    return Err(ConfigError::Invalid(format!(
                        "{}: experience requirement {} can never be met",
                        state, xp
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = CoreConfig::from_json_str(r#"{"breeding":{"dominance_probability":0.9,"mutation_rate_min":0.05,"mutation_rate_max":0.1,"preview_salt":"p"}}"#).unwrap();
        assert_eq!(cfg.breeding.dominance_probability, 0.9);
        assert_eq!(cfg.evolution, EvolutionRules::default());
        assert_eq!(CoreConfig::from_json_str("{}").unwrap(), CoreConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let json = CoreConfig::default().to_json_pretty().unwrap();
        assert_eq!(CoreConfig::from_json_str(&json).unwrap(), CoreConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut cfg = CoreConfig::default();
        cfg.breeding.dominance_probability = 1.5;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = CoreConfig::default();
        cfg.breeding.mutation_rate_min = 0.2;
        assert!(cfg.validate().is_err());

        let mut cfg = CoreConfig::default();
        cfg.evolution.quantum.min_interactions = 5;
        assert!(cfg.validate().is_err());

        let mut cfg = CoreConfig::default();
        cfg.evolution.speciation.special = Some(SpecialRequirement::ExperienceAtLeast(150.0));
        assert!(cfg.validate().is_err());

        assert!(matches!(CoreConfig::from_json_str("not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_negative_vitals() {
        let mut cfg = CoreConfig::default();
        cfg.vitals.hunger_decay = -1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = CoreConfig::default();
        cfg.vitals.care_amount = -25.0;
        assert!(cfg.validate().is_err());

        let mut cfg = CoreConfig::default();
        cfg.vitals.jitter = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = CoreConfig::default();
        cfg.vitals.jitter = 0.0;
        assert!(cfg.validate().is_ok());
    }
}
