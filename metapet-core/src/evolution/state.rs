//! Lifecycle stages and the requirements gating each transition

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stages, forward-only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvolutionState {
    #[default]
    Genetics,
    Neuro,
    Quantum,
    Speciation,
}

impl EvolutionState {
    pub const ORDER: [EvolutionState; 4] = [
        EvolutionState::Genetics,
        EvolutionState::Neuro,
        EvolutionState::Quantum,
        EvolutionState::Speciation,
    ];

    pub fn index(self) -> usize {
        match self {
            EvolutionState::Genetics => 0,
            EvolutionState::Neuro => 1,
            EvolutionState::Quantum => 2,
            EvolutionState::Speciation => 3,
        }
    }

    /// Next stage, or `None` at SPECIATION
    pub fn next(self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == EvolutionState::Speciation
    }
}

impl fmt::Display for EvolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvolutionState::Genetics => "GENETICS",
            EvolutionState::Neuro => "NEURO",
            EvolutionState::Quantum => "QUANTUM",
            EvolutionState::Speciation => "SPECIATION",
        };
        f.write_str(name)
    }
}

/// Extra predicate a stage may demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SpecialRequirement {
    /// Experience gauge at or above the value
    ExperienceAtLeast(f64),
    /// Seconds since birth, cumulative across stages
    LifetimeAtLeastSecs(i64),
}

/// What a companion needs to enter a stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionRequirement {
    /// Seconds spent in the current stage
    pub min_age_secs: i64,
    pub min_interactions: u64,
    /// 0–100
    pub min_vitals_average: f64,
    pub special: Option<SpecialRequirement>,
}

impl EvolutionRequirement {
    pub fn min_age(&self) -> Duration {
        Duration::seconds(self.min_age_secs)
    }
}

const HOUR: i64 = 3_600;

/// Requirement table for every non-initial stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionRules {
    pub neuro: EvolutionRequirement,
    pub quantum: EvolutionRequirement,
    pub speciation: EvolutionRequirement,
}

impl Default for EvolutionRules {
    fn default() -> Self {
        Self {
            neuro: EvolutionRequirement {
                min_age_secs: 24 * HOUR,
                min_interactions: 10,
                min_vitals_average: 50.0,
                special: None,
            },
            quantum: EvolutionRequirement {
                min_age_secs: 72 * HOUR,
                min_interactions: 50,
                min_vitals_average: 60.0,
                special: Some(SpecialRequirement::ExperienceAtLeast(50.0)),
            },
            speciation: EvolutionRequirement {
                min_age_secs: 168 * HOUR,
                min_interactions: 150,
                min_vitals_average: 75.0,
                special: Some(SpecialRequirement::ExperienceAtLeast(100.0)),
            },
        }
    }
}

impl EvolutionRules {
    /// Requirement for entering `state`; GENETICS has none
    pub fn requirement(&self, state: EvolutionState) -> Option<&EvolutionRequirement> {
        match state {
            EvolutionState::Genetics => None,
            EvolutionState::Neuro => Some(&self.neuro),
            EvolutionState::Quantum => Some(&self.quantum),
            EvolutionState::Speciation => Some(&self.speciation),
        }
    }

    /// Requirements listed in stage order
    pub fn iter(&self) -> impl Iterator<Item = (EvolutionState, &EvolutionRequirement)> + '_ {
        EvolutionState::ORDER
            .into_iter()
            .filter_map(move |s| self.requirement(s).map(|r| (s, r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        assert_eq!(EvolutionState::Genetics.next(), Some(EvolutionState::Neuro));
        assert_eq!(EvolutionState::Quantum.next(), Some(EvolutionState::Speciation));
        assert_eq!(EvolutionState::Speciation.next(), None);
        assert!(EvolutionState::Genetics < EvolutionState::Speciation);
        for (i, s) in EvolutionState::ORDER.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&EvolutionState::Speciation).unwrap();
        assert_eq!(json, "\"SPECIATION\"");
        let back: EvolutionState = serde_json::from_str("\"NEURO\"").unwrap();
        assert_eq!(back, EvolutionState::Neuro);
        assert_eq!(EvolutionState::Quantum.to_string(), "QUANTUM");
    }

    #[test]
    fn test_default_rules_escalate() {
        let rules = EvolutionRules::default();
        assert!(rules.requirement(EvolutionState::Genetics).is_none());
        let reqs: Vec<_> = rules.iter().map(|(_, r)| *r).collect();
        assert_eq!(reqs.len(), 3);
        for pair in reqs.windows(2) {
            assert!(pair[0].min_interactions < pair[1].min_interactions);
            assert!(pair[0].min_age_secs < pair[1].min_age_secs);
        }
        assert_eq!(rules.neuro.min_age(), Duration::hours(24));
    }
}
