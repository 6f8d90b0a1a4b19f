//! EvolutionData — lifecycle record of one companion
//!
//! Mutated only through two transitions: experience gain and stage advance.
//! Both return a new value; callers treat the record as copy-on-write.
//! Stage age is measured from the last transition, not from birth.

use super::state::{EvolutionRequirement, EvolutionRules, EvolutionState, SpecialRequirement};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

/// Upper bound of the experience gauge
pub const MAX_EXPERIENCE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionData {
    pub state: EvolutionState,
    pub birth_time: DateTime<Utc>,
    pub last_evolution_time: DateTime<Utc>,
    /// 0–100, reset on every advance
    pub experience: f64,
    /// Monotonic; one per interaction regardless of experience gained
    pub total_interactions: u64,
    pub can_evolve: bool,
}

/// Which requirements of the next stage currently hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionProgress {
    pub current: EvolutionState,
    pub next: Option<EvolutionState>,
    pub age_met: bool,
    pub interactions_met: bool,
    pub vitals_met: bool,
    pub special_met: bool,
    /// Seconds left in the stage before the age requirement holds
    pub remaining_secs: i64,
}

impl EvolutionProgress {
    pub fn is_eligible(&self) -> bool {
        self.next.is_some() && self.age_met && self.interactions_met && self.vitals_met && self.special_met
    }
}

impl EvolutionData {
    /// Fresh record at GENETICS
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            state: EvolutionState::Genetics,
            birth_time: now,
            last_evolution_time: now,
            experience: 0.0,
            total_interactions: 0,
            can_evolve: false,
        }
    }

    /// Time spent in the current stage
    pub fn stage_age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_evolution_time).num_seconds().max(0)
    }

    pub fn lifetime_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.birth_time).num_seconds().max(0)
    }

    fn special_holds(&self, special: Option<SpecialRequirement>, now: DateTime<Utc>) -> bool {
        match special {
            None => true,
            Some(SpecialRequirement::ExperienceAtLeast(min)) => self.experience >= min,
            Some(SpecialRequirement::LifetimeAtLeastSecs(min)) => self.lifetime_secs(now) >= min,
        }
    }

    /// Evaluate the next stage's requirements
    pub fn progress(&self, rules: &EvolutionRules, vitals_average: f64, now: DateTime<Utc>) -> EvolutionProgress {
        let next = self.state.next();
        let Some(req) = next.and_then(|s| rules.requirement(s)) else {
            return EvolutionProgress {
                current: self.state,
                next: None,
                age_met: false,
                interactions_met: false,
                vitals_met: false,
                special_met: false,
                remaining_secs: 0,
            };
        };
        let EvolutionRequirement { min_age_secs, min_interactions, min_vitals_average, special } = *req;
        let age = self.stage_age_secs(now);
        EvolutionProgress {
            current: self.state,
            next,
            age_met: age >= min_age_secs,
            interactions_met: self.total_interactions >= min_interactions,
            vitals_met: vitals_average >= min_vitals_average,
            special_met: self.special_holds(special, now),
            remaining_secs: (min_age_secs - age).max(0),
        }
    }

    /// True iff every requirement of the next stage holds; false at SPECIATION
    pub fn check_eligibility_with(&self, rules: &EvolutionRules, vitals_average: f64, now: DateTime<Utc>) -> bool {
        self.progress(rules, vitals_average, now).is_eligible()
    }

    /// Eligibility under the default rules
    pub fn check_eligibility(&self, vitals_average: f64, now: DateTime<Utc>) -> bool {
        self.check_eligibility_with(&EvolutionRules::default(), vitals_average, now)
    }

    /// Copy with `can_evolve` recomputed
    pub fn refreshed(&self, rules: &EvolutionRules, vitals_average: f64, now: DateTime<Utc>) -> Self {
        Self {
            can_evolve: self.check_eligibility_with(rules, vitals_average, now),
            ..self.clone()
        }
    }

    /// Move to the next stage. Identity at SPECIATION.
    pub fn advance(&self, now: DateTime<Utc>) -> Self {
        match self.state.next() {
            None => self.clone(),
            Some(next) => {
                info!("Evolved {} -> {} after {}s", self.state, next, self.stage_age_secs(now));
                Self {
                    state: next,
                    experience: 0.0,
                    last_evolution_time: now,
                    can_evolve: false,
                    ..self.clone()
                }
            }
        }
    }

    /// Add experience (clamped to 0–100) and count one interaction
    pub fn gain_experience(&self, amount: f64) -> Self {
        let gained = if amount.is_finite() { amount } else { 0.0 };
        Self {
            experience: (self.experience + gained).clamp(0.0, MAX_EXPERIENCE),
            total_interactions: self.total_interactions.saturating_add(1),
            ..self.clone()
        }
    }
}

/// The sole breeding gate: both companions at SPECIATION
pub fn can_breed(a: EvolutionState, b: EvolutionState) -> bool {
    a.is_terminal() && b.is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    fn interact(mut evo: EvolutionData, times: u64, amount: f64) -> EvolutionData {
        for _ in 0..times {
            evo = evo.gain_experience(amount);
        }
        evo
    }

    #[test]
    fn test_new_record() {
        let evo = EvolutionData::new(t0());
        assert_eq!(evo.state, EvolutionState::Genetics);
        assert_eq!(evo.experience, 0.0);
        assert_eq!(evo.total_interactions, 0);
        assert!(!evo.can_evolve);
    }

    #[test]
    fn test_gain_experience_clamps_and_counts() {
        let evo = EvolutionData::new(t0());
        let e = evo.gain_experience(70.0).gain_experience(70.0);
        assert_eq!(e.experience, 100.0);
        assert_eq!(e.total_interactions, 2);
        let e = e.gain_experience(0.0);
        assert_eq!(e.total_interactions, 3);
        let e = evo.gain_experience(-5.0);
        assert_eq!(e.experience, 0.0);
        assert_eq!(e.total_interactions, 1);
        // original untouched
        assert_eq!(evo.total_interactions, 0);
    }

    #[test]
    fn test_eligibility_needs_all_requirements() {
        let evo = interact(EvolutionData::new(t0()), 10, 5.0);
        let later = t0() + Duration::hours(24);
        assert!(evo.check_eligibility(50.0, later));
        assert!(!evo.check_eligibility(49.9, later));
        assert!(!evo.check_eligibility(80.0, later - Duration::seconds(1)));
        let fewer = interact(EvolutionData::new(t0()), 9, 5.0);
        assert!(!fewer.check_eligibility(80.0, later));
    }

    #[test]
    fn test_special_requirement() {
        let now = t0() + Duration::hours(100);
        let neuro = EvolutionData { state: EvolutionState::Neuro, ..interact(EvolutionData::new(t0()), 60, 0.5) };
        assert!(neuro.experience < 50.0);
        assert!(!neuro.check_eligibility(90.0, now));
        let trained = interact(neuro, 100, 1.0);
        assert!(trained.check_eligibility(90.0, now));

        let rules = EvolutionRules {
            neuro: EvolutionRequirement {
                special: Some(SpecialRequirement::LifetimeAtLeastSecs(3_600)),
                ..EvolutionRules::default().neuro
            },
            ..EvolutionRules::default()
        };
        let young = EvolutionData::new(t0());
        let p = young.progress(&rules, 100.0, t0() + Duration::minutes(30));
        assert!(!p.special_met);
        assert_eq!(p.remaining_secs, 24 * 3_600 - 30 * 60);
    }

    #[test]
    fn test_age_measured_from_last_transition() {
        let evo = interact(EvolutionData::new(t0()), 60, 1.0);
        let advanced = evo.advance(t0() + Duration::hours(30));
        assert_eq!(advanced.state, EvolutionState::Neuro);
        // 80h after birth but only 50h into NEURO: QUANTUM needs 72h
        let progress = advanced.progress(&EvolutionRules::default(), 100.0, t0() + Duration::hours(80));
        assert!(!progress.age_met);
        assert!(progress.interactions_met);
    }

    #[test]
    fn test_advance_resets_and_is_monotonic() {
        let mut evo = interact(EvolutionData::new(t0()), 3, 40.0);
        evo.can_evolve = true;
        let mut now = t0();
        for expected in [EvolutionState::Neuro, EvolutionState::Quantum, EvolutionState::Speciation] {
            now += Duration::hours(1);
            let next = evo.advance(now);
            assert!(next.state.index() > evo.state.index());
            assert_eq!(next.state, expected);
            assert_eq!(next.experience, 0.0);
            assert_eq!(next.last_evolution_time, now);
            assert!(!next.can_evolve);
            assert_eq!(next.total_interactions, 3);
            evo = next;
        }
        let terminal = evo.advance(now + Duration::hours(1));
        assert_eq!(terminal, evo);
    }

    #[test]
    fn test_terminal_never_eligible() {
        let evo = EvolutionData { state: EvolutionState::Speciation, ..interact(EvolutionData::new(t0()), 500, 100.0) };
        assert!(!evo.check_eligibility(100.0, t0() + Duration::days(365)));
        assert!(!evo.refreshed(&EvolutionRules::default(), 100.0, t0()).can_evolve);
    }

    #[test]
    fn test_can_breed_only_at_speciation() {
        for a in EvolutionState::ORDER {
            for b in EvolutionState::ORDER {
                let expected = a == EvolutionState::Speciation && b == EvolutionState::Speciation;
                assert_eq!(can_breed(a, b), expected, "{} x {}", a, b);
            }
        }
    }

    #[test]
    fn test_round_trips_as_plain_fields() {
        let evo = interact(EvolutionData::new(t0()), 4, 12.5).advance(t0() + Duration::hours(2));
        let json = serde_json::to_value(&evo).unwrap();
        assert_eq!(json["state"], "NEURO");
        assert!(json["birth_time"].is_string());
        let back: EvolutionData = serde_json::from_value(json).unwrap();
        assert_eq!(back, evo);
    }
}
