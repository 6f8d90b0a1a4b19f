//! Vitals — the care gauges whose average gates evolution
//!
//! Each tick decays the gauges by a base rate plus a small jitter. The
//! generator is passed in by the caller, so a seeded generator replays the
//! same decay sequence.

use rand::Rng;
use serde::{Deserialize, Serialize};

const GAUGE_MAX: f64 = 100.0;

/// Per-tick decay and care amounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsConfig {
    pub hunger_decay: f64,
    pub hygiene_decay: f64,
    pub mood_decay: f64,
    pub energy_decay: f64,
    /// Extra decay drawn uniformly from [0, jitter)
    pub jitter: f64,
    pub care_amount: f64,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            hunger_decay: 1.0,
            hygiene_decay: 0.6,
            mood_decay: 0.8,
            energy_decay: 0.5,
            jitter: 0.5,
            care_amount: 25.0,
        }
    }
}

/// All gauges are 0–100; higher is healthier (hunger is satiation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub hunger: f64,
    pub hygiene: f64,
    pub mood: f64,
    pub energy: f64,
}

impl Default for Vitals {
    fn default() -> Self {
        Self { hunger: GAUGE_MAX, hygiene: GAUGE_MAX, mood: GAUGE_MAX, energy: GAUGE_MAX }
    }
}

fn clamp(v: f64) -> f64 {
    v.clamp(0.0, GAUGE_MAX)
}

impl Vitals {
    pub fn average(&self) -> f64 {
        (self.hunger + self.hygiene + self.mood + self.energy) / 4.0
    }

    /// One decay step
    pub fn tick(&self, config: &VitalsConfig, rng: &mut impl Rng) -> Self {
        let mut decay = |base: f64| -> f64 {
            if config.jitter > 0.0 {
                base + rng.gen_range(0.0..config.jitter)
            } else {
                base
            }
        };
        Self {
            hunger: clamp(self.hunger - decay(config.hunger_decay)),
            hygiene: clamp(self.hygiene - decay(config.hygiene_decay)),
            mood: clamp(self.mood - decay(config.mood_decay)),
            energy: clamp(self.energy - decay(config.energy_decay)),
        }
    }

    pub fn feed(&self, config: &VitalsConfig) -> Self {
        Self { hunger: clamp(self.hunger + config.care_amount), ..*self }
    }

    pub fn clean(&self, config: &VitalsConfig) -> Self {
        Self { hygiene: clamp(self.hygiene + config.care_amount), ..*self }
    }

    /// Play lifts mood and costs a little energy
    pub fn play(&self, config: &VitalsConfig) -> Self {
        Self {
            mood: clamp(self.mood + config.care_amount),
            energy: clamp(self.energy - config.care_amount / 5.0),
            ..*self
        }
    }

    pub fn rest(&self, config: &VitalsConfig) -> Self {
        Self { energy: clamp(self.energy + config.care_amount), ..*self }
    }
}
