//! BreedingEngine — combine two genomes into an offspring
//!
//! Breeding is a pure function of the unordered parent pair and the mode.
//! Parents are put in canonical order (by genome text) before anything
//! else runs, and the seed is hashed from that canonical text plus the mode
//! name, so swapping the arguments yields the same offspring and lineage key.

use super::prng::{hash32, SeededRng};
use crate::evolution::EvolutionState;
use crate::genome::{decode_genome, Channel, DerivedTraits, Genome, GenomeError, GENOME_LENGTH, TOTAL_DIGITS};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Majority a parent needs per channel to be credited (strictly more than half)
const ATTRIBUTION_MAJORITY: usize = GENOME_LENGTH / 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreedingMode {
    /// Even positions from the first parent, odd from the second
    #[default]
    Balanced,
    /// One seeded-chosen parent contributes each position with the dominance probability
    Dominant,
    /// Balanced, then a seeded few digits are redrawn
    Mutation,
}

impl BreedingMode {
    pub const ALL: [BreedingMode; 3] = [BreedingMode::Balanced, BreedingMode::Dominant, BreedingMode::Mutation];

    pub fn name(self) -> &'static str {
        match self {
            BreedingMode::Balanced => "BALANCED",
            BreedingMode::Dominant => "DOMINANT",
            BreedingMode::Mutation => "MUTATION",
        }
    }
}

impl fmt::Display for BreedingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BreedingMode {
    type Err = BreedingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BALANCED" => Ok(BreedingMode::Balanced),
            "DOMINANT" => Ok(BreedingMode::Dominant),
            "MUTATION" => Ok(BreedingMode::Mutation),
            other => Err(BreedingError::UnknownMode(other.to_string())),
        }
    }
}

/// Which side of a breeding call was absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentSlot {
    First,
    Second,
}

impl fmt::Display for ParentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentSlot::First => f.write_str("first"),
            ParentSlot::Second => f.write_str("second"),
        }
    }
}

/// Breeding errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BreedingError {
    #[error("missing {0} parent")]
    MissingParent(ParentSlot),

    #[error("both parents must reach SPECIATION (got {first} and {second})")]
    NotAtTerminalStage { first: EvolutionState, second: EvolutionState },

    #[error("unknown breeding mode: {0}")]
    UnknownMode(String),

    #[error(transparent)]
    Genome(#[from] GenomeError),
}

/// Tunables for the breeding engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingConfig {
    /// Chance a position takes the dominant parent's digit in DOMINANT mode
    pub dominance_probability: f64,
    /// Lower bound of the MUTATION rate (fraction of 60)
    pub mutation_rate_min: f64,
    /// Exclusive upper bound of the MUTATION rate
    pub mutation_rate_max: f64,
    /// Seed suffix for offspring previews
    pub preview_salt: String,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self {
            dominance_probability: 0.7,
            mutation_rate_min: 0.05,
            mutation_rate_max: 0.10,
            preview_salt: "preview".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InheritanceSource {
    Parent1,
    Parent2,
    Mixed,
}

/// Per-channel attribution, in the caller's argument order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceMap {
    pub red: InheritanceSource,
    pub blue: InheritanceSource,
    pub black: InheritanceSource,
}

impl InheritanceMap {
    pub fn get(&self, channel: Channel) -> InheritanceSource {
        match channel {
            Channel::Red => self.red,
            Channel::Blue => self.blue,
            Channel::Black => self.black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingResult {
    pub offspring: Genome,
    pub traits: DerivedTraits,
    pub inheritance: InheritanceMap,
    /// 16 hex characters; provenance id, not a security token
    pub lineage_key: String,
    pub mode: BreedingMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffspringPrediction {
    pub possible_traits: BTreeSet<String>,
    /// 100 − similarity / 2; higher means a wider spread of outcomes
    pub confidence: f64,
}

/// Breeding engine with its tunables
#[derive(Debug, Clone, Default)]
pub struct BreedingEngine {
    pub config: BreedingConfig,
}

impl BreedingEngine {
    pub fn new(config: BreedingConfig) -> Self {
        Self { config }
    }

    /// Breed two genomes
    pub fn breed(&self, parent1: &Genome, parent2: &Genome, mode: BreedingMode) -> Result<BreedingResult, BreedingError> {
        self.breed_salted(parent1, parent2, mode, "")
    }

    fn breed_salted(
        &self,
        parent1: &Genome,
        parent2: &Genome,
        mode: BreedingMode,
        salt: &str,
    ) -> Result<BreedingResult, BreedingError> {
        let fp1 = parent1.fingerprint();
        let fp2 = parent2.fingerprint();
        let ((first, first_fp), (second, second_fp)) = if fp1 <= fp2 {
            ((parent1, fp1), (parent2, fp2))
        } else {
            ((parent2, fp2), (parent1, fp1))
        };
        let parents_fp = format!("{}{}", first_fp, second_fp);
        let seed_text = format!("{}{}{}", parents_fp, mode.name(), salt);
        let mut rng = SeededRng::from_text(&seed_text);

        let offspring = match mode {
            BreedingMode::Balanced => balanced(first, second)?,
            BreedingMode::Dominant => self.dominant(first, second, &mut rng)?,
            BreedingMode::Mutation => self.mutation(first, second, &mut rng)?,
        };

        let offspring_fp = offspring.fingerprint();
        let lineage_key = lineage_key(&parents_fp, mode, &offspring_fp);
        let inheritance = InheritanceMap {
            red: attribute(&offspring, parent1, parent2, Channel::Red),
            blue: attribute(&offspring, parent1, parent2, Channel::Blue),
            black: attribute(&offspring, parent1, parent2, Channel::Black),
        };
        debug!("Bred offspring mode={} salt={:?} lineage={}", mode, salt, lineage_key);

        Ok(BreedingResult {
            traits: decode_genome(&offspring),
            offspring,
            inheritance,
            lineage_key,
            mode,
        })
    }

    fn dominant(&self, first: &Genome, second: &Genome, rng: &mut SeededRng) -> Result<Genome, GenomeError> {
        let (dom, rec) = if rng.next_f64() < 0.5 { (first, second) } else { (second, first) };
        let picks: Vec<bool> = (0..GENOME_LENGTH)
            .map(|_| rng.next_f64() < self.config.dominance_probability)
            .collect();
        let channel = |c: Channel| -> Vec<u8> {
            dom.channel(c)
                .iter()
                .zip(rec.channel(c))
                .zip(&picks)
                .map(|((&d, &r), &take_dom)| if take_dom { d } else { r })
                .collect()
        };
        Genome::new(channel(Channel::Red), channel(Channel::Blue), channel(Channel::Black))
    }

    fn mutation(&self, first: &Genome, second: &Genome, rng: &mut SeededRng) -> Result<Genome, GenomeError> {
        let mut genome = balanced(first, second)?;
        for _ in 0..self.mutation_count(rng) {
            let channel = Channel::ALL[rng.below(3) as usize];
            let position = rng.below(GENOME_LENGTH as u32) as usize;
            let digit = rng.below(7) as u8;
            genome = genome.with_digit(channel, position, digit)?;
        }
        Ok(genome)
    }

    /// Number of redraws: floor(60 × rate), rate uniform in [min, max)
    fn mutation_count(&self, rng: &mut SeededRng) -> usize {
        let span = self.config.mutation_rate_max - self.config.mutation_rate_min;
        let rate = self.config.mutation_rate_min + rng.next_f64() * span;
        ((GENOME_LENGTH as f64 * rate).floor() as usize).min(TOTAL_DIGITS)
    }

    /// Preview the trait spread of a pairing without committing to an outcome
    pub fn predict_offspring(&self, parent1: &Genome, parent2: &Genome) -> Result<OffspringPrediction, BreedingError> {
        let mut possible_traits = BTreeSet::new();
        for mode in BreedingMode::ALL {
            let sample = self.breed_salted(parent1, parent2, mode, &self.config.preview_salt)?;
            possible_traits.extend(sample.traits.categorical_labels());
        }
        Ok(OffspringPrediction {
            possible_traits,
            confidence: 100.0 - calculate_similarity(parent1, parent2) / 2.0,
        })
    }
}

fn balanced(first: &Genome, second: &Genome) -> Result<Genome, GenomeError> {
    let channel = |c: Channel| -> Vec<u8> {
        first
            .channel(c)
            .iter()
            .zip(second.channel(c))
            .enumerate()
            .map(|(i, (&a, &b))| if i % 2 == 0 { a } else { b })
            .collect()
    };
    Genome::new(channel(Channel::Red), channel(Channel::Blue), channel(Channel::Black))
}

fn attribute(offspring: &Genome, parent1: &Genome, parent2: &Genome, channel: Channel) -> InheritanceSource {
    let matches = |parent: &Genome| {
        offspring
            .channel(channel)
            .iter()
            .zip(parent.channel(channel))
            .filter(|(a, b)| a == b)
            .count()
    };
    let m1 = matches(parent1);
    let m2 = matches(parent2);
    if m1 > ATTRIBUTION_MAJORITY && m1 > m2 {
        InheritanceSource::Parent1
    } else if m2 > ATTRIBUTION_MAJORITY && m2 > m1 {
        InheritanceSource::Parent2
    } else {
        InheritanceSource::Mixed
    }
}

fn lineage_key(parents_fp: &str, mode: BreedingMode, offspring_fp: &str) -> String {
    let forward = hash32(&format!("{}|{}|{}", parents_fp, mode.name(), offspring_fp));
    let reverse = hash32(&format!("{}|{}|{}", offspring_fp, mode.name(), parents_fp));
    let mut bytes = forward.to_be_bytes().to_vec();
    bytes.extend_from_slice(&reverse.to_be_bytes());
    hex::encode(bytes)
}

/// Percentage (0–100) of the 180 digit slots that match exactly
pub fn calculate_similarity(g1: &Genome, g2: &Genome) -> f64 {
    let matches = g1
        .digits()
        .zip(g2.digits())
        .filter(|((_, _, a), (_, _, b))| a == b)
        .count();
    matches as f64 * 100.0 / TOTAL_DIGITS as f64
}

/// Breed with the default configuration
pub fn breed(parent1: &Genome, parent2: &Genome, mode: BreedingMode) -> Result<BreedingResult, BreedingError> {
    BreedingEngine::default().breed(parent1, parent2, mode)
}

/// Predict with the default configuration
pub fn predict_offspring(parent1: &Genome, parent2: &Genome) -> Result<OffspringPrediction, BreedingError> {
    BreedingEngine::default().predict_offspring(parent1, parent2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (Genome, Genome) {
        (Genome::from_seed_material("mother"), Genome::from_seed_material("father"))
    }

    #[test]
    fn test_self_breed_uniform_is_identity() {
        let g = Genome::uniform(1).unwrap();
        let result = breed(&g, &g, BreedingMode::Balanced).unwrap();
        assert_eq!(result.offspring, g);
        assert_eq!(calculate_similarity(&result.offspring, &g), 100.0);
    }

    #[test]
    fn test_order_independent_all_modes() {
        let (a, b) = pair();
        for mode in BreedingMode::ALL {
            let ab = breed(&a, &b, mode).unwrap();
            let ba = breed(&b, &a, mode).unwrap();
            assert_eq!(ab.offspring, ba.offspring, "{}", mode);
            assert_eq!(ab.lineage_key, ba.lineage_key, "{}", mode);
            assert_eq!(ab.traits, ba.traits);
        }
    }

    #[test]
    fn test_repeatable() {
        let (a, b) = pair();
        for mode in BreedingMode::ALL {
            let first = serde_json::to_string(&breed(&a, &b, mode).unwrap()).unwrap();
            let second = serde_json::to_string(&breed(&a, &b, mode).unwrap()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_offspring_digits_in_range() {
        for i in 0..20 {
            let a = Genome::from_seed_material(&format!("a{}", i));
            let b = Genome::from_seed_material(&format!("b{}", i));
            for mode in BreedingMode::ALL {
                let r = breed(&a, &b, mode).unwrap();
                assert!(r.offspring.digits().all(|(_, _, d)| d <= 6));
            }
        }
    }

    #[test]
    fn test_balanced_alternates() {
        let zeros = Genome::uniform(0).unwrap();
        let fives = Genome::uniform(5).unwrap();
        // "0…" sorts before "5…", so the zeros genome leads
        let r = breed(&fives, &zeros, BreedingMode::Balanced).unwrap();
        for c in Channel::ALL {
            for (i, &d) in r.offspring.channel(c).iter().enumerate() {
                assert_eq!(d, if i % 2 == 0 { 0 } else { 5 });
            }
        }
        // 30 matches each: no strict majority
        assert_eq!(r.inheritance.red, InheritanceSource::Mixed);
    }

    #[test]
    fn test_dominant_draws_from_parents() {
        let zeros = Genome::uniform(0).unwrap();
        let fives = Genome::uniform(5).unwrap();
        let r = breed(&zeros, &fives, BreedingMode::Dominant).unwrap();
        assert!(r.offspring.digits().all(|(_, _, d)| d == 0 || d == 5));
        // columns are inherited whole
        for i in 0..GENOME_LENGTH {
            let (x, y, z) = r.offspring.column(i).unwrap();
            assert!(x == y && y == z);
        }
    }

    #[test]
    fn test_dominant_leans_to_one_parent() {
        let mut leaning = 0;
        for i in 0..20 {
            let a = Genome::from_seed_material(&format!("dom-a{}", i));
            let b = Genome::from_seed_material(&format!("dom-b{}", i));
            let r = breed(&a, &b, BreedingMode::Dominant).unwrap();
            let s1 = calculate_similarity(&r.offspring, &a);
            let s2 = calculate_similarity(&r.offspring, &b);
            if (s1 - s2).abs() > 10.0 {
                leaning += 1;
            }
        }
        assert!(leaning >= 15, "only {} of 20 leaned", leaning);
    }

    #[test]
    fn test_dominant_rate_matches_config() {
        let zeros = Genome::uniform(0).unwrap();
        let fives = Genome::uniform(5).unwrap();
        let engine = BreedingEngine::default();
        let mut from_majority = 0;
        let rounds = 200;
        for i in 0..rounds {
            let r = engine
                .breed_salted(&zeros, &fives, BreedingMode::Dominant, &format!("round{}", i))
                .unwrap();
            let zero_count = r.offspring.red().iter().filter(|&&d| d == 0).count();
            from_majority += zero_count.max(GENOME_LENGTH - zero_count);
        }
        let share = from_majority as f64 / (rounds * GENOME_LENGTH) as f64;
        assert!((0.62..=0.78).contains(&share), "dominant share {}", share);

        let always = BreedingEngine::new(BreedingConfig { dominance_probability: 1.0, ..BreedingConfig::default() });
        let r = always.breed(&zeros, &fives, BreedingMode::Dominant).unwrap();
        assert!(r.offspring == zeros || r.offspring == fives);
    }

    #[test]
    fn test_mutation_count_in_range() {
        let engine = BreedingEngine::default();
        let mut seen = BTreeSet::new();
        for seed in 0..500 {
            let count = engine.mutation_count(&mut SeededRng::new(seed));
            assert!((3..=5).contains(&count), "seed {} drew {}", seed, count);
            seen.insert(count);
        }
        assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![3, 4, 5]);

        let frozen = BreedingEngine::new(BreedingConfig {
            mutation_rate_min: 0.0,
            mutation_rate_max: 0.0,
            ..BreedingConfig::default()
        });
        assert_eq!(frozen.mutation_count(&mut SeededRng::new(1)), 0);
    }

    #[test]
    fn test_mutation_stays_close_to_balanced() {
        let mut changed_pairs = 0;
        for i in 0..50 {
            let a = Genome::from_seed_material(&format!("mut-a{}", i));
            let b = Genome::from_seed_material(&format!("mut-b{}", i));
            let base = breed(&a, &b, BreedingMode::Balanced).unwrap();
            let mutated = breed(&a, &b, BreedingMode::Mutation).unwrap();
            let differing = base
                .offspring
                .digits()
                .zip(mutated.offspring.digits())
                .filter(|(x, y)| x.2 != y.2)
                .count();
            assert!(differing <= 5, "{} digits changed", differing);
            if differing > 0 {
                changed_pairs += 1;
            }
        }
        // a redraw may land on the old digit, but not for every pair
        assert!(changed_pairs >= 40, "only {} of 50 pairs mutated", changed_pairs);
    }

    #[test]
    fn test_attribution_credits_majority() {
        let zeros = Genome::uniform(0).unwrap();
        let ones = Genome::uniform(1).unwrap();
        let mostly_zero = zeros.with_digit(Channel::Red, 0, 1).unwrap();
        assert_eq!(attribute(&mostly_zero, &zeros, &ones, Channel::Red), InheritanceSource::Parent1);
        assert_eq!(attribute(&mostly_zero, &ones, &zeros, Channel::Red), InheritanceSource::Parent2);
        // identical parents tie
        assert_eq!(attribute(&zeros, &zeros, &zeros, Channel::Blue), InheritanceSource::Mixed);
        // no parent matches at all
        let twos = Genome::uniform(2).unwrap();
        assert_eq!(attribute(&twos, &zeros, &ones, Channel::Black), InheritanceSource::Mixed);
    }

    #[test]
    fn test_lineage_key_shape() {
        let (a, b) = pair();
        let balanced = breed(&a, &b, BreedingMode::Balanced).unwrap();
        let dominant = breed(&a, &b, BreedingMode::Dominant).unwrap();
        assert_eq!(balanced.lineage_key.len(), 16);
        assert!(balanced.lineage_key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(balanced.lineage_key, dominant.lineage_key);
    }

    #[test]
    fn test_similarity_bounds() {
        let (a, b) = pair();
        assert_eq!(calculate_similarity(&a, &a), 100.0);
        let zeros = Genome::uniform(0).unwrap();
        let sixes = Genome::uniform(6).unwrap();
        assert_eq!(calculate_similarity(&zeros, &sixes), 0.0);
        let s = calculate_similarity(&a, &b);
        assert!((0.0..=100.0).contains(&s));
        assert_eq!(s, calculate_similarity(&b, &a));
    }

    #[test]
    fn test_prediction_confidence() {
        let (a, b) = pair();
        let same = predict_offspring(&a, &a).unwrap();
        assert_eq!(same.confidence, 50.0);
        let diverse = predict_offspring(&a, &b).unwrap();
        assert!(diverse.confidence > same.confidence);
        assert!(!diverse.possible_traits.is_empty());
        assert_eq!(predict_offspring(&b, &a).unwrap(), diverse);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("dominant".parse::<BreedingMode>().unwrap(), BreedingMode::Dominant);
        assert_eq!(BreedingMode::default(), BreedingMode::Balanced);
        assert!("chaotic".parse::<BreedingMode>().is_err());
        assert_eq!(serde_json::to_string(&BreedingMode::Mutation).unwrap(), "\"MUTATION\"");
    }
}
