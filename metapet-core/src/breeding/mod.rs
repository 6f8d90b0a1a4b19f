//! Breeding — deterministic, order-independent genome recombination

mod engine;
mod prng;

pub use engine::{
    breed, calculate_similarity, predict_offspring, BreedingConfig, BreedingEngine, BreedingError,
    BreedingMode, BreedingResult, InheritanceMap, InheritanceSource, OffspringPrediction, ParentSlot,
};
pub use prng::{hash32, AvalancheHash, SeededRng};
