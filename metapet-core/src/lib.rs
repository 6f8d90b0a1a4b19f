//! Meta-Pet core — heritable companions on a base-60 / base-7 lattice
//!
//! Genomes of base-7 digits select elements from the periodic table; the
//! selected elements' 60-adic and base-7 structure drives trait expression,
//! deterministic breeding, and a gated four-stage lifecycle.

pub mod lattice;
pub mod genome;
pub mod breeding;
pub mod evolution;
pub mod companion;
pub mod config;

pub use lattice::{profile, build_residue_nodes, ElementProfile, ResidueNode, ChargeVector, HeptaSignature};
pub use genome::{decode_genome, Genome, GenomeError, DerivedTraits};
pub use breeding::{breed, calculate_similarity, predict_offspring, BreedingEngine, BreedingMode, BreedingResult, BreedingError};
pub use evolution::{can_breed, EvolutionData, EvolutionState, EvolutionRules, Vitals};
pub use companion::{breed_companions, Companion};
pub use config::{CoreConfig, ConfigError};
