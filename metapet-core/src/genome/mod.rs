//! Genome — heritable material and the traits it expresses

mod dna;
mod traits;

pub use dna::{Channel, Genome, GenomeError, DIGIT_BASE, GENOME_LENGTH, TOTAL_DIGITS};
pub use traits::{
    decode_genome, element_web, select_element, BodyType, DerivedTraits, ElementWeb,
    EvolutionPath, LatentTraits, Pattern, PersonalityTraits, PhysicalTraits, RareAbility,
    Temperament, Texture,
};
