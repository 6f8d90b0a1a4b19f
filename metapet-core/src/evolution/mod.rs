//! Evolution — the gated four-stage lifecycle
//!
//! GENETICS → NEURO → QUANTUM → SPECIATION. Breeding opens only when both
//! companions have reached SPECIATION.

mod machine;
mod state;
mod vitals;

pub use machine::{can_breed, EvolutionData, EvolutionProgress, MAX_EXPERIENCE};
pub use state::{EvolutionRequirement, EvolutionRules, EvolutionState, SpecialRequirement};
pub use vitals::{Vitals, VitalsConfig};
