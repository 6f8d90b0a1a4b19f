//! Element lattice — the base-60 / base-7 number-theory engine
//!
//! Maps atomic numbers 1..=118 to structured numeric profiles and groups
//! them into residue nodes. All data here is static and read-only.

mod elements;
mod profile;
mod residue;

pub use elements::{lookup, ELEMENT_COUNT};
pub use profile::{
    element_table, factor_relative_to_60, from_base7_triple, profile, to_base7_triple,
    Base7Triple, ElementFlags, ElementProfile, Factorization, LatticeError, LATTICE_BASE,
    MAX_BASE7_TRIPLE, STABLE_LIMIT, SUPERHEAVY_START, TRANSURANIC_START,
};
pub use residue::{
    bridges, build_residue_nodes, Bridge, ChargeVector, HeptaSignature, NodeKind, Purity,
    ResidueNode,
};
