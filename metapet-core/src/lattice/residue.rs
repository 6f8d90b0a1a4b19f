//! Residue nodes — elements grouped by Z mod 60
//!
//! Residue a holds at most two elements: a and a + 60. When both exist the
//! node is a bridge. Charge is the summed 2/3/5 exponents of its members;
//! a node whose charge is exactly zero is pure.

use super::profile::{element_table, profile, Base7Triple, ElementProfile, LatticeError, LATTICE_BASE};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;

/// Summed exponents of 2, 3 and 5
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChargeVector {
    pub c2: u32,
    pub c3: u32,
    pub c5: u32,
}

impl ChargeVector {
    pub fn from_profile(p: &ElementProfile) -> Self {
        Self { c2: p.factors.e2, c3: p.factors.e3, c5: p.factors.e5 }
    }

    /// Combined charge of a set of elements
    pub fn of(zs: &[u32]) -> Result<Self, LatticeError> {
        zs.iter()
            .map(|&z| profile(z).map(|p| Self::from_profile(&p)))
            .sum()
    }

    pub fn magnitude(&self) -> f64 {
        let (a, b, c) = (self.c2 as f64, self.c3 as f64, self.c5 as f64);
        (a * a + b * b + c * c).sqrt()
    }

    pub fn is_neutral(&self) -> bool {
        self.c2 == 0 && self.c3 == 0 && self.c5 == 0
    }

    pub fn purity(&self) -> Purity {
        if self.is_neutral() { Purity::Pure } else { Purity::Charged }
    }

    pub fn total(&self) -> u32 {
        self.c2 + self.c3 + self.c5
    }
}

impl Add for ChargeVector {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { c2: self.c2 + rhs.c2, c3: self.c3 + rhs.c3, c5: self.c5 + rhs.c5 }
    }
}

impl Sum for ChargeVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Component-wise sum of base-7 triples, reduced mod 7
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeptaSignature {
    pub h0: u8,
    pub h1: u8,
    pub h2: u8,
}

impl HeptaSignature {
    /// Add a triple component-wise; unreduced components are reduced first
    pub fn absorb(self, t: Base7Triple) -> Self {
        Self {
            h0: (self.h0 % 7 + t.d0()) % 7,
            h1: (self.h1 % 7 + t.d1()) % 7,
            h2: (self.h2 % 7 + t.d2()) % 7,
        }
    }

    pub fn of(triples: impl IntoIterator<Item = Base7Triple>) -> Self {
        triples.into_iter().fold(Self::default(), Self::absorb)
    }

    /// Single index in 0..343 for table selection
    pub fn index(&self) -> u32 {
        self.h0 as u32 + 7 * self.h1 as u32 + 49 * self.h2 as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purity {
    Pure,
    Charged,
}

/// Two elements linked by a shared residue, exactly 60 apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bridge {
    pub lower: u32,
    pub upper: u32,
    pub charge: ChargeVector,
    pub purity: Purity,
}

impl Bridge {
    /// Link `z` with `z + 60`; both must be defined elements
    pub fn link(z: u32) -> Result<Self, LatticeError> {
        let lower = profile(z)?;
        let upper = profile(z + LATTICE_BASE)?;
        let charge = ChargeVector::from_profile(&lower) + ChargeVector::from_profile(&upper);
        Ok(Self { lower: lower.z, upper: upper.z, charge, purity: charge.purity() })
    }

    pub fn delta(&self) -> u32 {
        self.upper - self.lower
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Empty,
    Single(u32),
    Bridge(Bridge),
}

/// All elements sharing one residue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidueNode {
    pub residue: u32,
    pub kind: NodeKind,
    pub charge: ChargeVector,
    pub purity: Purity,
}

impl ResidueNode {
    pub fn members(&self) -> Vec<u32> {
        match self.kind {
            NodeKind::Empty => Vec::new(),
            NodeKind::Single(z) => vec![z],
            NodeKind::Bridge(b) => vec![b.lower, b.upper],
        }
    }

    pub fn bridge(&self) -> Option<&Bridge> {
        match &self.kind {
            NodeKind::Bridge(b) => Some(b),
            _ => None,
        }
    }
}

/// Group the element table by residue 0..60
pub fn build_residue_nodes() -> Vec<ResidueNode> {
    let table = element_table();
    (0..LATTICE_BASE)
        .map(|residue| {
            let members: Vec<&ElementProfile> =
                table.iter().filter(|p| p.residue == residue).collect();
            let charge: ChargeVector = members.iter().map(|p| ChargeVector::from_profile(p)).sum();
            let kind = match members.as_slice() {
                [] => NodeKind::Empty,
                [only] => NodeKind::Single(only.z),
                [lower, upper, ..] => NodeKind::Bridge(Bridge {
                    lower: lower.z,
                    upper: upper.z,
                    charge,
                    purity: charge.purity(),
                }),
            };
            ResidueNode { residue, kind, charge, purity: charge.purity() }
        })
        .collect()
}

/// Every bridge node in residue order
pub fn bridges() -> Vec<Bridge> {
    build_residue_nodes()
        .iter()
        .filter_map(|n| n.bridge().copied())
        .collect()
}
