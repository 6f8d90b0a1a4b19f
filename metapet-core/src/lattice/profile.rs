//! ElementProfile — the numeric identity of an atomic number
//!
//! Every element Z in 1..=118 decomposes three ways:
//! - 60-adic coordinate: Z = a + 60·b (residue a, tier b)
//! - factorization relative to 60: Z = 2^e2 · 3^e3 · 5^e5 · u, gcd(u, 60) = 1
//! - base-7 triple: Z = d0 + 7·d1 + 49·d2

use super::elements::{self, ELEMENT_COUNT};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Modulus of the 60-adic coordinate
pub const LATTICE_BASE: u32 = 60;

/// Largest value a base-7 triple can hold (7³ − 1)
pub const MAX_BASE7_TRIPLE: u32 = 342;

/// Last element below the heavy radioactive band (lead)
pub const STABLE_LIMIT: u32 = 82;
/// First transuranic element (neptunium)
pub const TRANSURANIC_START: u32 = 93;
/// First superheavy element (rutherfordium)
pub const SUPERHEAVY_START: u32 = 104;

/// Errors raised by the number-theory engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LatticeError {
    #[error("atomic number {0} outside 1..=118")]
    OutOfRange(u32),

    #[error("zero has no factorization relative to 60")]
    ZeroNotFactorable,

    #[error("{0} does not fit in a base-7 triple (max 342)")]
    NotBase7Representable(u32),

    #[error("base-7 digit {0} exceeds 6")]
    InvalidTriple(u8),
}

/// Z = 2^e2 · 3^e3 · 5^e5 · unit, with gcd(unit, 60) = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Factorization {
    pub e2: u32,
    pub e3: u32,
    pub e5: u32,
    pub unit: u32,
}

impl Factorization {
    /// True when Z shares no factor with 60
    pub fn is_coprime(&self) -> bool {
        self.e2 == 0 && self.e3 == 0 && self.e5 == 0
    }
}

/// Three base-7 digits, least significant first.
///
/// Only constructed through [`Base7Triple::new`] or [`to_base7_triple`], so
/// every digit is in [0,6]. Serialized as `[d0, d1, d2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 3]", into = "[u8; 3]")]
pub struct Base7Triple {
    d0: u8,
    d1: u8,
    d2: u8,
}

impl Base7Triple {
    /// Build a triple, rejecting digits outside [0,6]
    pub fn new(d0: u8, d1: u8, d2: u8) -> Result<Self, LatticeError> {
        for d in [d0, d1, d2] {
            if d > 6 {
                return Err(LatticeError::InvalidTriple(d));
            }
        }
        Ok(Self { d0, d1, d2 })
    }

    pub fn d0(&self) -> u8 {
        self.d0
    }

    pub fn d1(&self) -> u8 {
        self.d1
    }

    pub fn d2(&self) -> u8 {
        self.d2
    }

    pub fn digits(&self) -> [u8; 3] {
        [self.d0, self.d1, self.d2]
    }
}

impl TryFrom<[u8; 3]> for Base7Triple {
    type Error = LatticeError;

    fn try_from([d0, d1, d2]: [u8; 3]) -> Result<Self, Self::Error> {
        Self::new(d0, d1, d2)
    }
}

impl From<Base7Triple> for [u8; 3] {
    fn from(t: Base7Triple) -> Self {
        t.digits()
    }
}

/// Band classification from the fixed 82/93/104 thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementFlags {
    /// z > 82
    pub beyond_lead: bool,
    /// z >= 93
    pub transuranic: bool,
    /// z >= 104
    pub superheavy: bool,
}

impl ElementFlags {
    pub fn classify(z: u32) -> Self {
        Self {
            beyond_lead: z > STABLE_LIMIT,
            transuranic: z >= TRANSURANIC_START,
            superheavy: z >= SUPERHEAVY_START,
        }
    }
}

/// Read-only numeric profile of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementProfile {
    pub z: u32,
    pub symbol: &'static str,
    pub name: &'static str,
    /// a = z mod 60
    pub residue: u32,
    /// b = ⌊z / 60⌋
    pub tier: u32,
    pub factors: Factorization,
    pub base7: Base7Triple,
    pub flags: ElementFlags,
}

/// Extract the maximal powers of 2, 3 and 5 dividing `z`
pub fn factor_relative_to_60(z: u32) -> Result<Factorization, LatticeError> {
    if z == 0 {
        return Err(LatticeError::ZeroNotFactorable);
    }
    let mut unit = z;
    let mut strip = |p: u32| {
        let mut e = 0;
        while unit % p == 0 {
            unit /= p;
            e += 1;
        }
        e
    };
    let e2 = strip(2);
    let e3 = strip(3);
    let e5 = strip(5);
    Ok(Factorization { e2, e3, e5, unit })
}

/// Decompose `z` into base-7 digits (z <= 342)
pub fn to_base7_triple(z: u32) -> Result<Base7Triple, LatticeError> {
    if z > MAX_BASE7_TRIPLE {
        return Err(LatticeError::NotBase7Representable(z));
    }
    Ok(Base7Triple {
        d0: (z % 7) as u8,
        d1: ((z / 7) % 7) as u8,
        d2: (z / 49) as u8,
    })
}

/// Inverse of [`to_base7_triple`]
pub fn from_base7_triple(t: Base7Triple) -> u32 {
    t.d0 as u32 + 7 * t.d1 as u32 + 49 * t.d2 as u32
}

fn build_profile(z: u32) -> Result<ElementProfile, LatticeError> {
    let (symbol, name) = elements::lookup(z).ok_or(LatticeError::OutOfRange(z))?;
    Ok(ElementProfile {
        z,
        symbol,
        name,
        residue: z % LATTICE_BASE,
        tier: z / LATTICE_BASE,
        factors: factor_relative_to_60(z)?,
        base7: to_base7_triple(z)?,
        flags: ElementFlags::classify(z),
    })
}

/// All 118 profiles, computed once
pub fn element_table() -> &'static [ElementProfile] {
    static TABLE: OnceLock<Vec<ElementProfile>> = OnceLock::new();
    TABLE.get_or_init(|| {
        (1..=ELEMENT_COUNT)
            .filter_map(|z| build_profile(z).ok())
            .collect()
    })
}

/// Profile of element `z`
pub fn profile(z: u32) -> Result<ElementProfile, LatticeError> {
    if z == 0 {
        return Err(LatticeError::OutOfRange(z));
    }
    element_table()
        .get((z - 1) as usize)
        .copied()
        .ok_or(LatticeError::OutOfRange(z))
}
