//! Trait derivation — genome → element web → display traits
//!
//! Each of the 60 positions reads its (red, blue, black) digits as a
//! base-7 triple, folds the value into an atomic number, and looks the
//! element up in the lattice. The selections aggregate into an element web
//! (coverage, bridges, frontier affinity, charge, hepta signature) and every
//! categorical trait is picked by thresholding or mod-indexing over those
//! aggregates. Nothing here draws randomness: equal genomes give equal traits.

use super::dna::{Channel, Genome, GENOME_LENGTH};
use crate::lattice::{
    element_table, from_base7_triple, Base7Triple, ChargeVector, ElementProfile, HeptaSignature,
    LatticeError, ELEMENT_COUNT, LATTICE_BASE,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Largest digit sum of one channel (60 × 6)
const CHANNEL_SUM_MAX: u32 = 360;
/// Most bridges 60 selections can close
const BRIDGE_SATURATION: u32 = 30;

const BRIDGE_WALKER_MIN: u32 = 12;
const FRONTIER_SENSE_MIN: usize = 10;
const PURE_RESONANCE_PCT: u8 = 40;
const FULL_SPECTRUM_COVERAGE: f64 = 0.75;
const FRONTIER_PATH_AFFINITY: f64 = 0.25;

const PALETTE: [&str; 12] = [
    "#E63946", "#F4A261", "#E9C46A", "#2A9D8F", "#264653", "#8ECAE6",
    "#219EBC", "#023047", "#FFB703", "#FB8500", "#9B5DE5", "#F15BB5",
];

macro_rules! display_as_debug {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:?}", self)
            }
        })*
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    Spherical,
    Cubic,
    Pyramidal,
    Cylindrical,
    Toroidal,
    Crystalline,
}

impl BodyType {
    const ALL: [BodyType; 6] = [
        BodyType::Spherical, BodyType::Cubic, BodyType::Pyramidal,
        BodyType::Cylindrical, BodyType::Toroidal, BodyType::Crystalline,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    Solid,
    Striped,
    Spotted,
    Gradient,
    Fractal,
}

impl Pattern {
    const ALL: [Pattern; 5] = [
        Pattern::Solid, Pattern::Striped, Pattern::Spotted, Pattern::Gradient, Pattern::Fractal,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Texture {
    Smooth,
    Fuzzy,
    Scaly,
    Metallic,
    Glassy,
}

impl Texture {
    const ALL: [Texture; 5] = [
        Texture::Smooth, Texture::Fuzzy, Texture::Scaly, Texture::Metallic, Texture::Glassy,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Temperament {
    Gentle,
    Playful,
    Curious,
    Stoic,
    Fierce,
    Serene,
}

impl Temperament {
    const ALL: [Temperament; 6] = [
        Temperament::Gentle, Temperament::Playful, Temperament::Curious,
        Temperament::Stoic, Temperament::Fierce, Temperament::Serene,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvolutionPath {
    Harmonic,
    Resonant,
    Radiant,
    Crystalline,
    Frontier,
}

impl EvolutionPath {
    const CYCLE: [EvolutionPath; 4] = [
        EvolutionPath::Harmonic, EvolutionPath::Resonant,
        EvolutionPath::Radiant, EvolutionPath::Crystalline,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RareAbility {
    BridgeWalker,
    FrontierSense,
    SeptenaryEcho,
    PureResonance,
    FullSpectrum,
}

display_as_debug!(BodyType, Pattern, Texture, Temperament, EvolutionPath, RareAbility);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalTraits {
    pub body_type: BodyType,
    pub pattern: Pattern,
    pub texture: Texture,
    pub primary_color: String,
    pub secondary_color: String,
    /// Scale factor in [0.7, 1.3]
    pub size: f64,
}

/// Gauges are 0–100
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    pub temperament: Temperament,
    pub energy: u8,
    pub social: u8,
    pub curiosity: u8,
    pub discipline: u8,
    pub affection: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatentTraits {
    pub evolution_path: EvolutionPath,
    pub rare_abilities: Vec<RareAbility>,
    pub physical_potential: u8,
    pub mental_potential: u8,
    pub social_potential: u8,
}

/// Aggregate view of the elements a genome selects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementWeb {
    /// Selected atomic number per position
    pub selections: Vec<u32>,
    /// Fraction of the 60 residues touched
    pub coverage: f64,
    /// Residues whose two members were both selected
    pub bridge_count: u32,
    /// Fraction of selections that are transuranic
    pub frontier_affinity: f64,
    pub charge: ChargeVector,
    pub hepta: HeptaSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTraits {
    pub physical: PhysicalTraits,
    pub personality: PersonalityTraits,
    pub latent: LatentTraits,
    pub web: ElementWeb,
}

impl DerivedTraits {
    /// `kind:value` labels of every categorical trait
    pub fn categorical_labels(&self) -> BTreeSet<String> {
        let mut labels = BTreeSet::new();
        labels.insert(format!("body:{}", self.physical.body_type));
        labels.insert(format!("pattern:{}", self.physical.pattern));
        labels.insert(format!("texture:{}", self.physical.texture));
        labels.insert(format!("primary:{}", self.physical.primary_color));
        labels.insert(format!("secondary:{}", self.physical.secondary_color));
        labels.insert(format!("temperament:{}", self.personality.temperament));
        labels.insert(format!("path:{}", self.latent.evolution_path));
        for ability in &self.latent.rare_abilities {
            labels.insert(format!("ability:{}", ability));
        }
        labels
    }
}

/// Map one genome column to an atomic number in 1..=118
pub fn select_element(red: u8, blue: u8, black: u8) -> Result<u32, LatticeError> {
    let v = from_base7_triple(Base7Triple::new(red, blue, black)?);
    Ok(v % ELEMENT_COUNT + 1)
}

fn channel_sum(genome: &Genome, channel: Channel) -> u32 {
    genome.channel(channel).iter().map(|&d| d as u32).sum()
}

fn gauge(value: u32, max: u32) -> u8 {
    (value.min(max) * 100 / max) as u8
}

fn pick<T: Copy>(options: &[T], index: u32) -> T {
    options[index as usize % options.len()]
}

/// Build the element web for a genome
pub fn element_web(genome: &Genome) -> ElementWeb {
    let table = element_table();
    let profiles: Vec<&ElementProfile> = (0..GENOME_LENGTH)
        .filter_map(|i| genome.column(i))
        .filter_map(|(r, b, k)| select_element(r, b, k).ok())
        .filter_map(|z| table.get(z as usize - 1))
        .collect();

    let selected: BTreeSet<u32> = profiles.iter().map(|p| p.z).collect();
    let touched: BTreeSet<u32> = profiles.iter().map(|p| p.residue).collect();
    let bridge_count = (1..=ELEMENT_COUNT - LATTICE_BASE)
        .filter(|z| selected.contains(z) && selected.contains(&(z + LATTICE_BASE)))
        .count() as u32;
    let transuranic = profiles.iter().filter(|p| p.flags.transuranic).count();

    ElementWeb {
        selections: profiles.iter().map(|p| p.z).collect(),
        coverage: touched.len() as f64 / LATTICE_BASE as f64,
        bridge_count,
        frontier_affinity: transuranic as f64 / GENOME_LENGTH as f64,
        charge: profiles.iter().map(|p| ChargeVector::from_profile(p)).sum(),
        hepta: HeptaSignature::of(profiles.iter().map(|p| p.base7)),
    }
}

/// Derive the full trait bundle. Pure: identical genomes give identical traits.
pub fn decode_genome(genome: &Genome) -> DerivedTraits {
    let web = element_web(genome);
    let table = element_table();
    let charge = web.charge;
    let hepta = web.hepta;

    let red_sum = channel_sum(genome, Channel::Red);
    let blue_sum = channel_sum(genome, Channel::Blue);
    let black_sum = channel_sum(genome, Channel::Black);

    let coprime = web
        .selections
        .iter()
        .filter_map(|&z| table.get(z as usize - 1))
        .filter(|p| p.factors.is_coprime())
        .count() as u32;
    let superheavy = web
        .selections
        .iter()
        .filter_map(|&z| table.get(z as usize - 1))
        .filter(|p| p.flags.superheavy)
        .count();

    let physical = PhysicalTraits {
        body_type: pick(&BodyType::ALL, charge.c2 + hepta.h0 as u32),
        pattern: pick(&Pattern::ALL, charge.c3 + web.bridge_count),
        texture: pick(&Texture::ALL, hepta.index() + charge.c5),
        primary_color: pick(&PALETTE, red_sum).to_string(),
        secondary_color: pick(&PALETTE, blue_sum + black_sum).to_string(),
        size: 0.7 + web.coverage * 0.6,
    };

    let discipline = gauge(coprime, GENOME_LENGTH as u32);
    let personality = PersonalityTraits {
        temperament: pick(&Temperament::ALL, hepta.h1 as u32 + hepta.h2 as u32 + charge.total()),
        energy: gauge(red_sum, CHANNEL_SUM_MAX),
        social: gauge(blue_sum, CHANNEL_SUM_MAX),
        curiosity: gauge(black_sum, CHANNEL_SUM_MAX),
        discipline,
        affection: gauge(web.bridge_count, BRIDGE_SATURATION),
    };

    let mut rare_abilities = Vec::new();
    if web.bridge_count >= BRIDGE_WALKER_MIN {
        rare_abilities.push(RareAbility::BridgeWalker);
    }
    if superheavy >= FRONTIER_SENSE_MIN {
        rare_abilities.push(RareAbility::FrontierSense);
    }
    if hepta == HeptaSignature::default() {
        rare_abilities.push(RareAbility::SeptenaryEcho);
    }
    if discipline >= PURE_RESONANCE_PCT {
        rare_abilities.push(RareAbility::PureResonance);
    }
    if web.coverage >= FULL_SPECTRUM_COVERAGE {
        rare_abilities.push(RareAbility::FullSpectrum);
    }

    let evolution_path = if web.frontier_affinity >= FRONTIER_PATH_AFFINITY {
        EvolutionPath::Frontier
    } else {
        pick(&EvolutionPath::CYCLE, charge.total())
    };

    let coverage_pct = (web.coverage * 100.0).round() as u32;
    let latent = LatentTraits {
        evolution_path,
        rare_abilities,
        physical_potential: ((personality.energy as u32 + coverage_pct) / 2) as u8,
        mental_potential: ((personality.curiosity as u32 + discipline as u32) / 2) as u8,
        social_potential: ((personality.social as u32 + personality.affection as u32) / 2) as u8,
    };

    DerivedTraits { physical, personality, latent, web }
}
