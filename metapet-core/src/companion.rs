//! Companion — a minted creature: genome + expressed traits + lifecycle
//!
//! A companion's genome is fixed at minting. Breeding never edits a parent;
//! it mints a new companion whose genome is the breeding output.

use crate::breeding::{BreedingEngine, BreedingError, BreedingMode, InheritanceMap, ParentSlot};
use crate::evolution::{can_breed, EvolutionData};
use crate::genome::{decode_genome, DerivedTraits, Genome};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Companion {
    pub id: String,
    pub name: String,
    pub genome: Genome,
    pub traits: DerivedTraits,
    pub evolution: EvolutionData,
    /// 0 for minted companions, max(parents) + 1 for offspring
    pub generation: u32,
    pub lineage_key: Option<String>,
    pub parent_ids: Vec<String>,
    pub inheritance: Option<InheritanceMap>,
}

impl Companion {
    /// Mint a first-generation companion
    pub fn mint(name: impl Into<String>, genome: Genome, now: DateTime<Utc>) -> Self {
        let companion = Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            traits: decode_genome(&genome),
            genome,
            evolution: EvolutionData::new(now),
            generation: 0,
            lineage_key: None,
            parent_ids: Vec::new(),
            inheritance: None,
        };
        info!("Minted companion: {}", companion.summary());
        companion
    }

    /// Mint from opaque seed material
    pub fn from_seed(name: impl Into<String>, material: &str, now: DateTime<Utc>) -> Self {
        Self::mint(name, Genome::from_seed_material(material), now)
    }

    /// Copy with a new lifecycle record
    pub fn with_evolution(&self, evolution: EvolutionData) -> Self {
        Self { evolution, ..self.clone() }
    }

    pub fn summary(&self) -> String {
        format!(
            "Companion '{}' | gen={} | state={} | body={} | temperament={} | path={}",
            self.name,
            self.generation,
            self.evolution.state,
            self.traits.physical.body_type,
            self.traits.personality.temperament,
            self.traits.latent.evolution_path,
        )
    }
}

/// Breed two companions.
///
/// Rejects a missing parent or a parent short of SPECIATION before any
/// seeded computation runs. The offspring starts at GENETICS.
pub fn breed_companions(
    engine: &BreedingEngine,
    first: Option<&Companion>,
    second: Option<&Companion>,
    mode: BreedingMode,
    now: DateTime<Utc>,
) -> Result<Companion, BreedingError> {
    let a = first.ok_or(BreedingError::MissingParent(ParentSlot::First))?;
    let b = second.ok_or(BreedingError::MissingParent(ParentSlot::Second))?;
    if !can_breed(a.evolution.state, b.evolution.state) {
        warn!(
            "Rejected breeding of '{}' ({}) with '{}' ({})",
            a.name, a.evolution.state, b.name, b.evolution.state
        );
        return Err(BreedingError::NotAtTerminalStage {
            first: a.evolution.state,
            second: b.evolution.state,
        });
    }

    let result = engine.breed(&a.genome, &b.genome, mode)?;
    let child = Companion {
        id: Uuid::new_v4().to_string(),
        name: format!("{}⊕{}", a.name, b.name),
        genome: result.offspring,
        traits: result.traits,
        evolution: EvolutionData::new(now),
        generation: a.generation.max(b.generation) + 1,
        lineage_key: Some(result.lineage_key),
        parent_ids: vec![a.id.clone(), b.id.clone()],
        inheritance: Some(result.inheritance),
    };
    info!("Bred {} via {}", child.summary(), mode);
    Ok(child)
}
