//! Meta-Pet CLI — explore the element lattice, genomes, breeding and lifecycle
//!
//! Commands:
//!   metapet element     — show the profile of one element
//!   metapet residues    — list the 60 residue nodes and bridges
//!   metapet decode      — mint a genome from seed text and decode its traits
//!   metapet breed       — breed two seeded genomes
//!   metapet similarity  — compare two seeded genomes
//!   metapet predict     — preview the trait spread of a pairing
//!   metapet lifecycle   — simulate a companion through all four stages
//!   metapet config      — validate and print a config file
//!   metapet demo        — run everything end to end

use chrono::{Duration, Utc};
use metapet_core::breeding::{BreedingEngine, BreedingMode, InheritanceSource, SeededRng};
use metapet_core::evolution::{EvolutionData, EvolutionState, Vitals};
use metapet_core::genome::{decode_genome, DerivedTraits, Genome};
use metapet_core::lattice::{build_residue_nodes, profile, NodeKind};
use metapet_core::{breed_companions, calculate_similarity, Companion, CoreConfig};
use std::env;
use std::fs;

fn print_usage() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║        Meta-Pet core — base-60 / base-7 companions           ║
╚══════════════════════════════════════════════════════════════╝

Usage: metapet <command> [options]

Commands:
  element    <z>                         Profile of element z (1..118)
  residues                               The 60 residue nodes and bridges
  decode     <seed>                      Mint a genome and decode its traits
  breed      <seed_a> <seed_b> [mode]    Breed (mode: BALANCED|DOMINANT|MUTATION)
  similarity <seed_a> <seed_b>           Slot-match similarity in percent
  predict    <seed_a> <seed_b>           Preview possible offspring traits
  lifecycle  [config.json]               Simulate GENETICS -> SPECIATION
  config     [config.json]               Validate and print a config
  demo                                   Run a full demo

Examples:
  metapet element 36
  metapet decode aurora
  metapet breed aurora borealis MUTATION
  metapet config core.json
"#
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "element" => cmd_element(&args[2..]),
        "residues" => cmd_residues(),
        "decode" => cmd_decode(&args[2..]),
        "breed" => cmd_breed(&args[2..]),
        "similarity" => cmd_similarity(&args[2..]),
        "predict" => cmd_predict(&args[2..]),
        "lifecycle" => cmd_lifecycle(&args[2..]),
        "config" => cmd_config(&args[2..]),
        "demo" => cmd_demo(),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
        }
    }
}

/// Load a config file, or defaults when no path is given
fn load_config(path: Option<&String>) -> Option<CoreConfig> {
    let Some(path) = path else {
        return Some(CoreConfig::default());
    };
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("  Failed to read {}: {}", path, e);
            return None;
        }
    };
    match CoreConfig::from_json_str(&text) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("  {}: {}", path, e);
            None
        }
    }
}

fn print_traits(traits: &DerivedTraits) {
    let p = &traits.physical;
    let q = &traits.personality;
    let l = &traits.latent;
    println!("  Body:        {} / {} / {}", p.body_type, p.pattern, p.texture);
    println!("  Colours:     {} on {}  (size {:.2})", p.primary_color, p.secondary_color, p.size);
    println!(
        "  Temperament: {}  energy={} social={} curiosity={} discipline={} affection={}",
        q.temperament, q.energy, q.social, q.curiosity, q.discipline, q.affection
    );
    println!(
        "  Latent:      path={}  potentials={}/{}/{}",
        l.evolution_path, l.physical_potential, l.mental_potential, l.social_potential
    );
    if !l.rare_abilities.is_empty() {
        let names: Vec<String> = l.rare_abilities.iter().map(|a| a.to_string()).collect();
        println!("  Abilities:   {}", names.join(", "));
    }
    let w = &traits.web;
    println!(
        "  Element web: coverage={:.1}%  bridges={}  frontier={:.2}  charge=({},{},{})",
        w.coverage * 100.0,
        w.bridge_count,
        w.frontier_affinity,
        w.charge.c2,
        w.charge.c3,
        w.charge.c5
    );
}

fn cmd_element(args: &[String]) {
    let Some(z) = args.first().and_then(|s| s.parse::<u32>().ok()) else {
        eprintln!("Usage: metapet element <z>");
        return;
    };
    match profile(z) {
        Ok(p) => {
            println!("\n  {} ({}) z={}", p.name, p.symbol, p.z);
            println!("  {}", "-".repeat(40));
            println!("  60-adic:     residue={} tier={}", p.residue, p.tier);
            println!(
                "  Factors:     2^{} · 3^{} · 5^{} · {}",
                p.factors.e2, p.factors.e3, p.factors.e5, p.factors.unit
            );
            println!("  Base 7:      ({}, {}, {})", p.base7.d0(), p.base7.d1(), p.base7.d2());
            println!(
                "  Flags:       beyond_lead={} transuranic={} superheavy={}",
                p.flags.beyond_lead, p.flags.transuranic, p.flags.superheavy
            );
        }
        Err(e) => eprintln!("  {}", e),
    }
}

fn cmd_residues() {
    let nodes = build_residue_nodes();
    println!("\n  Residue nodes ({}):", nodes.len());
    println!("  {}", "-".repeat(60));
    for node in &nodes {
        let kind = match node.kind {
            NodeKind::Empty => "empty".to_string(),
            NodeKind::Single(z) => format!("single {}", z),
            NodeKind::Bridge(b) => format!("bridge {}/{}", b.lower, b.upper),
        };
        println!(
            "  r={:>2}  {:<14} charge=({},{},{}) |{:.3}| {:?}",
            node.residue,
            kind,
            node.charge.c2,
            node.charge.c3,
            node.charge.c5,
            node.charge.magnitude(),
            node.purity
        );
    }
    let bridges = nodes.iter().filter(|n| n.bridge().is_some()).count();
    println!("\n  {} bridges", bridges);
}

fn cmd_decode(args: &[String]) {
    let Some(seed) = args.first() else {
        eprintln!("Usage: metapet decode <seed>");
        return;
    };
    let genome = Genome::from_seed_material(seed);
    println!("\n  Genome: {}", genome);
    print_traits(&decode_genome(&genome));
}

fn parse_mode(arg: Option<&String>) -> Option<BreedingMode> {
    match arg {
        None => Some(BreedingMode::default()),
        Some(s) => match s.parse() {
            Ok(mode) => Some(mode),
            Err(e) => {
                eprintln!("  {}", e);
                None
            }
        },
    }
}

fn source_label(source: InheritanceSource) -> &'static str {
    match source {
        InheritanceSource::Parent1 => "parent 1",
        InheritanceSource::Parent2 => "parent 2",
        InheritanceSource::Mixed => "mixed",
    }
}

fn cmd_breed(args: &[String]) {
    if args.len() < 2 {
        eprintln!("Usage: metapet breed <seed_a> <seed_b> [mode]");
        return;
    }
    let Some(mode) = parse_mode(args.get(2)) else {
        return;
    };
    let a = Genome::from_seed_material(&args[0]);
    let b = Genome::from_seed_material(&args[1]);
    match BreedingEngine::default().breed(&a, &b, mode) {
        Ok(result) => {
            println!("\n  Bred via {}  lineage={}", result.mode, result.lineage_key);
            println!("  Offspring: {}", result.offspring);
            println!(
                "  Inheritance: red={} blue={} black={}",
                source_label(result.inheritance.red),
                source_label(result.inheritance.blue),
                source_label(result.inheritance.black)
            );
            print_traits(&result.traits);
        }
        Err(e) => eprintln!("  Breeding failed: {}", e),
    }
}

fn cmd_similarity(args: &[String]) {
    if args.len() < 2 {
        eprintln!("Usage: metapet similarity <seed_a> <seed_b>");
        return;
    }
    let a = Genome::from_seed_material(&args[0]);
    let b = Genome::from_seed_material(&args[1]);
    println!("\n  Similarity: {:.2}%", calculate_similarity(&a, &b));
}

fn cmd_predict(args: &[String]) {
    if args.len() < 2 {
        eprintln!("Usage: metapet predict <seed_a> <seed_b>");
        return;
    }
    let a = Genome::from_seed_material(&args[0]);
    let b = Genome::from_seed_material(&args[1]);
    match BreedingEngine::default().predict_offspring(&a, &b) {
        Ok(prediction) => {
            println!("\n  Confidence: {:.2}", prediction.confidence);
            println!("  Possible traits ({}):", prediction.possible_traits.len());
            for label in &prediction.possible_traits {
                println!("    {}", label);
            }
        }
        Err(e) => eprintln!("  Prediction failed: {}", e),
    }
}

/// Hour-by-hour care loop until SPECIATION or the time limit
fn simulate_lifecycle(config: &CoreConfig, seed: u32, max_hours: i64) -> EvolutionData {
    let start = Utc::now();
    let mut rng = SeededRng::new(seed);
    let mut vitals = Vitals::default();
    let mut data = EvolutionData::new(start);

    for hour in 1..=max_hours {
        let now = start + Duration::hours(hour);
        vitals = vitals.tick(&config.vitals, &mut rng);
        if vitals.average() < 80.0 {
            vitals = vitals
                .feed(&config.vitals)
                .clean(&config.vitals)
                .play(&config.vitals)
                .rest(&config.vitals);
        }
        data = data.gain_experience(2.0).refreshed(&config.evolution, vitals.average(), now);
        if data.can_evolve {
            data = data.advance(now);
            println!("  hour {:>4}: evolved to {}  (vitals {:.1})", hour, data.state, vitals.average());
        }
        if data.state.is_terminal() {
            break;
        }
    }
    data
}

fn cmd_lifecycle(args: &[String]) {
    let Some(config) = load_config(args.first()) else {
        return;
    };
    println!("\n  Lifecycle simulation");
    println!("  {}", "-".repeat(40));
    let data = simulate_lifecycle(&config, 7, 24 * 60);
    println!(
        "  Final: {}  interactions={}  breedable={}",
        data.state,
        data.total_interactions,
        data.state == EvolutionState::Speciation
    );
}

fn cmd_config(args: &[String]) {
    let Some(config) = load_config(args.first()) else {
        return;
    };
    match config.to_json_pretty() {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("  {}", e),
    }
}

fn cmd_demo() {
    println!("\n=== Meta-Pet Demo ===\n");

    println!("[1/5] Element lattice");
    cmd_element(&["36".to_string()]);
    let nodes = build_residue_nodes();
    let bridges = nodes.iter().filter(|n| n.bridge().is_some()).count();
    println!("  {} residue nodes, {} bridges", nodes.len(), bridges);

    println!("\n[2/5] Minting companions");
    let now = Utc::now();
    let aurora = Companion::from_seed("Aurora", "aurora", now);
    let borealis = Companion::from_seed("Borealis", "borealis", now);
    println!("  {}", aurora.summary());
    println!("  {}", borealis.summary());
    println!(
        "  Similarity: {:.2}%",
        calculate_similarity(&aurora.genome, &borealis.genome)
    );

    println!("\n[3/5] Lifecycle");
    let config = CoreConfig::default();
    let grown = simulate_lifecycle(&config, 42, 24 * 60);

    println!("\n[4/5] Breeding gate");
    let engine = BreedingEngine::new(config.breeding.clone());
    match breed_companions(&engine, Some(&aurora), Some(&borealis), BreedingMode::Balanced, now) {
        Ok(_) => println!("  Unexpected: GENETICS companions bred"),
        Err(e) => println!("  Rejected as expected: {}", e),
    }

    println!("\n[5/5] Breeding at {}", grown.state);
    let aurora = aurora.with_evolution(grown.clone());
    let borealis = borealis.with_evolution(grown);
    for mode in BreedingMode::ALL {
        match breed_companions(&engine, Some(&aurora), Some(&borealis), mode, now) {
            Ok(child) => println!(
                "  {:<9} gen={} lineage={}",
                mode.to_string(),
                child.generation,
                child.lineage_key.unwrap_or_default()
            ),
            Err(e) => println!("  {:<9} failed: {}", mode.to_string(), e),
        }
    }
    match engine.predict_offspring(&aurora.genome, &borealis.genome) {
        Ok(p) => println!(
            "  Preview: {} possible traits, confidence {:.2}",
            p.possible_traits.len(),
            p.confidence
        ),
        Err(e) => println!("  Preview failed: {}", e),
    }

    println!("\n=== Demo complete ===");
}
