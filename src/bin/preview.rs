//! Loadout preview tool
//!
//! Loads a catalog and a configuration from disk, runs many seeded
//! generations against an in-memory character, and prints the resulting
//! selection distribution. Seeds are deterministic, so a run can be
//! reproduced exactly while tuning weights.

use ahash::AHashMap;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;

use outfitter::catalog::StaticCatalog;
use outfitter::compat::NoopCompat;
use outfitter::core::types::{FactionId, TemplateId};
use outfitter::generate::{GenerationContext, LoadoutGenerator, MemoryCharacter};
use outfitter::spec::{ConfigStore, EquipCategory};

#[derive(Parser)]
#[command(about = "Preview loadout generation distributions for a template")]
struct Args {
    /// TOML catalog definition file
    #[arg(long)]
    catalog: PathBuf,

    /// JSON loadout configuration file
    #[arg(long)]
    config: PathBuf,

    #[arg(long)]
    faction: String,

    #[arg(long)]
    template: String,

    /// Number of generation runs
    #[arg(long, default_value_t = 1000)]
    runs: u64,

    /// Base seed; run N uses seed + N
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    let mut catalog = StaticCatalog::new();
    if let Err(err) = catalog.load_from_file(&args.catalog) {
        eprintln!("failed to load catalog: {}", err);
        std::process::exit(1);
    }

    let store = match ConfigStore::load_from_file(&args.config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("failed to load configuration: {}", err);
            std::process::exit(1);
        }
    };

    let faction = FactionId::new(args.faction);
    let template = TemplateId::new(args.template);
    if store.spec_for(&faction, &template).is_none() {
        eprintln!("no loadout configured for {} / {}", faction, template);
        std::process::exit(1);
    }

    println!("Previewing {} runs for {} / {}", args.runs, faction, template);
    println!("Catalog: {} items, {} conditions", catalog.item_count(), catalog.condition_count());
    println!();

    let compat = NoopCompat;
    let generator = LoadoutGenerator::new(&catalog, &compat);

    let mut equip_tallies: AHashMap<(EquipCategory, String), u64> = AHashMap::new();
    let mut condition_tallies: AHashMap<String, u64> = AHashMap::new();

    for run in 0..args.runs {
        let mut character = MemoryCharacter::new();
        let mut ctx = GenerationContext::new();
        let mut rng = ChaCha8Rng::seed_from_u64(args.seed + run);
        generator.generate(&store, &faction, &template, &mut character, &mut ctx, &mut rng);

        for category in EquipCategory::ALL {
            if let Some(item) = character.equipped(category) {
                *equip_tallies
                    .entry((category, item.item.to_string()))
                    .or_default() += 1;
            }
        }
        for (condition, _, _) in character.conditions() {
            *condition_tallies.entry(condition.to_string()).or_default() += 1;
        }
    }

    for category in EquipCategory::ALL {
        let mut rows: Vec<(&String, &u64)> = equip_tallies
            .iter()
            .filter(|((cat, _), _)| *cat == category)
            .map(|((_, item), count)| (item, count))
            .collect();
        if rows.is_empty() {
            continue;
        }
        rows.sort_by(|a, b| b.1.cmp(a.1));

        println!("--- {} ---", category.label());
        for (item, count) in rows {
            let share = *count as f64 / args.runs as f64 * 100.0;
            println!("  {:<30} {:>7}  {:>5.1}%", item, count, share);
        }
        println!();
    }

    if !condition_tallies.is_empty() {
        let mut rows: Vec<(&String, &u64)> = condition_tallies.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(a.1));
        println!("--- conditions (applications) ---");
        for (condition, count) in rows {
            println!("  {:<30} {:>7}", condition, count);
        }
    }
}
