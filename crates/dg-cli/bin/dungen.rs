//! Dungeon generator
//!
//! Reads a dungeon spec and writes one SVG per floor plus a JSON manifest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use dg_core::DungeonRng;
use dg_core::world::{DunSpec, Dungeon};

/// Dynamically generate dungeons
#[derive(Parser, Debug)]
#[command(name = "dungen")]
#[command(author, version, about = "Generate multi-floor dungeon maps as SVG", long_about = None)]
struct Args {
    /// Dungeon spec YAML file
    spec: PathBuf,

    /// Directory to write floors and the manifest into
    out_dir: PathBuf,

    /// Seed for reproducible output (random when omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Print a summary and log progress
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let spec = DunSpec::load(&args.spec)
        .with_context(|| format!("failed to load spec {}", args.spec.display()))?;

    let mut rng = match args.seed {
        Some(seed) => DungeonRng::new(seed),
        None => DungeonRng::from_entropy(),
    };
    log::info!("generating {} levels with seed {}", spec.floor_count, rng.seed());
    let dungeon = Dungeon::generate(&spec, &mut rng).context("dungeon generation failed")?;

    write_dungeon(&dungeon, &args.out_dir)?;

    if args.verbose {
        print_summary(&dungeon);
    }
    Ok(())
}

fn write_dungeon(dungeon: &Dungeon, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("failed to create {}", out_dir.display()))?;
    for (relative, document) in dungeon.documents() {
        let path = out_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, document.to_string())
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::debug!("wrote {}", path.display());
    }

    let manifest = out_dir.join("dungeon.json");
    let json = serde_json::to_string_pretty(dungeon)?;
    fs::write(&manifest, json).with_context(|| format!("failed to write {}", manifest.display()))?;
    Ok(())
}

fn print_summary(dungeon: &Dungeon) {
    println!("Dungeon has {} levels (seed {}):", dungeon.levels.len(), dungeon.seed);
    for (i, group) in dungeon.levels.iter().enumerate() {
        println!("  Level {} ({})", i + 1, group.name);
        for (j, floor) in group.floors.iter().enumerate() {
            let (up, down) = floor.level.stair_counts();
            println!(
                "    Floor {}: {} Rooms [{} U {} D].",
                j + 1,
                floor.level.rooms().len(),
                up,
                down
            );
        }
    }
}
