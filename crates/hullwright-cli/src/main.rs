//! Hullwright headless harness
//!
//! Loads a catalog and a saved design from JSON and prints the derived
//! state: totals, breakdown, validation issues, zone diagram and
//! hit-location chart. Also lists catalog entries under design constraints
//! and self-checks the shipped reference data.
//!
//! Usage:
//!   hullwright report data/sample_design.json
//!   hullwright zones data/sample_design.json --auto-assign
//!   hullwright catalog weapons --pl 7 --tech energy
//!   hullwright selftest --verbose

mod render;
mod selftest;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use hullwright_logic::catalog::{filter_by_constraints, Catalog, CatalogEntry};
use hullwright_logic::design::{calculate_design_stats, ShipDesign, DEFAULT_PROGRESS_LEVEL};
use hullwright_logic::persistence::{load_design_json, LoadedDesign};
use hullwright_logic::validation::{classify, validate};

// ── Embedded reference data ─────────────────────────────────────────────
const CATALOG_JSON: &str = include_str!("../../../data/catalog.json");
const SAMPLE_DESIGN_JSON: &str = include_str!("../../../data/sample_design.json");

#[derive(Parser, Debug)]
#[command(author, version, about = "Starship design calculations")]
struct Cli {
    /// Catalog JSON to use instead of the embedded one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals, per-category breakdown, validation issues and design state.
    Report {
        /// Saved design JSON.
        design: PathBuf,
    },
    /// Damage-zone diagram and hit-location chart.
    Zones {
        /// Saved design JSON.
        design: PathBuf,
        /// Place every unassigned system before printing.
        #[arg(long)]
        auto_assign: bool,
    },
    /// Catalog entries available under a progress level and tech tracks.
    Catalog {
        category: Category,
        /// Progress-level ceiling.
        #[arg(long, default_value_t = DEFAULT_PROGRESS_LEVEL)]
        pl: u8,
        /// Allowed tech track; repeat for more. None means every track.
        #[arg(long = "tech")]
        tech: Vec<String>,
    },
    /// Check the reference data and the sample design.
    Selftest {
        #[arg(long)]
        verbose: bool,
    },
    /// Print the embedded sample design.
    Sample,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Category {
    Hulls,
    Armor,
    PowerPlants,
    Engines,
    FtlDrives,
    LifeSupport,
    Accommodations,
    Evacuation,
    Gravity,
    Weapons,
    LaunchSystems,
    Ordnance,
    Defenses,
    CommandControl,
    Sensors,
    HangarMisc,
}

/// One catalog listing line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryRow {
    id: String,
    name: String,
    progress_level: u8,
    tech_tracks: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Command::Report { design } => handle_report(&catalog, &design, cli.json),
        Command::Zones {
            design,
            auto_assign,
        } => handle_zones(&catalog, &design, auto_assign, cli.json),
        Command::Catalog { category, pl, tech } => {
            handle_catalog(&catalog, category, pl, &tech, cli.json)
        }
        Command::Selftest { verbose } => {
            if !selftest::run(&catalog, SAMPLE_DESIGN_JSON, verbose) {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Sample => {
            print!("{SAMPLE_DESIGN_JSON}");
            Ok(())
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {}", path.display()))?;
            Catalog::from_json(&json)
                .with_context(|| format!("failed to parse catalog {}", path.display()))
        }
        None => Catalog::from_json(CATALOG_JSON).context("embedded catalog is malformed"),
    }
}

fn load_design(catalog: &Catalog, path: &Path) -> Result<ShipDesign> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read design {}", path.display()))?;
    let LoadedDesign { design, warnings } = load_design_json(&json, catalog)
        .with_context(|| format!("failed to load design {}", path.display()))?;
    for warning in &warnings {
        tracing::warn!("{}: {}", path.display(), warning);
    }
    Ok(design)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

fn handle_report(catalog: &Catalog, path: &Path, json: bool) -> Result<()> {
    let design = load_design(catalog, path)?;
    let stats = calculate_design_stats(&design);
    let issues = validate(&design);
    let state = classify(&issues);
    if json {
        return print_json(&render::ReportJson {
            name: &design.name,
            hull_id: &design.hull.id,
            stats: &stats,
            issues: &issues,
            state,
        });
    }
    print!("{}", render::report(&design, &stats, &issues, state));
    Ok(())
}

fn handle_zones(catalog: &Catalog, path: &Path, auto_assign: bool, json: bool) -> Result<()> {
    let mut design = load_design(catalog, path)?;
    if auto_assign {
        design = design.auto_assign_zones();
    }
    let diagram = design.diagram_status();
    if json {
        return print_json(&render::ZonesJson {
            zones: &design.damage_zones,
            diagram: &diagram,
            chart: &design.hit_location_chart,
        });
    }
    print!("{}", render::zones(&design, &diagram));
    Ok(())
}

fn rows<T: CatalogEntry>(items: &[T], pl: u8, tech: &[String]) -> Vec<EntryRow> {
    filter_by_constraints(items, pl, tech)
        .into_iter()
        .map(|item| EntryRow {
            id: item.id().to_string(),
            name: item.name().to_string(),
            progress_level: item.progress_level(),
            tech_tracks: item.tech_tracks().to_vec(),
        })
        .collect()
}

fn handle_catalog(
    catalog: &Catalog,
    category: Category,
    pl: u8,
    tech: &[String],
    json: bool,
) -> Result<()> {
    let listed = match category {
        Category::Hulls => rows(&catalog.hulls, pl, tech),
        Category::Armor => rows(&catalog.armor, pl, tech),
        Category::PowerPlants => rows(&catalog.power_plants, pl, tech),
        Category::Engines => rows(&catalog.engines, pl, tech),
        Category::FtlDrives => rows(&catalog.ftl_drives, pl, tech),
        Category::LifeSupport => rows(&catalog.life_support, pl, tech),
        Category::Accommodations => rows(&catalog.accommodations, pl, tech),
        Category::Evacuation => rows(&catalog.evacuation, pl, tech),
        Category::Gravity => rows(&catalog.gravity, pl, tech),
        Category::Weapons => rows(&catalog.weapons, pl, tech),
        Category::LaunchSystems => rows(&catalog.launch_systems, pl, tech),
        Category::Ordnance => rows(&catalog.ordnance, pl, tech),
        Category::Defenses => rows(&catalog.defenses, pl, tech),
        Category::CommandControl => rows(&catalog.command_control, pl, tech),
        Category::Sensors => rows(&catalog.sensors, pl, tech),
        Category::HangarMisc => rows(&catalog.hangar_misc, pl, tech),
    };
    if json {
        return print_json(&listed);
    }
    for row in &listed {
        let tracks = if row.tech_tracks.is_empty() {
            String::new()
        } else {
            format!("  [{}]", row.tech_tracks.join(", "))
        };
        println!("{:24} PL{}  {}{}", row.id, row.progress_level, row.name, tracks);
    }
    println!("{} available at PL {pl}", listed.len());
    Ok(())
}
