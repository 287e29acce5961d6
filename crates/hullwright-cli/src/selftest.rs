//! Reference-data self-check.
//!
//! Runs entirely in-process against the loaded catalog and the embedded
//! sample design. Prints one section per area and a pass/fail summary.

use hullwright_logic::catalog::{Catalog, CatalogEntry};
use hullwright_logic::design::{calculate_design_stats, DesignType, ShipDesign};
use hullwright_logic::hit_location::validate_chart;
use hullwright_logic::persistence::{load_design, load_design_json, save_design};
use hullwright_logic::validation::{classify, validate, DesignState};
use hullwright_logic::zones::find_zone_layout;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

/// Run every check; true when all passed.
pub fn run(catalog: &Catalog, sample_json: &str, verbose: bool) -> bool {
    println!("=== Hullwright Self-Test ===\n");

    let mut results = Vec::new();

    // 1. Catalog contents
    results.extend(check_catalog(catalog, verbose));

    // 2. Zone layouts & hit-location charts
    results.extend(check_zones(catalog, verbose));

    // 3. Sample design pipeline
    results.extend(check_sample(catalog, sample_json, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    failed == 0
}

fn ids_of<T: CatalogEntry>(items: &[T]) -> Vec<String> {
    items.iter().map(|i| i.id().to_string()).collect()
}

// ── 1. Catalog ──────────────────────────────────────────────────────────

fn check_catalog(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "catalog_has_hulls".into(),
        passed: !catalog.hulls.is_empty(),
        detail: format!("{} hulls loaded", catalog.hulls.len()),
    });

    let unique = catalog.check_unique_ids();
    results.push(TestResult {
        name: "catalog_unique_ids".into(),
        passed: unique.is_ok(),
        detail: match &unique {
            Ok(()) => "no duplicate ids in any category".into(),
            Err(e) => e.to_string(),
        },
    });

    // Every step a warship needs has at least one entry
    let empty: Vec<&str> = [
        ("power plants", catalog.power_plants.is_empty()),
        ("engines", catalog.engines.is_empty()),
        ("life support", catalog.life_support.is_empty()),
        ("accommodations", catalog.accommodations.is_empty()),
        ("weapons", catalog.weapons.is_empty()),
        ("command & control", catalog.command_control.is_empty()),
        ("sensors", catalog.sensors.is_empty()),
    ]
    .into_iter()
    .filter(|(_, is_empty)| *is_empty)
    .map(|(name, _)| name)
    .collect();
    results.push(TestResult {
        name: "catalog_core_categories".into(),
        passed: empty.is_empty(),
        detail: if empty.is_empty() {
            "every core category has entries".into()
        } else {
            format!("empty: {}", empty.join(", "))
        },
    });

    // Every launcher can fire some ordnance in the catalog
    let unarmed: Vec<&str> = catalog
        .launch_systems
        .iter()
        .filter(|l| !catalog.ordnance.iter().any(|o| l.ordnance_kinds.contains(&o.kind)))
        .map(|l| l.profile.id.as_str())
        .collect();
    results.push(TestResult {
        name: "launchers_have_ordnance".into(),
        passed: unarmed.is_empty(),
        detail: if unarmed.is_empty() {
            format!("{} launch systems all armed", catalog.launch_systems.len())
        } else {
            format!("no ordnance for: {}", unarmed.join(", "))
        },
    });

    if verbose {
        println!("  Weapons: {}", ids_of(&catalog.weapons).join(", "));
        println!("  Defenses: {}", ids_of(&catalog.defenses).join(", "));
    }

    results
}

// ── 2. Zones & charts ───────────────────────────────────────────────────

fn check_zones(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Zones & Hit Location ---");
    let mut results = Vec::new();

    let missing: Vec<&str> = catalog
        .hulls
        .iter()
        .filter(|h| find_zone_layout(h.ship_class, h.total_hull_points()).is_none())
        .map(|h| h.id.as_str())
        .collect();
    results.push(TestResult {
        name: "every_hull_has_layout".into(),
        passed: missing.is_empty(),
        detail: if missing.is_empty() {
            format!("{} hulls mapped to zone layouts", catalog.hulls.len())
        } else {
            format!("no layout for: {}", missing.join(", "))
        },
    });

    // Curated tables must partition their own die over their own zones
    let malformed: Vec<String> = catalog
        .hit_location_tables
        .iter()
        .filter(|t| !validate_chart(&t.to_chart(), &t.zones).is_empty())
        .map(|t| format!("d{} ({} zones)", t.hit_die, t.zones.len()))
        .collect();
    results.push(TestResult {
        name: "curated_tables_partition".into(),
        passed: malformed.is_empty(),
        detail: if malformed.is_empty() {
            format!("{} curated tables sound", catalog.hit_location_tables.len())
        } else {
            format!("malformed: {}", malformed.join(", "))
        },
    });

    // Skip hulls without a layout; the check above already failed them
    let mut bad_charts = Vec::new();
    for hull in catalog
        .hulls
        .iter()
        .filter(|h| find_zone_layout(h.ship_class, h.total_hull_points()).is_some())
    {
        let design = ShipDesign::new(&hull.name, hull, DesignType::Warship, catalog);
        let layout = design.zone_layout();
        let defects = validate_chart(&design.hit_location_chart, &layout.zones);
        if !defects.is_empty() {
            bad_charts.push(format!("{} ({} defects)", hull.id, defects.len()));
        }
        if verbose {
            println!(
                "  {:14} {:>6} HP  {} zones, limit {}, d{}",
                hull.id,
                hull.total_hull_points(),
                layout.zones.len(),
                layout.zone_limit,
                layout.hit_die
            );
        }
    }
    results.push(TestResult {
        name: "every_hull_chart_partitions".into(),
        passed: bad_charts.is_empty(),
        detail: if bad_charts.is_empty() {
            "all hull charts cover every roll once".into()
        } else {
            bad_charts.join(", ")
        },
    });

    results
}

// ── 3. Sample design ────────────────────────────────────────────────────

fn check_sample(catalog: &Catalog, sample_json: &str, verbose: bool) -> Vec<TestResult> {
    println!("--- Sample Design ---");
    let mut results = Vec::new();

    let loaded = match load_design_json(sample_json, catalog) {
        Ok(loaded) => loaded,
        Err(e) => {
            results.push(TestResult {
                name: "sample_loads".into(),
                passed: false,
                detail: format!("load error: {}", e),
            });
            return results;
        }
    };
    results.push(TestResult {
        name: "sample_loads".into(),
        passed: loaded.warnings.is_empty(),
        detail: if loaded.warnings.is_empty() {
            format!("{} loaded cleanly", loaded.design.name)
        } else {
            loaded
                .warnings
                .iter()
                .map(|w| w.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    });

    let design = loaded.design;
    let stats = calculate_design_stats(&design);
    results.push(TestResult {
        name: "sample_within_budget".into(),
        passed: stats.remaining_hull_points >= 0 && stats.power_balance >= 0,
        detail: format!(
            "{}/{} HP, power balance {:+}",
            stats.used_hull_points, stats.total_hull_points, stats.power_balance
        ),
    });

    let issues = validate(&design);
    let state = classify(&issues);
    results.push(TestResult {
        name: "sample_valid".into(),
        passed: state == DesignState::Valid,
        detail: if issues.is_empty() {
            "no issues".into()
        } else {
            issues
                .iter()
                .map(|i| i.rule)
                .collect::<Vec<_>>()
                .join(", ")
        },
    });

    // Saving and reloading must reproduce every derived figure
    let round_trip = load_design(&save_design(&design), catalog);
    let (passed, detail) = match round_trip {
        Ok(reloaded) if !reloaded.warnings.is_empty() => {
            (false, format!("{} warnings on reload", reloaded.warnings.len()))
        }
        Ok(reloaded) if calculate_design_stats(&reloaded.design) != stats => {
            (false, "stats differ after reload".to_string())
        }
        Ok(_) => (true, "stats identical after reload".to_string()),
        Err(e) => (false, format!("reload error: {}", e)),
    };
    results.push(TestResult {
        name: "sample_round_trip".into(),
        passed,
        detail,
    });

    if verbose {
        for row in &stats.breakdown {
            println!(
                "  {:24} {:>4} HP {:>4} PP",
                row.category.label(),
                row.hull_points,
                row.power
            );
        }
    }

    results
}
