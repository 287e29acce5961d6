//! Text and JSON views of a design.

use std::fmt::Write;

use serde::Serialize;

use hullwright_logic::design::{DesignStats, ShipDesign};
use hullwright_logic::hit_location::{HitLocationChart, HitLocationEntry};
use hullwright_logic::validation::{DesignState, Issue, Severity};
use hullwright_logic::zones::{DamageZone, DiagramStatus, ZoneStatus};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportJson<'a> {
    pub name: &'a str,
    pub hull_id: &'a str,
    pub stats: &'a DesignStats,
    pub issues: &'a [Issue],
    pub state: DesignState,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonesJson<'a> {
    pub zones: &'a [DamageZone],
    pub diagram: &'a DiagramStatus,
    pub chart: &'a HitLocationChart,
}

/// `1234567` → `1,234,567`.
fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn report(
    design: &ShipDesign,
    stats: &DesignStats,
    issues: &[Issue],
    state: DesignState,
) -> String {
    let mut out = String::new();
    let hull = &design.hull;
    let _ = writeln!(
        out,
        "=== {} ({} {}, {}) ===",
        design.name,
        hull.ship_class,
        hull.name,
        design.design_type.name()
    );
    let _ = writeln!(
        out,
        "Hull points: {}/{} used, {} remaining",
        stats.used_hull_points, stats.total_hull_points, stats.remaining_hull_points
    );
    let _ = writeln!(
        out,
        "Power: {} generated, {} consumed, balance {:+} (FTL draw {} excluded)",
        stats.power_generated, stats.power_consumed, stats.power_balance, stats.ftl_power
    );
    let _ = writeln!(
        out,
        "Acceleration: {}  Crew: {}/{}  Cost: {}",
        stats.engines.acceleration,
        stats.support.crew_capacity,
        hull.crew,
        thousands(stats.total_cost)
    );

    out.push_str("\n--- Breakdown ---\n");
    let _ = writeln!(out, "  {:24} {:>6} {:>6} {:>14}", "", "HP", "PP", "Cost");
    let _ = writeln!(
        out,
        "  {:24} {:>6} {:>6} {:>14}",
        "Hull",
        "",
        "",
        thousands(hull.cost)
    );
    for row in &stats.breakdown {
        let _ = writeln!(
            out,
            "  {:24} {:>6} {:>6} {:>14}",
            row.category.label(),
            row.hull_points,
            row.power,
            thousands(row.cost)
        );
    }

    out.push_str("\n--- Issues ---\n");
    if issues.is_empty() {
        out.push_str("  none\n");
    }
    for issue in issues {
        let icon = match issue.severity {
            Severity::Error => "✗",
            Severity::Warning => "!",
        };
        let mut lines = issue.message.lines();
        let first = lines.next().unwrap_or_default();
        let _ = writeln!(out, "  {icon} {first} ({})", issue.rule);
        for line in lines {
            let _ = writeln!(out, "      {line}");
        }
    }

    let _ = writeln!(out, "\n=== STATE: {} ===", state.label());
    out
}

fn zone_status_label(zone: &DamageZone) -> &'static str {
    match zone.status() {
        ZoneStatus::Ok => "ok",
        ZoneStatus::Empty => "empty",
        ZoneStatus::OverCapacity => "over capacity",
    }
}

fn range(entry: &HitLocationEntry) -> String {
    if entry.min_roll == entry.max_roll {
        entry.min_roll.to_string()
    } else {
        format!("{}-{}", entry.min_roll, entry.max_roll)
    }
}

pub fn zones(design: &ShipDesign, diagram: &DiagramStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} damage zones ===", design.name);
    for zone in &design.damage_zones {
        let _ = writeln!(
            out,
            "  {:3} {:>4}/{:<4} {}",
            zone.code.code(),
            zone.total_hull_points,
            zone.max_hull_points,
            zone_status_label(zone)
        );
        for system in &zone.systems {
            let _ = writeln!(
                out,
                "        {:4} HP  {} [{}]",
                system.hull_points, system.name, system.installed_id
            );
        }
    }
    if !diagram.unassigned.is_empty() {
        let ids: Vec<&str> = diagram.unassigned.iter().map(|id| id.as_str()).collect();
        let _ = writeln!(out, "  unassigned: {}", ids.join(", "));
    }
    let _ = writeln!(
        out,
        "  diagram {}",
        if diagram.complete { "complete" } else { "incomplete" }
    );

    let chart = &design.hit_location_chart;
    let _ = writeln!(out, "\n--- Hit location (d{}) ---", chart.hit_die);
    for column in &chart.columns {
        let cells: Vec<String> = column
            .entries
            .iter()
            .map(|e| format!("{} {}", range(e), e.zone))
            .collect();
        let _ = writeln!(out, "  {:10} {}", format!("{:?}", column.direction), cells.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn single_roll_ranges_print_once() {
        use hullwright_logic::zones::ZoneCode;
        let one = HitLocationEntry {
            min_roll: 6,
            max_roll: 6,
            zone: ZoneCode::Aft,
        };
        let span = HitLocationEntry {
            min_roll: 1,
            max_roll: 3,
            zone: ZoneCode::Forward,
        };
        assert_eq!(range(&one), "6");
        assert_eq!(range(&span), "1-3");
    }
}
