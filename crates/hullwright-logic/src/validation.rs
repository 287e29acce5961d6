//! Validation rule set.
//!
//! Each [`Rule`] is an independent check over a [`DesignSnapshot`] that
//! yields at most one [`Issue`]. [`validate`] evaluates every rule; only the
//! roll-up [`classify`] orders them (error beats warning beats valid).
//! Budget violations are design states, never `Err`.

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::{is_available, CatalogEntry};
use crate::design::{calculate_design_stats, DesignStats, DesignStep, Requirement, ShipDesign};
use crate::ids::InstalledId;
use crate::power::{orphaned_fuel_tanks, FuelConsumer};
use crate::zones::DiagramStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Name of the rule that produced it.
    pub rule: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    fn error(message: String) -> Self {
        Self {
            rule: "",
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            rule: "",
            severity: Severity::Warning,
            message,
        }
    }
}

/// Everything a rule may read: the design, its aggregate stats and the
/// zone-diagram status.
#[derive(Debug, Clone)]
pub struct DesignSnapshot<'a> {
    pub design: &'a ShipDesign,
    pub stats: DesignStats,
    pub diagram: DiagramStatus,
}

impl<'a> DesignSnapshot<'a> {
    pub fn capture(design: &'a ShipDesign) -> Self {
        Self {
            design,
            stats: calculate_design_stats(design),
            diagram: design.diagram_status(),
        }
    }
}

/// A named, independent check.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub check: fn(&DesignSnapshot<'_>) -> Option<Issue>,
}

impl Rule {
    pub fn evaluate(&self, snapshot: &DesignSnapshot<'_>) -> Option<Issue> {
        (self.check)(snapshot).map(|issue| Issue {
            rule: self.name,
            ..issue
        })
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Overall state of a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DesignState {
    Valid,
    Warning,
    Error,
}

impl DesignState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Error beats warning beats valid.
pub fn classify(issues: &[Issue]) -> DesignState {
    if issues.iter().any(|i| i.severity == Severity::Error) {
        DesignState::Error
    } else if issues.is_empty() {
        DesignState::Valid
    } else {
        DesignState::Warning
    }
}

/// Evaluate every default rule against a design.
pub fn validate(design: &ShipDesign) -> Vec<Issue> {
    validate_with(&default_rules(), &DesignSnapshot::capture(design))
}

pub fn validate_with(rules: &[Rule], snapshot: &DesignSnapshot<'_>) -> Vec<Issue> {
    let issues: Vec<Issue> = rules.iter().filter_map(|r| r.evaluate(snapshot)).collect();
    log::debug!(
        "Validated {}: {} issues from {} rules",
        snapshot.design.name,
        issues.len(),
        rules.len()
    );
    issues
}

pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule { name: "hull-points-exceeded", check: hull_points_exceeded },
        Rule { name: "mandatory-missing", check: mandatory_missing },
        Rule { name: "power-deficit", check: power_deficit },
        Rule { name: "crew-accommodation", check: crew_accommodation },
        Rule { name: "life-support", check: life_support },
        Rule { name: "evacuation", check: evacuation },
        Rule { name: "empty-launchers", check: empty_launchers },
        Rule { name: "launcher-over-capacity", check: launcher_over_capacity },
        Rule { name: "no-active-sensor", check: no_active_sensor },
        Rule { name: "battery-without-fire-control", check: battery_without_fire_control },
        Rule { name: "orphaned-fire-control", check: orphaned_fire_control },
        Rule { name: "orphaned-sensor-control", check: orphaned_sensor_control },
        Rule { name: "unlinked-controls", check: unlinked_controls },
        Rule { name: "optional-steps-incomplete", check: optional_steps_incomplete },
        Rule { name: "above-constraints", check: above_constraints },
        Rule { name: "multiple-screens", check: multiple_screens },
        Rule { name: "not-applicable-systems", check: not_applicable_systems },
        Rule { name: "weapons-without-arcs", check: weapons_without_arcs },
        Rule { name: "excess-arcs", check: excess_arcs },
        Rule { name: "disallowed-mounts", check: disallowed_mounts },
        Rule { name: "incompatible-ordnance", check: incompatible_ordnance },
        Rule { name: "illegal-for-class", check: illegal_for_class },
        Rule { name: "undersized-systems", check: undersized_systems },
        Rule { name: "orphaned-fuel-tanks", check: orphaned_fuel_tank_rule },
        Rule { name: "zone-diagram-incomplete", check: zone_diagram_incomplete },
    ]
}

fn join_ids(ids: &[InstalledId]) -> String {
    ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
}

fn warn_if_any(ids: &[InstalledId], what: &str) -> Option<Issue> {
    if ids.is_empty() {
        return None;
    }
    Some(Issue::warning(format!("{what}: {}", join_ids(ids))))
}

// ============================================================================
// BUDGET & MANDATORY
// ============================================================================

fn hull_points_exceeded(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let remaining = s.stats.remaining_hull_points;
    (remaining < 0).then(|| Issue::error(format!("Hull points exceeded by {}", -remaining)))
}

fn mandatory_missing(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let missing: Vec<&str> = DesignStep::ALL
        .iter()
        .filter(|step| s.design.design_type.requirement(**step) == Requirement::Mandatory)
        .filter(|step| !s.design.has_step(**step))
        .map(|step| step.label())
        .collect();
    if missing.is_empty() {
        return None;
    }
    Some(Issue::error(format!(
        "{} requires: {}",
        s.design.design_type.name(),
        missing.join(", ")
    )))
}

fn power_deficit(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let stats = &s.stats;
    (stats.power_consumed > stats.power_generated).then(|| {
        Issue::warning(format!(
            "Power deficit of {} ({} consumed, {} generated; FTL excluded)",
            stats.power_consumed - stats.power_generated,
            stats.power_consumed,
            stats.power_generated
        ))
    })
}

// ============================================================================
// SUPPORT
// ============================================================================

fn crew_accommodation(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let crew = s.design.hull.crew;
    let capacity = s.stats.support.crew_capacity;
    (capacity < crew).then(|| {
        Issue::warning(format!(
            "Crew quarters for {capacity} of {crew} required crew"
        ))
    })
}

fn life_support(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let covered = s.stats.support.life_support_coverage;
    let total = s.stats.total_hull_points;
    (covered < total).then(|| {
        Issue::warning(format!(
            "Life support covers {covered} of {total} hull points"
        ))
    })
}

fn evacuation(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let aboard = s.design.hull.crew + s.stats.support.troop_capacity;
    let capacity = s.stats.support.evacuation_capacity;
    (capacity < aboard).then(|| {
        Issue::warning(format!(
            "Evacuation capacity {capacity} is short of {aboard} crew and troops"
        ))
    })
}

// ============================================================================
// WEAPONS, ORDNANCE & CONTROLS
// ============================================================================

fn empty_launchers(s: &DesignSnapshot<'_>) -> Option<Issue> {
    warn_if_any(&s.stats.ordnance.empty_launchers, "Launchers with no ordnance loaded")
}

fn launcher_over_capacity(s: &DesignSnapshot<'_>) -> Option<Issue> {
    warn_if_any(&s.stats.ordnance.over_capacity, "Launchers loaded past capacity")
}

fn no_active_sensor(s: &DesignSnapshot<'_>) -> Option<Issue> {
    (!s.stats.sensors.has_active_sensor)
        .then(|| Issue::warning("No active sensor installed".to_string()))
}

fn battery_without_fire_control(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let controlled = &s.stats.command.controlled_batteries;
    let uncovered: Vec<&str> = s
        .stats
        .weapons
        .batteries
        .iter()
        .chain(&s.stats.ordnance.batteries)
        .filter(|b| !controlled.contains(&b.key))
        .map(|b| b.name.as_str())
        .collect();
    if uncovered.is_empty() {
        return None;
    }
    Some(Issue::warning(format!(
        "Batteries without fire control: {}",
        uncovered.join(", ")
    )))
}

fn orphaned_fire_control(s: &DesignSnapshot<'_>) -> Option<Issue> {
    warn_if_any(
        &s.stats.command.orphaned_fire_controls,
        "Fire control linked to a battery that no longer exists",
    )
}

fn orphaned_sensor_control(s: &DesignSnapshot<'_>) -> Option<Issue> {
    warn_if_any(
        &s.stats.command.orphaned_sensor_controls,
        "Sensor control linked to a sensor that no longer exists",
    )
}

fn unlinked_controls(s: &DesignSnapshot<'_>) -> Option<Issue> {
    warn_if_any(&s.stats.command.unlinked_controls, "Controls not linked to anything")
}

fn weapons_without_arcs(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let ids: Vec<InstalledId> = s
        .stats
        .weapons
        .without_arcs
        .iter()
        .chain(&s.stats.ordnance.without_arcs)
        .cloned()
        .collect();
    warn_if_any(&ids, "Weapons with no firing arc")
}

fn excess_arcs(s: &DesignSnapshot<'_>) -> Option<Issue> {
    warn_if_any(&s.stats.weapons.excess_arcs, "Weapons with more arcs than their mount allows")
}

fn disallowed_mounts(s: &DesignSnapshot<'_>) -> Option<Issue> {
    warn_if_any(&s.stats.weapons.disallowed_mounts, "Weapons on a mount their type does not allow")
}

fn incompatible_ordnance(s: &DesignSnapshot<'_>) -> Option<Issue> {
    warn_if_any(
        &s.stats.ordnance.incompatible_ordnance,
        "Launchers loaded with ordnance they cannot fire",
    )
}

// ============================================================================
// STEPS & CONSTRAINTS
// ============================================================================

/// One issue listing every expected step with nothing installed.
fn optional_steps_incomplete(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let lines: Vec<String> = DesignStep::ALL
        .iter()
        .filter(|step| s.design.design_type.requirement(**step) == Requirement::Expected)
        .filter(|step| !s.design.has_step(**step))
        .map(|step| format!("- no {}", step.label()))
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(Issue::warning(format!(
        "Optional steps incomplete:\n{}",
        lines.join("\n")
    )))
}

fn not_applicable_systems(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let present: Vec<&str> = DesignStep::ALL
        .iter()
        .filter(|step| s.design.design_type.requirement(**step) == Requirement::NotApplicable)
        .filter(|step| s.design.has_step(**step))
        .map(|step| step.label())
        .collect();
    if present.is_empty() {
        return None;
    }
    Some(Issue::warning(format!(
        "{} cannot use: {}",
        s.design.design_type.name(),
        present.join(", ")
    )))
}

fn above_constraints(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let d = s.design;
    let ceiling = d.constraints.progress_level;
    let tracks = &d.constraints.tech_tracks;

    let mut entries: Vec<&dyn CatalogEntry> = Vec::new();
    entries.push(&d.hull);
    entries.extend(d.armor.iter().map(|x| &x.armor_type as &dyn CatalogEntry));
    entries.extend(d.power_plants.iter().map(|x| &x.plant_type as &dyn CatalogEntry));
    entries.extend(d.engines.iter().map(|x| &x.engine_type as &dyn CatalogEntry));
    entries.extend(d.ftl_drives.iter().map(|x| &x.drive_type as &dyn CatalogEntry));
    entries.extend(d.life_support.iter().map(|x| &x.life_support_type as &dyn CatalogEntry));
    entries.extend(d.accommodations.iter().map(|x| &x.accommodation_type as &dyn CatalogEntry));
    entries.extend(d.evacuation.iter().map(|x| &x.evacuation_type as &dyn CatalogEntry));
    entries.extend(d.gravity.iter().map(|x| &x.gravity_type as &dyn CatalogEntry));
    entries.extend(d.weapons.iter().map(|x| &x.weapon_type as &dyn CatalogEntry));
    for launcher in &d.launch_systems {
        entries.push(&launcher.launch_type);
        entries.extend(launcher.loadout.iter().map(|l| &l.ordnance_type as &dyn CatalogEntry));
    }
    entries.extend(d.defenses.iter().map(|x| &x.defense_type as &dyn CatalogEntry));
    entries.extend(d.command_control.iter().map(|x| &x.control_type as &dyn CatalogEntry));
    entries.extend(d.sensors.iter().map(|x| &x.sensor_type as &dyn CatalogEntry));
    entries.extend(d.hangar_misc.iter().map(|x| &x.hangar_type as &dyn CatalogEntry));

    let mut seen = HashSet::new();
    let names: Vec<&str> = entries
        .into_iter()
        .filter(|e| !is_available(*e, ceiling, tracks))
        .map(|e| e.name())
        .filter(|name| seen.insert(*name))
        .collect();
    if names.is_empty() {
        return None;
    }
    Some(Issue::warning(format!(
        "Not available at PL {ceiling} with the allowed tech: {}",
        names.join(", ")
    )))
}

fn multiple_screens(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let screens = &s.stats.defenses.screen_types;
    (screens.len() > 1).then(|| {
        Issue::warning(format!(
            "Screens do not stack; {} screen types installed ({})",
            screens.len(),
            screens.join(", ")
        ))
    })
}

fn illegal_for_class(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let ids: Vec<InstalledId> = s
        .stats
        .armor
        .illegal_for_class
        .iter()
        .chain(&s.stats.hangar.illegal_for_class)
        .cloned()
        .collect();
    warn_if_any(
        &ids,
        &format!("Not allowed on a {} hull", s.design.hull.ship_class),
    )
}

fn undersized_systems(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let ids: Vec<InstalledId> = s
        .stats
        .power
        .undersized
        .iter()
        .chain(&s.stats.engines.undersized)
        .chain(&s.stats.ftl.undersized)
        .cloned()
        .collect();
    warn_if_any(&ids, "Allocated below their minimum size")
}

fn orphaned_fuel_tank_rule(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let d = s.design;
    let plant_ids: Vec<&str> = d
        .power_plants
        .iter()
        .map(|x| x.plant_type.profile.id.as_str())
        .collect();
    let engine_ids: Vec<&str> = d
        .engines
        .iter()
        .map(|x| x.engine_type.profile.id.as_str())
        .collect();
    let ftl_ids: Vec<&str> = d
        .ftl_drives
        .iter()
        .map(|x| x.drive_type.profile.id.as_str())
        .collect();

    let ids: Vec<InstalledId> =
        orphaned_fuel_tanks(&d.fuel_tanks, FuelConsumer::PowerPlant, &plant_ids)
            .into_iter()
            .chain(orphaned_fuel_tanks(&d.fuel_tanks, FuelConsumer::Engine, &engine_ids))
            .chain(orphaned_fuel_tanks(&d.fuel_tanks, FuelConsumer::Ftl, &ftl_ids))
            .map(|t| t.id.clone())
            .collect();
    warn_if_any(&ids, "Fuel tanks for systems that are not installed")
}

fn zone_diagram_incomplete(s: &DesignSnapshot<'_>) -> Option<Issue> {
    let diagram = &s.diagram;
    if diagram.complete {
        return None;
    }
    Some(Issue::warning(format!(
        "Damage zones incomplete: {} unassigned systems, {} empty zones, {} zones over capacity",
        diagram.unassigned.len(),
        diagram.empty_zones.len(),
        diagram.over_capacity_zones.len()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::armor::InstalledArmor;
    use crate::catalog::{
        ArmorType, ArmorWeight, Catalog, CommandControlType, ControlKind, CostModel, DamageTrack,
        DefenseKind, DefenseSystemType, EngineType, Firepower, GunConfiguration, Hull, MountType,
        PowerModel, PowerPlantType, Protection, ShipClass, SizingStrategy, SystemProfile,
        WeaponType,
    };
    use crate::command::{ControlLink, InstalledCommandControl};
    use crate::defenses::InstalledDefenseSystem;
    use crate::design::DesignType;
    use crate::engines::InstalledEngine;
    use crate::ids::BatteryKey;
    use crate::power::InstalledPowerPlant;
    use crate::weapons::InstalledWeapon;
    use crate::zones::FiringArc;

    fn light_hull() -> Hull {
        Hull {
            id: "scout".into(),
            name: "Scout".into(),
            ship_class: ShipClass::Light,
            hull_points: 20,
            bonus_hull_points: 0,
            toughness: "Good".into(),
            damage_track: DamageTrack::default(),
            crew: 0,
            cost: 50_000,
            progress_level: 6,
            tech_tracks: Vec::new(),
            description: String::new(),
        }
    }

    fn allocated(id: &str, per_hp: u64) -> SystemProfile {
        SystemProfile::fixed(id, id, 0, 0, 0)
            .with_sizing(SizingStrategy::Allocated { min_hull_points: 1 })
            .with_cost(CostModel::PerSystemHullPoint {
                base: 0,
                per_hull_point: per_hp,
            })
    }

    fn plant() -> PowerPlantType {
        PowerPlantType {
            profile: allocated("fusion", 10_000),
            power_generated_per_hull_point: 2.0,
            fuel: None,
        }
    }

    fn engine() -> EngineType {
        EngineType {
            profile: allocated("ion", 5_000).with_power(PowerModel::PerSystemHullPoint(1.0)),
            acceleration_table: Vec::new(),
            fuel: None,
        }
    }

    fn laser() -> WeaponType {
        WeaponType {
            profile: SystemProfile::fixed("laser", "Laser", 2, 1, 1_000),
            firepower: Firepower::Light,
            damage: String::new(),
            range: String::new(),
            accuracy: 0,
            allowed_mounts: Vec::new(),
        }
    }

    fn fire_control() -> CommandControlType {
        CommandControlType {
            profile: SystemProfile::fixed("fc", "Fire Control", 1, 0, 1_000),
            kind: ControlKind::FireControl,
            linked_cost_per_hull_point: 100,
            control_bonus: 0,
        }
    }

    fn minimal_ship() -> ShipDesign {
        ShipDesign::new("Minimal", &light_hull(), DesignType::Warship, &Catalog::empty())
            .with_power_plants(vec![InstalledPowerPlant::new("pp-1".into(), &plant(), 4)])
            .with_engines(vec![InstalledEngine::new("eng-1".into(), &engine(), 6)])
    }

    fn rules_fired(issues: &[Issue]) -> Vec<&'static str> {
        issues.iter().map(|i| i.rule).collect()
    }

    #[test]
    fn minimal_light_ship_is_a_warning() {
        let design = minimal_ship();
        let issues = validate(&design);
        assert_eq!(classify(&issues), DesignState::Warning);
        assert!(calculate_design_stats(&design).remaining_hull_points >= 0);
        let optional: Vec<&Issue> = issues
            .iter()
            .filter(|i| i.rule == "optional-steps-incomplete")
            .collect();
        assert_eq!(optional.len(), 1);
        assert!(optional[0].message.contains("- no armor"));
        assert!(optional[0].message.contains("- no FTL drive"));
    }

    #[test]
    fn overcommitted_hull_is_an_error_that_reports_the_excess() {
        let armor = ArmorType {
            profile: allocated("plate", 1_000).with_sizing(SizingStrategy::FixedPerUnit {
                hull_points: 15,
            }),
            weight: ArmorWeight::Light,
            protection: Protection::default(),
        };
        let design = minimal_ship().with_armor(vec![InstalledArmor::new("armor-1".into(), &armor)]);
        let issues = validate(&design);
        assert_eq!(calculate_design_stats(&design).remaining_hull_points, -5);
        assert_eq!(classify(&issues), DesignState::Error);
        let exceeded = issues
            .iter()
            .find(|i| i.rule == "hull-points-exceeded")
            .unwrap();
        assert_eq!(exceeded.message, "Hull points exceeded by 5");
        // Warnings are still reported alongside the error.
        assert!(issues.iter().any(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn mandatory_set_depends_on_design_type() {
        let bare = ShipDesign::new("Bare", &light_hull(), DesignType::Warship, &Catalog::empty())
            .with_power_plants(vec![InstalledPowerPlant::new("pp-1".into(), &plant(), 4)]);
        let issues = validate(&bare);
        let missing = issues.iter().find(|i| i.rule == "mandatory-missing").unwrap();
        assert_eq!(missing.message, "Warship requires: engines");

        let station = bare.with_design_type(DesignType::SpaceStation);
        assert!(!rules_fired(&validate(&station)).contains(&"mandatory-missing"));

        let base = minimal_ship().with_design_type(DesignType::GroundBase);
        let issues = validate(&base);
        let not_applicable = issues.iter().find(|i| i.rule == "not-applicable-systems").unwrap();
        assert_eq!(not_applicable.message, "Ground base cannot use: engines");
    }

    #[test]
    fn orphaned_fire_control_is_one_warning_and_no_battery_warning() {
        let design = minimal_ship()
            .with_weapons(vec![InstalledWeapon::new(
                "w-1".into(),
                &laser(),
                MountType::Standard,
                GunConfiguration::Single,
                1,
                &[FiringArc::Forward],
            )])
            .with_command_control(vec![InstalledCommandControl::new(
                "fc-1".into(),
                &fire_control(),
                1,
            )
            .linked_to(ControlLink::Battery(BatteryKey::new("laser:standard")))]);
        let fired = rules_fired(&validate(&design));
        assert!(!fired.contains(&"orphaned-fire-control"));
        assert!(!fired.contains(&"battery-without-fire-control"));

        let design = design.with_weapons(Vec::new());
        let issues = validate(&design);
        let fired = rules_fired(&issues);
        assert_eq!(fired.iter().filter(|r| **r == "orphaned-fire-control").count(), 1);
        assert!(!fired.contains(&"battery-without-fire-control"));
    }

    #[test]
    fn uncontrolled_battery_is_reported() {
        let design = minimal_ship().with_weapons(vec![InstalledWeapon::new(
            "w-1".into(),
            &laser(),
            MountType::Standard,
            GunConfiguration::Single,
            1,
            &[FiringArc::Forward],
        )]);
        let issues = validate(&design);
        let battery = issues
            .iter()
            .find(|i| i.rule == "battery-without-fire-control")
            .unwrap();
        assert!(battery.message.contains("Laser"));
    }

    #[test]
    fn power_deficit_ignores_nothing_but_ftl() {
        let design =
            ShipDesign::new("Hungry", &light_hull(), DesignType::Warship, &Catalog::empty())
                .with_power_plants(vec![InstalledPowerPlant::new("pp-1".into(), &plant(), 1)])
                .with_engines(vec![InstalledEngine::new("eng-1".into(), &engine(), 6)]);
        let issues = validate(&design);
        let deficit = issues.iter().find(|i| i.rule == "power-deficit").unwrap();
        assert_eq!(deficit.severity, Severity::Warning);
        assert!(deficit.message.starts_with("Power deficit of 4"));
    }

    #[test]
    fn two_screen_types_do_not_stack() {
        let screen = |id: &str| DefenseSystemType {
            profile: SystemProfile::fixed(id, id, 1, 0, 1_000),
            kind: DefenseKind::Screen,
            effect: String::new(),
        };
        let design = minimal_ship().with_defenses(vec![
            InstalledDefenseSystem::new("def-1".into(), &screen("deflector"), 1),
            InstalledDefenseSystem::new("def-2".into(), &screen("reflective"), 1),
        ]);
        assert!(rules_fired(&validate(&design)).contains(&"multiple-screens"));
    }

    #[test]
    fn components_above_the_progress_level_are_flagged() {
        let advanced = WeaponType {
            profile: SystemProfile::fixed("graser", "Graser", 2, 1, 1_000)
                .with_gate(9, &["gravity"]),
            ..laser()
        };
        let design = minimal_ship().with_weapons(vec![InstalledWeapon::new(
            "w-1".into(),
            &advanced,
            MountType::Standard,
            GunConfiguration::Single,
            1,
            &[FiringArc::Forward],
        )]);
        let issues = validate(&design);
        let above = issues.iter().find(|i| i.rule == "above-constraints").unwrap();
        assert!(above.message.ends_with("Graser"));
    }

    #[test]
    fn unavailable_names_are_listed_once_in_first_seen_order() {
        let gated = |id: &str, name: &str| WeaponType {
            profile: SystemProfile::fixed(id, name, 2, 1, 1_000).with_gate(9, &["gravity"]),
            ..laser()
        };
        let (graser, lance) = (gated("graser", "Graser"), gated("lance", "Lance"));
        let mount = |id: &str, weapon_type: &WeaponType| {
            InstalledWeapon::new(
                id.into(),
                weapon_type,
                MountType::Standard,
                GunConfiguration::Single,
                1,
                &[FiringArc::Forward],
            )
        };
        let design = minimal_ship().with_weapons(vec![
            mount("w-1", &graser),
            mount("w-2", &lance),
            mount("w-3", &graser),
        ]);
        let issues = validate(&design);
        let above = issues.iter().find(|i| i.rule == "above-constraints").unwrap();
        assert!(
            above.message.ends_with(": Graser, Lance"),
            "unexpected message: {}",
            above.message
        );
    }

    #[test]
    fn classify_orders_error_over_warning() {
        let warning = Issue {
            rule: "a",
            severity: Severity::Warning,
            message: String::new(),
        };
        let error = Issue {
            severity: Severity::Error,
            ..warning.clone()
        };
        assert_eq!(classify(&[]), DesignState::Valid);
        assert_eq!(classify(&[warning.clone()]), DesignState::Warning);
        assert_eq!(classify(&[warning, error]), DesignState::Error);
    }

    #[test]
    fn rules_are_named_uniquely() {
        let rules = default_rules();
        let mut names: Vec<&str> = rules.iter().map(|r| r.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }
}
