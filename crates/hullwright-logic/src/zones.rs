//! Damage zones: hull regions with a hull-point capacity that localize damage.
//!
//! The zone layout is a pure function of ship class and hull points. Systems
//! are placed in zones under two rules:
//!
//! - capacity: a zone's assigned hull points should not exceed its limit
//!   (exceeding it is reported, never refused);
//! - arcs: a directional system (weapon, launcher) may only sit in a zone
//!   that one of its firing arcs faces.
//!
//! Every operation returns new zone values; inputs are never mutated.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ShipClass;
use crate::error::{Error, Result};
use crate::ids::InstalledId;

/// Zone capacity used when a hull has no layout entry.
pub const DEFAULT_ZONE_LIMIT: u32 = 50;

// ============================================================================
// FACINGS, ARCS, ZONE CODES
// ============================================================================

/// Compass facing of the hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facing {
    Forward,
    Starboard,
    Aft,
    Port,
}

impl Facing {
    pub fn opposite(&self) -> Facing {
        match self {
            Self::Forward => Self::Aft,
            Self::Aft => Self::Forward,
            Self::Port => Self::Starboard,
            Self::Starboard => Self::Port,
        }
    }
}

/// Direction a weapon or sensor can engage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FiringArc {
    Forward,
    Starboard,
    Aft,
    Port,
    ZeroForward,
    ZeroStarboard,
    ZeroAft,
    ZeroPort,
}

impl FiringArc {
    /// Facing of the arc. Zero-range arcs face the same way as their
    /// standard counterparts.
    pub fn facing(&self) -> Facing {
        match self {
            Self::Forward | Self::ZeroForward => Facing::Forward,
            Self::Starboard | Self::ZeroStarboard => Facing::Starboard,
            Self::Aft | Self::ZeroAft => Facing::Aft,
            Self::Port | Self::ZeroPort => Facing::Port,
        }
    }

    pub fn is_zero_range(&self) -> bool {
        matches!(
            self,
            Self::ZeroForward | Self::ZeroStarboard | Self::ZeroAft | Self::ZeroPort
        )
    }
}

/// Named hull region. The code letters give its position: F forward, A aft,
/// P port, S starboard, C center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZoneCode {
    #[serde(rename = "F")]
    Forward,
    #[serde(rename = "FC")]
    ForwardCenter,
    #[serde(rename = "FP")]
    ForwardPort,
    #[serde(rename = "FS")]
    ForwardStarboard,
    #[serde(rename = "P")]
    Port,
    #[serde(rename = "C")]
    Center,
    #[serde(rename = "S")]
    Starboard,
    #[serde(rename = "AP")]
    AftPort,
    #[serde(rename = "AS")]
    AftStarboard,
    #[serde(rename = "AC")]
    AftCenter,
    #[serde(rename = "A")]
    Aft,
}

impl ZoneCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Forward => "F",
            Self::ForwardCenter => "FC",
            Self::ForwardPort => "FP",
            Self::ForwardStarboard => "FS",
            Self::Port => "P",
            Self::Center => "C",
            Self::Starboard => "S",
            Self::AftPort => "AP",
            Self::AftStarboard => "AS",
            Self::AftCenter => "AC",
            Self::Aft => "A",
        }
    }

    /// Hull facings the zone touches. The center zone sits amidships and
    /// is reached by broadside arcs.
    pub fn facings(&self) -> &'static [Facing] {
        match self {
            Self::Forward | Self::ForwardCenter => &[Facing::Forward],
            Self::ForwardPort => &[Facing::Forward, Facing::Port],
            Self::ForwardStarboard => &[Facing::Forward, Facing::Starboard],
            Self::Port => &[Facing::Port],
            Self::Center => &[Facing::Port, Facing::Starboard],
            Self::Starboard => &[Facing::Starboard],
            Self::AftPort => &[Facing::Aft, Facing::Port],
            Self::AftStarboard => &[Facing::Aft, Facing::Starboard],
            Self::AftCenter | Self::Aft => &[Facing::Aft],
        }
    }
}

impl fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether a system with these arcs may sit in `zone`: true if any arc
/// faces one of the zone's facings. No arcs means never placeable.
pub fn can_system_be_in_zone(arcs: &[FiringArc], zone: ZoneCode) -> bool {
    arcs.iter()
        .any(|arc| zone.facings().contains(&arc.facing()))
}

// ============================================================================
// LAYOUTS
// ============================================================================

/// Zones, per-zone capacity and hit die for one hull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneLayout {
    pub zones: Vec<ZoneCode>,
    pub zone_limit: u32,
    pub hit_die: u8,
}

struct LayoutBracket {
    ship_class: ShipClass,
    max_hull_points: u32,
    zones: &'static [ZoneCode],
    zone_limit: u32,
    hit_die: u8,
}

use ZoneCode::*;

const TWO_ZONES: &[ZoneCode] = &[Forward, Aft];
const THREE_ZONES: &[ZoneCode] = &[Forward, Center, Aft];
const FOUR_ZONES: &[ZoneCode] = &[Forward, Port, Starboard, Aft];
const SIX_ZONES: &[ZoneCode] = &[
    Forward,
    ForwardPort,
    ForwardStarboard,
    AftPort,
    AftStarboard,
    Aft,
];
const EIGHT_ZONES: &[ZoneCode] = &[
    Forward,
    ForwardPort,
    ForwardStarboard,
    Port,
    Starboard,
    AftPort,
    AftStarboard,
    Aft,
];
const TEN_ZONES: &[ZoneCode] = &[
    Forward,
    ForwardCenter,
    ForwardPort,
    ForwardStarboard,
    Port,
    Starboard,
    AftPort,
    AftStarboard,
    AftCenter,
    Aft,
];

const LAYOUTS: &[LayoutBracket] = &[
    LayoutBracket {
        ship_class: ShipClass::SmallCraft,
        max_hull_points: 10,
        zones: TWO_ZONES,
        zone_limit: 6,
        hit_die: 6,
    },
    LayoutBracket {
        ship_class: ShipClass::SmallCraft,
        max_hull_points: 40,
        zones: THREE_ZONES,
        zone_limit: 15,
        hit_die: 6,
    },
    LayoutBracket {
        ship_class: ShipClass::Light,
        max_hull_points: 60,
        zones: THREE_ZONES,
        zone_limit: 22,
        hit_die: 6,
    },
    LayoutBracket {
        ship_class: ShipClass::Light,
        max_hull_points: 160,
        zones: FOUR_ZONES,
        zone_limit: 45,
        hit_die: 8,
    },
    LayoutBracket {
        ship_class: ShipClass::Medium,
        max_hull_points: 300,
        zones: SIX_ZONES,
        zone_limit: 55,
        hit_die: 10,
    },
    LayoutBracket {
        ship_class: ShipClass::Medium,
        max_hull_points: 600,
        zones: EIGHT_ZONES,
        zone_limit: 80,
        hit_die: 12,
    },
    LayoutBracket {
        ship_class: ShipClass::Heavy,
        max_hull_points: 1200,
        zones: EIGHT_ZONES,
        zone_limit: 160,
        hit_die: 12,
    },
    LayoutBracket {
        ship_class: ShipClass::Heavy,
        max_hull_points: 4000,
        zones: TEN_ZONES,
        zone_limit: 420,
        hit_die: 20,
    },
    LayoutBracket {
        ship_class: ShipClass::SuperHeavy,
        max_hull_points: 8000,
        zones: TEN_ZONES,
        zone_limit: 840,
        hit_die: 20,
    },
    LayoutBracket {
        ship_class: ShipClass::SuperHeavy,
        max_hull_points: 20_000,
        zones: TEN_ZONES,
        zone_limit: 2100,
        hit_die: 20,
    },
];

/// Layout for a hull, if the table has one.
pub fn find_zone_layout(ship_class: ShipClass, hull_points: u32) -> Option<ZoneLayout> {
    LAYOUTS
        .iter()
        .find(|b| b.ship_class == ship_class && hull_points <= b.max_hull_points)
        .map(|b| ZoneLayout {
            zones: b.zones.to_vec(),
            zone_limit: b.zone_limit,
            hit_die: b.hit_die,
        })
}

/// Layout for a hull. A hull outside the table is a data-authoring defect:
/// debug builds assert, release builds fall back to the class's largest
/// layout with [`DEFAULT_ZONE_LIMIT`] (or enough capacity to hold the hull).
pub fn zone_layout(ship_class: ShipClass, hull_points: u32) -> ZoneLayout {
    if let Some(layout) = find_zone_layout(ship_class, hull_points) {
        return layout;
    }
    debug_assert!(
        false,
        "no zone layout for {ship_class} hull with {hull_points} hull points"
    );
    log::error!(
        "No zone layout for {} hull with {} HP; using default zone limit",
        ship_class,
        hull_points
    );
    let zones = LAYOUTS
        .iter()
        .rev()
        .find(|b| b.ship_class == ship_class)
        .map_or(THREE_ZONES, |b| b.zones);
    let spread = crate::sizing::ceil_div(hull_points as u64, zones.len() as u64) as u32;
    ZoneLayout {
        zones: zones.to_vec(),
        zone_limit: DEFAULT_ZONE_LIMIT.max(spread),
        hit_die: if zones.len() > 8 { 20 } else { 12 },
    }
}

// ============================================================================
// ZONE SYSTEMS
// ============================================================================

/// Kind of system placed in a zone. Declaration order is the placement
/// priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneSystemCategory {
    Weapon,
    Launcher,
    Defense,
    Sensor,
    Communication,
    CommandControl,
    HangarMisc,
    Support,
    Ftl,
    Engine,
    FuelTank,
    PowerPlant,
}

impl ZoneSystemCategory {
    /// Weapons and launchers are bound to zones by their firing arcs.
    pub fn is_directional(&self) -> bool {
        matches!(self, Self::Weapon | Self::Launcher)
    }
}

/// Lightweight pointer from a zone to an installed system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSystemRef {
    pub id: String,
    pub category: ZoneSystemCategory,
    pub name: String,
    pub hull_points: u32,
    pub installed_id: InstalledId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firepower_rank: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arcs: Vec<FiringArc>,
}

impl ZoneSystemRef {
    pub fn new(
        category: ZoneSystemCategory,
        installed_id: &InstalledId,
        name: &str,
        hull_points: u32,
    ) -> Self {
        Self {
            id: format!("zone-{installed_id}"),
            category,
            name: name.to_string(),
            hull_points,
            installed_id: installed_id.clone(),
            firepower_rank: None,
            arcs: Vec::new(),
        }
    }

    pub fn with_firepower(mut self, rank: u8, arcs: &[FiringArc]) -> Self {
        self.firepower_rank = Some(rank);
        self.arcs = arcs.to_vec();
        self
    }

    /// Whether this system may sit in `zone`. Non-directional systems fit anywhere.
    pub fn can_occupy(&self, zone: ZoneCode) -> bool {
        !self.category.is_directional() || can_system_be_in_zone(&self.arcs, zone)
    }
}

/// Placement ordering: category order, then weapons lightest first, other
/// systems largest first, then name and id for a total order.
pub fn compare_zone_systems(a: &ZoneSystemRef, b: &ZoneSystemRef) -> Ordering {
    a.category
        .cmp(&b.category)
        .then_with(|| {
            if a.category.is_directional() {
                a.firepower_rank
                    .unwrap_or(u8::MAX)
                    .cmp(&b.firepower_rank.unwrap_or(u8::MAX))
            } else {
                b.hull_points.cmp(&a.hull_points)
            }
        })
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.installed_id.cmp(&b.installed_id))
}

/// Copy of `systems` in placement order.
pub fn sort_zone_systems(systems: &[ZoneSystemRef]) -> Vec<ZoneSystemRef> {
    let mut sorted = systems.to_vec();
    sorted.sort_by(compare_zone_systems);
    sorted
}

// ============================================================================
// DAMAGE ZONES
// ============================================================================

/// One hull zone and the systems assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageZone {
    pub code: ZoneCode,
    pub max_hull_points: u32,
    pub systems: Vec<ZoneSystemRef>,
    /// Always the sum of `systems[..].hull_points`.
    pub total_hull_points: u32,
}

impl DamageZone {
    pub fn new(code: ZoneCode, max_hull_points: u32) -> Self {
        Self {
            code,
            max_hull_points,
            systems: Vec::new(),
            total_hull_points: 0,
        }
    }

    /// Same zone holding `systems`, sorted, with the total recomputed.
    pub fn with_systems(&self, systems: Vec<ZoneSystemRef>) -> Self {
        let mut systems = systems;
        systems.sort_by(compare_zone_systems);
        let total_hull_points = systems.iter().map(|s| s.hull_points).sum();
        Self {
            code: self.code,
            max_hull_points: self.max_hull_points,
            systems,
            total_hull_points,
        }
    }

    pub fn remaining_hull_points(&self) -> i64 {
        self.max_hull_points as i64 - self.total_hull_points as i64
    }

    pub fn contains(&self, installed_id: &InstalledId) -> bool {
        self.systems.iter().any(|s| &s.installed_id == installed_id)
    }

    pub fn status(&self) -> ZoneStatus {
        zone_status(self)
    }
}

/// Health of a single zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneStatus {
    Ok,
    /// No systems assigned: flagged.
    Empty,
    /// Assigned hull points exceed capacity: invalid but not fatal.
    OverCapacity,
}

pub fn zone_status(zone: &DamageZone) -> ZoneStatus {
    if zone.total_hull_points > zone.max_hull_points {
        ZoneStatus::OverCapacity
    } else if zone.systems.is_empty() {
        ZoneStatus::Empty
    } else {
        ZoneStatus::Ok
    }
}

/// Fresh, empty zones for a layout.
pub fn create_zones(layout: &ZoneLayout) -> Vec<DamageZone> {
    layout
        .zones
        .iter()
        .map(|code| DamageZone::new(*code, layout.zone_limit))
        .collect()
}

/// Result of moving assignments onto a new layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRebuild {
    pub zones: Vec<DamageZone>,
    /// Systems whose zone no longer exists; they are unassigned now.
    pub dropped: Vec<ZoneSystemRef>,
}

/// Re-derive zones for a new layout, keeping assignments whose zone code
/// survives and dropping the rest.
pub fn rebuild_zones(old: &[DamageZone], layout: &ZoneLayout) -> ZoneRebuild {
    let zones: Vec<DamageZone> = create_zones(layout)
        .into_iter()
        .map(|zone| match old.iter().find(|o| o.code == zone.code) {
            Some(previous) => zone.with_systems(previous.systems.clone()),
            None => zone,
        })
        .collect();
    let dropped: Vec<ZoneSystemRef> = old
        .iter()
        .filter(|o| !layout.zones.contains(&o.code))
        .flat_map(|o| o.systems.iter().cloned())
        .collect();
    if !dropped.is_empty() {
        log::info!(
            "Zone layout changed: {} systems lost their zone and are unassigned",
            dropped.len()
        );
    }
    ZoneRebuild { zones, dropped }
}

fn without_system(zones: &[DamageZone], installed_id: &InstalledId) -> Vec<DamageZone> {
    zones
        .iter()
        .map(|zone| {
            if zone.contains(installed_id) {
                zone.with_systems(
                    zone.systems
                        .iter()
                        .filter(|s| &s.installed_id != installed_id)
                        .cloned()
                        .collect(),
                )
            } else {
                zone.clone()
            }
        })
        .collect()
}

/// Place `system` in the zone `code`, moving it out of any zone it was in.
pub fn assign_system(
    zones: &[DamageZone],
    code: ZoneCode,
    system: &ZoneSystemRef,
) -> Result<Vec<DamageZone>> {
    if !zones.iter().any(|z| z.code == code) {
        return Err(Error::UnknownZone { code });
    }
    if !system.can_occupy(code) {
        return Err(Error::ArcIncompatible {
            name: system.name.clone(),
            code,
        });
    }
    let zones = without_system(zones, &system.installed_id);
    Ok(zones
        .iter()
        .map(|zone| {
            if zone.code == code {
                let mut systems = zone.systems.clone();
                systems.push(system.clone());
                zone.with_systems(systems)
            } else {
                zone.clone()
            }
        })
        .collect())
}

/// Take an installed system out of whichever zone holds it.
pub fn unassign_system(
    zones: &[DamageZone],
    installed_id: &InstalledId,
) -> Result<Vec<DamageZone>> {
    if !zones.iter().any(|z| z.contains(installed_id)) {
        return Err(Error::ZoneSystemNotFound {
            installed_id: installed_id.to_string(),
        });
    }
    Ok(without_system(zones, installed_id))
}

/// Result of reconciling zone references with the current systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSync {
    pub zones: Vec<DamageZone>,
    /// References whose installed system no longer exists.
    pub orphaned: Vec<ZoneSystemRef>,
    /// References whose system changed arcs and no longer fits its zone.
    pub displaced: Vec<ZoneSystemRef>,
}

/// Refresh every zone reference from `current` (hull points, names, arcs)
/// and drop references to systems that are gone or no longer fit.
pub fn sync_zone_systems(zones: &[DamageZone], current: &[ZoneSystemRef]) -> ZoneSync {
    let mut orphaned = Vec::new();
    let mut displaced = Vec::new();
    let zones = zones
        .iter()
        .map(|zone| {
            let mut kept = Vec::new();
            for assigned in &zone.systems {
                match current
                    .iter()
                    .find(|c| c.installed_id == assigned.installed_id)
                {
                    None => orphaned.push(assigned.clone()),
                    Some(fresh) if !fresh.can_occupy(zone.code) => displaced.push(fresh.clone()),
                    Some(fresh) => kept.push(fresh.clone()),
                }
            }
            zone.with_systems(kept)
        })
        .collect();
    if !orphaned.is_empty() {
        log::warn!(
            "Dropped {} zone references to removed systems",
            orphaned.len()
        );
    }
    ZoneSync {
        zones,
        orphaned,
        displaced,
    }
}

/// Systems in `all` not assigned to any zone, in placement order.
pub fn unassigned_systems(zones: &[DamageZone], all: &[ZoneSystemRef]) -> Vec<ZoneSystemRef> {
    let unassigned: Vec<ZoneSystemRef> = all
        .iter()
        .filter(|s| !zones.iter().any(|z| z.contains(&s.installed_id)))
        .cloned()
        .collect();
    sort_zone_systems(&unassigned)
}

/// Index with the most remaining room; ties keep the earlier zone.
fn roomiest(zones: &[DamageZone], indices: impl Iterator<Item = usize>) -> Option<usize> {
    indices.fold(None, |best, i| match best {
        Some(b) if zones[b].remaining_hull_points() >= zones[i].remaining_hull_points() => Some(b),
        _ => Some(i),
    })
}

/// Assign every unassigned system in placement order. Each goes to the
/// compatible zone with the most room that still fits it; if none fits,
/// to the compatible zone with the most room. Systems with no compatible
/// zone stay unassigned.
pub fn auto_assign(zones: &[DamageZone], all: &[ZoneSystemRef]) -> Vec<DamageZone> {
    let mut zones = zones.to_vec();
    for system in unassigned_systems(&zones, all) {
        let candidates: Vec<usize> = zones
            .iter()
            .enumerate()
            .filter(|(_, z)| system.can_occupy(z.code))
            .map(|(i, _)| i)
            .collect();
        let fitting = roomiest(
            &zones,
            candidates
                .iter()
                .copied()
                .filter(|i| zones[*i].remaining_hull_points() >= system.hull_points as i64),
        );
        let target = fitting.or_else(|| roomiest(&zones, candidates.iter().copied()));
        match target {
            Some(i) => {
                let mut systems = zones[i].systems.clone();
                systems.push(system.clone());
                zones[i] = zones[i].with_systems(systems);
            }
            None => log::debug!("{} has no compatible zone", system.name),
        }
    }
    zones
}

/// Diagram-level completeness summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramStatus {
    pub unassigned: Vec<InstalledId>,
    pub empty_zones: Vec<ZoneCode>,
    pub over_capacity_zones: Vec<ZoneCode>,
    pub complete: bool,
}

/// Complete means no unassigned systems, no empty zones and no zone over capacity.
pub fn diagram_status(zones: &[DamageZone], all: &[ZoneSystemRef]) -> DiagramStatus {
    let unassigned: Vec<InstalledId> = unassigned_systems(zones, all)
        .into_iter()
        .map(|s| s.installed_id)
        .collect();
    let empty_zones: Vec<ZoneCode> = zones
        .iter()
        .filter(|z| zone_status(z) == ZoneStatus::Empty)
        .map(|z| z.code)
        .collect();
    let over_capacity_zones: Vec<ZoneCode> = zones
        .iter()
        .filter(|z| zone_status(z) == ZoneStatus::OverCapacity)
        .map(|z| z.code)
        .collect();
    let complete =
        unassigned.is_empty() && empty_zones.is_empty() && over_capacity_zones.is_empty();
    DiagramStatus {
        unassigned,
        empty_zones,
        over_capacity_zones,
        complete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ZONES: [ZoneCode; 11] = [
        Forward,
        ForwardCenter,
        ForwardPort,
        ForwardStarboard,
        Port,
        Center,
        Starboard,
        AftPort,
        AftStarboard,
        AftCenter,
        Aft,
    ];

    fn weapon(id: &str, hp: u32, rank: u8, arcs: &[FiringArc]) -> ZoneSystemRef {
        ZoneSystemRef::new(ZoneSystemCategory::Weapon, &InstalledId::new(id), id, hp)
            .with_firepower(rank, arcs)
    }

    fn system(id: &str, category: ZoneSystemCategory, hp: u32) -> ZoneSystemRef {
        ZoneSystemRef::new(category, &InstalledId::new(id), id, hp)
    }

    fn check_totals(zones: &[DamageZone]) {
        for z in zones {
            let sum: u32 = z.systems.iter().map(|s| s.hull_points).sum();
            assert_eq!(z.total_hull_points, sum, "zone {} total drifted", z.code);
        }
    }

    #[test]
    fn forward_arc_reaches_forward_zones_only() {
        for zone in ALL_ZONES {
            let placeable = can_system_be_in_zone(&[FiringArc::Forward], zone);
            if zone.code().starts_with('F') {
                assert!(placeable, "forward arc should reach {zone}");
            }
            if zone.code().starts_with('A') {
                assert!(!placeable, "forward arc should not reach {zone}");
            }
        }
    }

    #[test]
    fn empty_arcs_never_placeable() {
        for zone in ALL_ZONES {
            assert!(!can_system_be_in_zone(&[], zone));
        }
    }

    #[test]
    fn zero_range_arcs_match_standard_arcs() {
        let pairs = [
            (FiringArc::Forward, FiringArc::ZeroForward),
            (FiringArc::Aft, FiringArc::ZeroAft),
            (FiringArc::Port, FiringArc::ZeroPort),
            (FiringArc::Starboard, FiringArc::ZeroStarboard),
        ];
        for (standard, zero) in pairs {
            assert!(zero.is_zero_range());
            for zone in ALL_ZONES {
                assert_eq!(
                    can_system_be_in_zone(&[standard], zone),
                    can_system_be_in_zone(&[zero], zone)
                );
            }
        }
    }

    #[test]
    fn every_class_has_layouts_that_hold_the_hull() {
        for b in LAYOUTS {
            let capacity = b.zone_limit * b.zones.len() as u32;
            assert!(
                capacity >= b.max_hull_points,
                "{} up to {} HP only holds {}",
                b.ship_class,
                b.max_hull_points,
                capacity
            );
        }
        for class in ShipClass::all() {
            assert!(LAYOUTS.iter().any(|b| b.ship_class == *class));
        }
    }

    #[test]
    fn layout_lookup_by_bracket() {
        let small = find_zone_layout(ShipClass::Light, 20).unwrap();
        assert_eq!(small.zones, vec![Forward, Center, Aft]);
        assert_eq!(small.hit_die, 6);
        let bigger = find_zone_layout(ShipClass::Light, 100).unwrap();
        assert_eq!(bigger.zones.len(), 4);
        assert!(find_zone_layout(ShipClass::SmallCraft, 500).is_none());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no zone layout")]
    fn missing_layout_asserts_in_debug() {
        zone_layout(ShipClass::SmallCraft, 500);
    }

    #[test]
    fn over_capacity_is_reported_not_refused() {
        let layout = find_zone_layout(ShipClass::Light, 20).unwrap();
        let zones = create_zones(&layout);
        let big = system("reactor", ZoneSystemCategory::PowerPlant, 30);
        let zones = assign_system(&zones, Center, &big).unwrap();
        let center = zones.iter().find(|z| z.code == Center).unwrap();
        assert_eq!(center.status(), ZoneStatus::OverCapacity);
        assert_eq!(center.remaining_hull_points(), 22 - 30);
        check_totals(&zones);
    }

    #[test]
    fn assign_checks_arcs_and_zone_existence() {
        let zones = create_zones(&find_zone_layout(ShipClass::Light, 20).unwrap());
        let gun = weapon("gun", 2, 2, &[FiringArc::Forward]);
        assert!(matches!(
            assign_system(&zones, Aft, &gun),
            Err(Error::ArcIncompatible { .. })
        ));
        assert!(matches!(
            assign_system(&zones, Port, &gun),
            Err(Error::UnknownZone { code: Port })
        ));
        let placed = assign_system(&zones, Forward, &gun).unwrap();
        assert_eq!(placed[0].total_hull_points, 2);
        // Inputs untouched.
        assert!(zones[0].systems.is_empty());
    }

    #[test]
    fn assign_moves_between_zones() {
        let zones = create_zones(&find_zone_layout(ShipClass::Light, 20).unwrap());
        let sensor = system("sensor", ZoneSystemCategory::Sensor, 3);
        let zones = assign_system(&zones, Forward, &sensor).unwrap();
        let zones = assign_system(&zones, Aft, &sensor).unwrap();
        assert!(!zones[0].contains(&sensor.installed_id));
        assert!(zones[2].contains(&sensor.installed_id));
        check_totals(&zones);
    }

    #[test]
    fn unassign_unknown_is_an_error() {
        let zones = create_zones(&find_zone_layout(ShipClass::Light, 20).unwrap());
        assert!(unassign_system(&zones, &InstalledId::new("nope")).is_err());
    }

    #[test]
    fn rebuild_keeps_surviving_codes() {
        let three = find_zone_layout(ShipClass::Light, 20).unwrap();
        let four = find_zone_layout(ShipClass::Light, 100).unwrap();
        let zones = create_zones(&three);
        let zones = assign_system(&zones, Forward, &system("a", ZoneSystemCategory::Sensor, 2))
            .unwrap();
        let zones =
            assign_system(&zones, Center, &system("b", ZoneSystemCategory::Support, 4)).unwrap();

        let rebuilt = rebuild_zones(&zones, &four);
        assert_eq!(rebuilt.zones.len(), 4);
        assert_eq!(rebuilt.zones[0].total_hull_points, 2);
        assert_eq!(rebuilt.zones[0].max_hull_points, 45);
        assert_eq!(rebuilt.dropped.len(), 1);
        assert_eq!(rebuilt.dropped[0].installed_id, InstalledId::new("b"));
        check_totals(&rebuilt.zones);
    }

    #[test]
    fn placement_order() {
        let heavy = weapon("heavy", 6, 4, &[FiringArc::Forward]);
        let light = weapon("light", 1, 2, &[FiringArc::Forward]);
        let small_sensor = system("s1", ZoneSystemCategory::Sensor, 1);
        let big_sensor = system("s2", ZoneSystemCategory::Sensor, 5);
        let screen = system("screen", ZoneSystemCategory::Defense, 2);
        let sorted = sort_zone_systems(&[
            big_sensor.clone(),
            heavy.clone(),
            small_sensor.clone(),
            screen.clone(),
            light.clone(),
        ]);
        let ids: Vec<&str> = sorted.iter().map(|s| s.installed_id.as_str()).collect();
        assert_eq!(ids, vec!["light", "heavy", "screen", "s2", "s1"]);
    }

    #[test]
    fn sync_drops_orphans_and_refreshes_sizes() {
        let zones = create_zones(&find_zone_layout(ShipClass::Light, 20).unwrap());
        let a = system("a", ZoneSystemCategory::Sensor, 2);
        let b = system("b", ZoneSystemCategory::Support, 4);
        let zones = assign_system(&zones, Forward, &a).unwrap();
        let zones = assign_system(&zones, Forward, &b).unwrap();

        let grown = system("a", ZoneSystemCategory::Sensor, 5);
        let synced = sync_zone_systems(&zones, &[grown]);
        assert_eq!(synced.orphaned.len(), 1);
        assert_eq!(synced.orphaned[0].installed_id, InstalledId::new("b"));
        assert_eq!(synced.zones[0].total_hull_points, 5);
        check_totals(&synced.zones);
    }

    #[test]
    fn sync_displaces_systems_whose_arcs_changed() {
        let zones = create_zones(&find_zone_layout(ShipClass::Light, 20).unwrap());
        let gun = weapon("gun", 2, 2, &[FiringArc::Forward]);
        let zones = assign_system(&zones, Forward, &gun).unwrap();
        let turned = weapon("gun", 2, 2, &[FiringArc::Aft]);
        let synced = sync_zone_systems(&zones, &[turned]);
        assert_eq!(synced.displaced.len(), 1);
        assert!(synced.zones[0].systems.is_empty());
    }

    #[test]
    fn auto_assign_respects_arcs_and_prefers_room() {
        let zones = create_zones(&find_zone_layout(ShipClass::Light, 20).unwrap());
        let all = vec![
            weapon("fwd-gun", 2, 2, &[FiringArc::Forward]),
            weapon("aft-gun", 2, 2, &[FiringArc::Aft]),
            system("reactor", ZoneSystemCategory::PowerPlant, 6),
            system("engine", ZoneSystemCategory::Engine, 8),
            system("bridge", ZoneSystemCategory::CommandControl, 2),
        ];
        let zones = auto_assign(&zones, &all);
        check_totals(&zones);
        assert!(zones[0].contains(&InstalledId::new("fwd-gun")));
        assert!(zones[2].contains(&InstalledId::new("aft-gun")));

        let status = diagram_status(&zones, &all);
        assert!(status.unassigned.is_empty());
        assert!(status.over_capacity_zones.is_empty());
        assert!(status.complete, "{status:?}");
    }

    #[test]
    fn auto_assign_leaves_arcless_weapons_unassigned() {
        let zones = create_zones(&find_zone_layout(ShipClass::Light, 20).unwrap());
        let all = vec![weapon("nowhere", 1, 1, &[])];
        let zones = auto_assign(&zones, &all);
        let status = diagram_status(&zones, &all);
        assert_eq!(status.unassigned, vec![InstalledId::new("nowhere")]);
        assert_eq!(status.empty_zones.len(), 3);
        assert!(!status.complete);
    }

    #[test]
    fn auto_assign_is_deterministic() {
        let zones = create_zones(&find_zone_layout(ShipClass::Medium, 200).unwrap());
        let all: Vec<ZoneSystemRef> = (0..12)
            .map(|i| system(&format!("s{i}"), ZoneSystemCategory::Support, 3 + i % 4))
            .collect();
        assert_eq!(auto_assign(&zones, &all), auto_assign(&zones, &all));
    }
}
