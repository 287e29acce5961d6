//! Saved designs: minimal records in, fully rebuilt designs out.
//!
//! A [`SavedDesign`] keeps ids, type ids, quantities and the few scalar
//! choices a user makes (mount, arcs, links). Everything derived is
//! recomputed on load against the current [`Catalog`]. A record whose type
//! id the catalog no longer has is dropped with a [`LoadWarning`]; only an
//! unknown hull fails the load.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::armor::InstalledArmor;
use crate::catalog::{Catalog, FuelRequirement, GunConfiguration, MountType, SizingStrategy};
use crate::command::{ControlLink, InstalledCommandControl};
use crate::defenses::InstalledDefenseSystem;
use crate::design::{DesignConstraints, DesignType, ShipDesign};
use crate::engines::InstalledEngine;
use crate::error::{Error, Result};
use crate::ftl::InstalledFtlDrive;
use crate::hangar::InstalledHangarMisc;
use crate::hit_location::{generate_chart, validate_chart, HitLocationChart};
use crate::ids::InstalledId;
use crate::ordnance::{InstalledLaunchSystem, LoadedOrdnance};
use crate::power::{FuelConsumer, InstalledFuelTank, InstalledPowerPlant};
use crate::sensors::InstalledSensor;
use crate::sizing::{legacy_coverage_sets, units_for_full_coverage, ShipContext};
use crate::support::{
    InstalledAccommodation, InstalledEvacuation, InstalledGravity, InstalledLifeSupport,
};
use crate::weapons::InstalledWeapon;
use crate::zones::{DamageZone, FiringArc, ZoneCode, ZoneLayout, ZoneSystemRef};

/// Current save format. Version 1 stored countermeasure quantities as raw
/// units instead of full-coverage sets.
pub const FORMAT_VERSION: u32 = 2;

/// Largest quantity, allocation or expansion a saved record may carry.
/// Larger values are clamped on load.
pub const MAX_SAVED_QUANTITY: u32 = 100_000;

fn is_zero(value: &u32) -> bool {
    *value == 0
}

// ============================================================================
// SAVED RECORDS
// ============================================================================

/// One installed component, minimal form. Category-specific fields are
/// omitted when unused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedComponent {
    pub id: InstalledId,
    pub type_id: String,
    /// Unit count, or allocated hull points for allocated systems.
    #[serde(default)]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub extra_hull_points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount: Option<MountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gun_configuration: Option<GunConfiguration>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arcs: Vec<FiringArc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loadout: Vec<SavedOrdnance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<ControlLink>,
}

impl SavedComponent {
    pub fn new(id: &InstalledId, type_id: &str, quantity: u32) -> Self {
        Self {
            id: id.clone(),
            type_id: type_id.to_string(),
            quantity,
            extra_hull_points: 0,
            mount: None,
            gun_configuration: None,
            arcs: Vec::new(),
            loadout: Vec::new(),
            link: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedOrdnance {
    pub type_id: String,
    pub quantity: u32,
}

/// Fuel requirements are taken from the consuming type on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFuelTank {
    pub id: InstalledId,
    pub consumer: FuelConsumer,
    pub consumer_type_id: String,
    pub hull_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedZone {
    pub code: ZoneCode,
    #[serde(default)]
    pub installed_ids: Vec<InstalledId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedDesign {
    pub format_version: u32,
    pub name: String,
    pub design_type: DesignType,
    pub hull_id: String,
    pub constraints: DesignConstraints,
    pub armor: Vec<SavedComponent>,
    pub power_plants: Vec<SavedComponent>,
    pub fuel_tanks: Vec<SavedFuelTank>,
    pub engines: Vec<SavedComponent>,
    pub ftl_drives: Vec<SavedComponent>,
    pub life_support: Vec<SavedComponent>,
    pub accommodations: Vec<SavedComponent>,
    pub evacuation: Vec<SavedComponent>,
    pub gravity: Vec<SavedComponent>,
    pub weapons: Vec<SavedComponent>,
    pub launch_systems: Vec<SavedComponent>,
    pub defenses: Vec<SavedComponent>,
    pub command_control: Vec<SavedComponent>,
    pub sensors: Vec<SavedComponent>,
    pub hangar_misc: Vec<SavedComponent>,
    pub damage_zones: Vec<SavedZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_location_chart: Option<HitLocationChart>,
}

impl Default for SavedDesign {
    /// Missing `formatVersion` reads as the first format.
    fn default() -> Self {
        Self {
            format_version: 1,
            name: String::new(),
            design_type: DesignType::default(),
            hull_id: String::new(),
            constraints: DesignConstraints::default(),
            armor: Vec::new(),
            power_plants: Vec::new(),
            fuel_tanks: Vec::new(),
            engines: Vec::new(),
            ftl_drives: Vec::new(),
            life_support: Vec::new(),
            accommodations: Vec::new(),
            evacuation: Vec::new(),
            gravity: Vec::new(),
            weapons: Vec::new(),
            launch_systems: Vec::new(),
            defenses: Vec::new(),
            command_control: Vec::new(),
            sensors: Vec::new(),
            hangar_misc: Vec::new(),
            damage_zones: Vec::new(),
            hit_location_chart: None,
        }
    }
}

impl SavedDesign {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// LOAD WARNINGS
// ============================================================================

/// Something the load had to drop or repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum LoadWarning {
    /// The record's type id is not in the catalog; the record was dropped.
    UnknownType {
        category: &'static str,
        installed_id: InstalledId,
        type_id: String,
    },
    /// A launcher's loadout named an unknown ordnance type; that load was dropped.
    UnknownOrdnance {
        installed_id: InstalledId,
        type_id: String,
    },
    /// A zone listed a system that was not loaded.
    DroppedZoneReference { zone: ZoneCode, installed_id: InstalledId },
    /// A zone listed a system whose arcs cannot reach it.
    DisplacedZoneReference { zone: ZoneCode, installed_id: InstalledId },
    /// A saved zone is not part of the hull's layout.
    UnknownZone { zone: ZoneCode },
    /// A legacy raw-unit quantity was converted to full-coverage sets.
    MigratedQuantity {
        installed_id: InstalledId,
        from: u32,
        to: u32,
    },
    /// A saved quantity above [`MAX_SAVED_QUANTITY`] was clamped.
    ClampedQuantity {
        installed_id: InstalledId,
        from: u32,
        to: u32,
    },
    /// The saved chart failed validation and was regenerated.
    RegeneratedChart { defects: usize },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType {
                category,
                installed_id,
                type_id,
            } => write!(f, "dropped {category} {installed_id}: unknown type '{type_id}'"),
            Self::UnknownOrdnance {
                installed_id,
                type_id,
            } => write!(f, "dropped '{type_id}' from {installed_id}: unknown ordnance"),
            Self::DroppedZoneReference { zone, installed_id } => {
                write!(f, "zone {zone}: removed reference to missing {installed_id}")
            }
            Self::DisplacedZoneReference { zone, installed_id } => {
                write!(f, "zone {zone}: {installed_id} has no arc facing it and was unassigned")
            }
            Self::UnknownZone { zone } => {
                write!(f, "zone {zone} is not part of this hull; its assignments were dropped")
            }
            Self::MigratedQuantity {
                installed_id,
                from,
                to,
            } => write!(f, "{installed_id}: legacy quantity {from} read as {to} coverage sets"),
            Self::ClampedQuantity {
                installed_id,
                from,
                to,
            } => write!(f, "{installed_id}: quantity {from} clamped to {to}"),
            Self::RegeneratedChart { defects } => {
                write!(f, "hit-location chart had {defects} defects and was regenerated")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDesign {
    pub design: ShipDesign,
    pub warnings: Vec<LoadWarning>,
}

// ============================================================================
// SAVE
// ============================================================================

pub fn save_design(design: &ShipDesign) -> SavedDesign {
    let component = |id: &InstalledId, type_id: &str, quantity: u32| {
        SavedComponent::new(id, type_id, quantity)
    };
    SavedDesign {
        format_version: FORMAT_VERSION,
        name: design.name.clone(),
        design_type: design.design_type,
        hull_id: design.hull.id.clone(),
        constraints: design.constraints.clone(),
        armor: design
            .armor
            .iter()
            .map(|x| component(&x.id, &x.armor_type.profile.id, 1))
            .collect(),
        power_plants: design
            .power_plants
            .iter()
            .map(|x| component(&x.id, &x.plant_type.profile.id, x.hull_points))
            .collect(),
        fuel_tanks: design
            .fuel_tanks
            .iter()
            .map(|x| SavedFuelTank {
                id: x.id.clone(),
                consumer: x.consumer,
                consumer_type_id: x.consumer_type_id.clone(),
                hull_points: x.hull_points,
            })
            .collect(),
        engines: design
            .engines
            .iter()
            .map(|x| component(&x.id, &x.engine_type.profile.id, x.hull_points))
            .collect(),
        ftl_drives: design
            .ftl_drives
            .iter()
            .map(|x| component(&x.id, &x.drive_type.profile.id, x.quantity))
            .collect(),
        life_support: design
            .life_support
            .iter()
            .map(|x| SavedComponent {
                extra_hull_points: x.extra_hull_points,
                ..component(&x.id, &x.life_support_type.profile.id, x.quantity)
            })
            .collect(),
        accommodations: design
            .accommodations
            .iter()
            .map(|x| component(&x.id, &x.accommodation_type.profile.id, x.quantity))
            .collect(),
        evacuation: design
            .evacuation
            .iter()
            .map(|x| SavedComponent {
                extra_hull_points: x.extra_hull_points,
                ..component(&x.id, &x.evacuation_type.profile.id, x.quantity)
            })
            .collect(),
        gravity: design
            .gravity
            .iter()
            .map(|x| component(&x.id, &x.gravity_type.profile.id, 1))
            .collect(),
        weapons: design
            .weapons
            .iter()
            .map(|x| SavedComponent {
                mount: Some(x.mount),
                gun_configuration: Some(x.gun_configuration),
                arcs: x.arcs.clone(),
                ..component(&x.id, &x.weapon_type.profile.id, x.quantity)
            })
            .collect(),
        launch_systems: design
            .launch_systems
            .iter()
            .map(|x| SavedComponent {
                extra_hull_points: x.extra_hull_points,
                arcs: x.arcs.clone(),
                loadout: x
                    .loadout
                    .iter()
                    .map(|l| SavedOrdnance {
                        type_id: l.ordnance_type.id.clone(),
                        quantity: l.quantity,
                    })
                    .collect(),
                ..component(&x.id, &x.launch_type.profile.id, x.quantity)
            })
            .collect(),
        defenses: design
            .defenses
            .iter()
            .map(|x| component(&x.id, &x.defense_type.profile.id, x.quantity))
            .collect(),
        command_control: design
            .command_control
            .iter()
            .map(|x| SavedComponent {
                link: x.link.clone(),
                ..component(&x.id, &x.control_type.profile.id, x.quantity)
            })
            .collect(),
        sensors: design
            .sensors
            .iter()
            .map(|x| SavedComponent {
                arcs: x.arcs.clone(),
                ..component(&x.id, &x.sensor_type.profile.id, x.quantity)
            })
            .collect(),
        hangar_misc: design
            .hangar_misc
            .iter()
            .map(|x| SavedComponent {
                extra_hull_points: x.extra_hull_points,
                ..component(&x.id, &x.hangar_type.profile.id, x.quantity)
            })
            .collect(),
        damage_zones: design
            .damage_zones
            .iter()
            .map(|z| SavedZone {
                code: z.code,
                installed_ids: z.systems.iter().map(|s| s.installed_id.clone()).collect(),
            })
            .collect(),
        hit_location_chart: Some(design.hit_location_chart.clone()),
    }
}

// ============================================================================
// REBUILD
// ============================================================================
//
// Each `rebuild_*` returns `None` when the saved type id is unknown.

pub fn rebuild_armor(saved: &SavedComponent, catalog: &Catalog) -> Option<InstalledArmor> {
    let armor_type = catalog.armor_type(&saved.type_id)?;
    Some(InstalledArmor::new(saved.id.clone(), armor_type))
}

pub fn rebuild_power_plant(
    saved: &SavedComponent,
    catalog: &Catalog,
) -> Option<InstalledPowerPlant> {
    let plant_type = catalog.power_plant(&saved.type_id)?;
    Some(InstalledPowerPlant::new(saved.id.clone(), plant_type, saved.quantity))
}

/// Fuel figures come from the consuming type; a tank whose consumer type is
/// unknown or burns no fuel is dropped.
pub fn rebuild_fuel_tank(saved: &SavedFuelTank, catalog: &Catalog) -> Option<InstalledFuelTank> {
    let fuel: Option<&FuelRequirement> = match saved.consumer {
        FuelConsumer::PowerPlant => catalog.power_plant(&saved.consumer_type_id)?.fuel.as_ref(),
        FuelConsumer::Engine => catalog.engine(&saved.consumer_type_id)?.fuel.as_ref(),
        FuelConsumer::Ftl => catalog.ftl_drive(&saved.consumer_type_id)?.fuel.as_ref(),
    };
    Some(InstalledFuelTank::new(
        saved.id.clone(),
        saved.consumer,
        &saved.consumer_type_id,
        fuel?.clone(),
        saved.hull_points,
    ))
}

pub fn rebuild_engine(saved: &SavedComponent, catalog: &Catalog) -> Option<InstalledEngine> {
    let engine_type = catalog.engine(&saved.type_id)?;
    Some(InstalledEngine::new(saved.id.clone(), engine_type, saved.quantity))
}

pub fn rebuild_ftl_drive(saved: &SavedComponent, catalog: &Catalog) -> Option<InstalledFtlDrive> {
    let drive_type = catalog.ftl_drive(&saved.type_id)?;
    Some(InstalledFtlDrive::new(saved.id.clone(), drive_type, saved.quantity))
}

pub fn rebuild_life_support(
    saved: &SavedComponent,
    catalog: &Catalog,
) -> Option<InstalledLifeSupport> {
    let life_support_type = catalog.life_support_type(&saved.type_id)?;
    Some(InstalledLifeSupport::new(
        saved.id.clone(),
        life_support_type,
        saved.quantity,
        saved.extra_hull_points,
    ))
}

pub fn rebuild_accommodation(
    saved: &SavedComponent,
    catalog: &Catalog,
) -> Option<InstalledAccommodation> {
    let accommodation_type = catalog.accommodation(&saved.type_id)?;
    Some(InstalledAccommodation::new(
        saved.id.clone(),
        accommodation_type,
        saved.quantity,
    ))
}

pub fn rebuild_evacuation(
    saved: &SavedComponent,
    catalog: &Catalog,
) -> Option<InstalledEvacuation> {
    let evacuation_type = catalog.evacuation_type(&saved.type_id)?;
    Some(InstalledEvacuation::new(
        saved.id.clone(),
        evacuation_type,
        saved.quantity,
        saved.extra_hull_points,
    ))
}

pub fn rebuild_gravity(saved: &SavedComponent, catalog: &Catalog) -> Option<InstalledGravity> {
    let gravity_type = catalog.gravity_type(&saved.type_id)?;
    Some(InstalledGravity::new(saved.id.clone(), gravity_type))
}

pub fn rebuild_weapon(saved: &SavedComponent, catalog: &Catalog) -> Option<InstalledWeapon> {
    let weapon_type = catalog.weapon(&saved.type_id)?;
    Some(InstalledWeapon::new(
        saved.id.clone(),
        weapon_type,
        saved.mount.unwrap_or(MountType::Standard),
        saved.gun_configuration.unwrap_or_default(),
        saved.quantity,
        &saved.arcs,
    ))
}

/// Loadout entries naming unknown ordnance are skipped.
pub fn rebuild_launch_system(
    saved: &SavedComponent,
    catalog: &Catalog,
) -> Option<InstalledLaunchSystem> {
    let launch_type = catalog.launch_system(&saved.type_id)?;
    let loadout = saved
        .loadout
        .iter()
        .filter_map(|l| {
            catalog.ordnance_type(&l.type_id).map(|ordnance_type| LoadedOrdnance {
                ordnance_type: ordnance_type.clone(),
                quantity: l.quantity,
            })
        })
        .collect();
    Some(
        InstalledLaunchSystem::new(
            saved.id.clone(),
            launch_type,
            saved.quantity,
            saved.extra_hull_points,
            &saved.arcs,
        )
        .with_loadout(loadout),
    )
}

/// Rebuild a defense. Saves older than [`FORMAT_VERSION`] stored
/// coverage-multiples quantities as raw units; those are converted to
/// full-coverage sets for this ship.
pub fn rebuild_defense(
    saved: &SavedComponent,
    catalog: &Catalog,
    ctx: &ShipContext,
    format_version: u32,
) -> Option<InstalledDefenseSystem> {
    let defense_type = catalog.defense(&saved.type_id)?;
    let quantity = match defense_type.profile.sizing {
        SizingStrategy::CoverageMultiples {
            coverage_per_unit, ..
        } if format_version < FORMAT_VERSION => legacy_coverage_sets(
            saved.quantity,
            units_for_full_coverage(ctx.base_hull_points, coverage_per_unit),
        ),
        _ => saved.quantity,
    };
    Some(InstalledDefenseSystem::new(saved.id.clone(), defense_type, quantity))
}

/// Links are kept as saved and re-resolved by key on every read.
pub fn rebuild_command_control(
    saved: &SavedComponent,
    catalog: &Catalog,
) -> Option<InstalledCommandControl> {
    let control_type = catalog.command_control_type(&saved.type_id)?;
    let control = InstalledCommandControl::new(saved.id.clone(), control_type, saved.quantity);
    Some(match &saved.link {
        Some(link) => control.linked_to(link.clone()),
        None => control,
    })
}

pub fn rebuild_sensor(saved: &SavedComponent, catalog: &Catalog) -> Option<InstalledSensor> {
    let sensor_type = catalog.sensor(&saved.type_id)?;
    let mut sensor = InstalledSensor::new(saved.id.clone(), sensor_type, saved.quantity);
    sensor.arcs = saved.arcs.clone();
    Some(sensor)
}

pub fn rebuild_hangar_misc(
    saved: &SavedComponent,
    catalog: &Catalog,
) -> Option<InstalledHangarMisc> {
    let hangar_type = catalog.hangar_misc_type(&saved.type_id)?;
    Some(InstalledHangarMisc::new(
        saved.id.clone(),
        hangar_type,
        saved.quantity,
        saved.extra_hull_points,
    ))
}

fn rebuild_list<T>(
    category: &'static str,
    saved: &[SavedComponent],
    warnings: &mut Vec<LoadWarning>,
    rebuild: impl Fn(&SavedComponent) -> Option<T>,
) -> Vec<T> {
    saved
        .iter()
        .filter_map(|record| {
            let rebuilt = rebuild(record);
            if rebuilt.is_none() {
                log::warn!(
                    "Dropping {category} {}: unknown type '{}'",
                    record.id,
                    record.type_id
                );
                warnings.push(LoadWarning::UnknownType {
                    category,
                    installed_id: record.id.clone(),
                    type_id: record.type_id.clone(),
                });
            }
            rebuilt
        })
        .collect()
}

fn clamp_value(installed_id: &InstalledId, value: &mut u32, warnings: &mut Vec<LoadWarning>) {
    if *value > MAX_SAVED_QUANTITY {
        log::warn!("Clamping {installed_id}: quantity {} exceeds {MAX_SAVED_QUANTITY}", *value);
        warnings.push(LoadWarning::ClampedQuantity {
            installed_id: installed_id.clone(),
            from: *value,
            to: MAX_SAVED_QUANTITY,
        });
        *value = MAX_SAVED_QUANTITY;
    }
}

/// Copy of `saved` with every quantity within [`MAX_SAVED_QUANTITY`].
fn clamp_quantities(saved: &SavedDesign, warnings: &mut Vec<LoadWarning>) -> SavedDesign {
    let mut clamped = saved.clone();
    for list in [
        &mut clamped.armor,
        &mut clamped.power_plants,
        &mut clamped.engines,
        &mut clamped.ftl_drives,
        &mut clamped.life_support,
        &mut clamped.accommodations,
        &mut clamped.evacuation,
        &mut clamped.gravity,
        &mut clamped.weapons,
        &mut clamped.launch_systems,
        &mut clamped.defenses,
        &mut clamped.command_control,
        &mut clamped.sensors,
        &mut clamped.hangar_misc,
    ] {
        for record in list.iter_mut() {
            clamp_value(&record.id, &mut record.quantity, warnings);
            clamp_value(&record.id, &mut record.extra_hull_points, warnings);
            for load in &mut record.loadout {
                clamp_value(&record.id, &mut load.quantity, warnings);
            }
        }
    }
    for tank in &mut clamped.fuel_tanks {
        clamp_value(&tank.id, &mut tank.hull_points, warnings);
    }
    clamped
}

// ============================================================================
// LOAD
// ============================================================================

/// Rebuild a design from its saved form against `catalog`.
pub fn load_design(saved: &SavedDesign, catalog: &Catalog) -> Result<LoadedDesign> {
    let hull = catalog.hull(&saved.hull_id).ok_or_else(|| Error::UnknownHull {
        id: saved.hull_id.clone(),
    })?;
    let ctx = ShipContext::from_hull(hull);
    let mut warnings = Vec::new();
    let saved = &clamp_quantities(saved, &mut warnings);
    let w = &mut warnings;

    let mut fuel_tanks = Vec::new();
    for tank in &saved.fuel_tanks {
        match rebuild_fuel_tank(tank, catalog) {
            Some(rebuilt) => fuel_tanks.push(rebuilt),
            None => w.push(LoadWarning::UnknownType {
                category: "fuel tank",
                installed_id: tank.id.clone(),
                type_id: tank.consumer_type_id.clone(),
            }),
        }
    }

    for launcher in &saved.launch_systems {
        for load in &launcher.loadout {
            if catalog.ordnance_type(&load.type_id).is_none() {
                w.push(LoadWarning::UnknownOrdnance {
                    installed_id: launcher.id.clone(),
                    type_id: load.type_id.clone(),
                });
            }
        }
    }

    let defenses = rebuild_list("defense", &saved.defenses, w, |s| {
        rebuild_defense(s, catalog, &ctx, saved.format_version)
    });
    for (record, rebuilt) in saved
        .defenses
        .iter()
        .filter_map(|s| defenses.iter().find(|d| d.id == s.id).map(|d| (s, d)))
    {
        if record.quantity != rebuilt.quantity {
            w.push(LoadWarning::MigratedQuantity {
                installed_id: record.id.clone(),
                from: record.quantity,
                to: rebuilt.quantity,
            });
        }
    }

    let blank = ShipDesign::new(&saved.name, hull, saved.design_type, catalog);
    let design = ShipDesign {
        constraints: saved.constraints.clone(),
        armor: rebuild_list("armor", &saved.armor, w, |s| rebuild_armor(s, catalog)),
        power_plants: rebuild_list("power plant", &saved.power_plants, w, |s| {
            rebuild_power_plant(s, catalog)
        }),
        fuel_tanks,
        engines: rebuild_list("engine", &saved.engines, w, |s| rebuild_engine(s, catalog)),
        ftl_drives: rebuild_list("FTL drive", &saved.ftl_drives, w, |s| {
            rebuild_ftl_drive(s, catalog)
        }),
        life_support: rebuild_list("life support", &saved.life_support, w, |s| {
            rebuild_life_support(s, catalog)
        }),
        accommodations: rebuild_list("accommodation", &saved.accommodations, w, |s| {
            rebuild_accommodation(s, catalog)
        }),
        evacuation: rebuild_list("evacuation", &saved.evacuation, w, |s| {
            rebuild_evacuation(s, catalog)
        }),
        gravity: rebuild_list("gravity", &saved.gravity, w, |s| rebuild_gravity(s, catalog)),
        weapons: rebuild_list("weapon", &saved.weapons, w, |s| rebuild_weapon(s, catalog)),
        launch_systems: rebuild_list("launch system", &saved.launch_systems, w, |s| {
            rebuild_launch_system(s, catalog)
        }),
        defenses,
        command_control: rebuild_list("command & control", &saved.command_control, w, |s| {
            rebuild_command_control(s, catalog)
        }),
        sensors: rebuild_list("sensor", &saved.sensors, w, |s| rebuild_sensor(s, catalog)),
        hangar_misc: rebuild_list("hangar", &saved.hangar_misc, w, |s| {
            rebuild_hangar_misc(s, catalog)
        }),
        ..blank
    };

    let layout = design.zone_layout();
    let damage_zones = rebuild_saved_zones(&saved.damage_zones, &layout, &design.zone_systems(), w);
    let hit_location_chart = match &saved.hit_location_chart {
        Some(chart) => {
            let mut defects = validate_chart(chart, &layout.zones).len();
            if chart.hit_die != layout.hit_die {
                defects += 1;
            }
            if defects == 0 {
                chart.clone()
            } else {
                w.push(LoadWarning::RegeneratedChart { defects });
                generate_chart(&layout, &catalog.hit_location_tables)
            }
        }
        None => design.hit_location_chart.clone(),
    };
    let design = ShipDesign {
        damage_zones,
        hit_location_chart,
        ..design
    };

    log::info!(
        "Loaded {} on {} with {} warnings",
        design.name,
        design.hull.name,
        warnings.len()
    );
    Ok(LoadedDesign { design, warnings })
}

/// Parse and load in one step.
pub fn load_design_json(json: &str, catalog: &Catalog) -> Result<LoadedDesign> {
    load_design(&SavedDesign::from_json(json)?, catalog)
}

fn rebuild_saved_zones(
    saved: &[SavedZone],
    layout: &ZoneLayout,
    systems: &[ZoneSystemRef],
    warnings: &mut Vec<LoadWarning>,
) -> Vec<DamageZone> {
    for zone in saved.iter().filter(|z| !layout.zones.contains(&z.code)) {
        warnings.push(LoadWarning::UnknownZone { zone: zone.code });
    }
    let mut placed: HashSet<&InstalledId> = HashSet::new();
    layout
        .zones
        .iter()
        .map(|code| {
            let mut refs = Vec::new();
            for installed_id in saved
                .iter()
                .filter(|z| z.code == *code)
                .flat_map(|z| &z.installed_ids)
            {
                match systems.iter().find(|s| &s.installed_id == installed_id) {
                    None => warnings.push(LoadWarning::DroppedZoneReference {
                        zone: *code,
                        installed_id: installed_id.clone(),
                    }),
                    Some(system) if !system.can_occupy(*code) => {
                        warnings.push(LoadWarning::DisplacedZoneReference {
                            zone: *code,
                            installed_id: installed_id.clone(),
                        })
                    }
                    Some(system) => {
                        if placed.insert(&system.installed_id) {
                            refs.push(system.clone());
                        }
                    }
                }
            }
            DamageZone::new(*code, layout.zone_limit).with_systems(refs)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        DamageTrack, DefenseKind, DefenseSystemType, Firepower, Hull, PowerPlantType, ShipClass,
        SystemProfile, WeaponType,
    };
    use crate::design::calculate_design_stats;
    use crate::hit_location::{AttackDirection, HitLocationColumn, HitLocationEntry};
    use crate::validation::{classify, validate, DesignState};

    fn catalog() -> Catalog {
        Catalog {
            hulls: vec![Hull {
                id: "frigate".into(),
                name: "Frigate".into(),
                ship_class: ShipClass::Light,
                hull_points: 100,
                bonus_hull_points: 0,
                toughness: "Good".into(),
                damage_track: DamageTrack::default(),
                crew: 10,
                cost: 500_000,
                progress_level: 6,
                tech_tracks: Vec::new(),
                description: String::new(),
            }],
            power_plants: vec![PowerPlantType {
                profile: SystemProfile::fixed("fusion", "Fusion Plant", 0, 0, 0).with_sizing(
                    SizingStrategy::Allocated { min_hull_points: 2 },
                ),
                power_generated_per_hull_point: 2.0,
                fuel: None,
            }],
            weapons: vec![WeaponType {
                profile: SystemProfile::fixed("laser", "Laser", 2, 1, 1_000),
                firepower: Firepower::Light,
                damage: String::new(),
                range: String::new(),
                accuracy: 0,
                allowed_mounts: Vec::new(),
            }],
            defenses: vec![DefenseSystemType {
                profile: SystemProfile::fixed("chaff", "Chaff", 0, 0, 250).with_sizing(
                    SizingStrategy::CoverageMultiples {
                        hull_points_per_unit: 1,
                        coverage_per_unit: 25,
                    },
                ),
                kind: DefenseKind::Countermeasure,
                effect: String::new(),
            }],
            ..Catalog::default()
        }
    }

    fn saved_with(f: impl FnOnce(&mut SavedDesign)) -> SavedDesign {
        let mut saved = SavedDesign {
            format_version: FORMAT_VERSION,
            name: "Test".into(),
            hull_id: "frigate".into(),
            ..SavedDesign::default()
        };
        f(&mut saved);
        saved
    }

    #[test]
    fn save_then_load_reproduces_the_design() {
        let catalog = catalog();
        let saved = saved_with(|s| {
            s.power_plants = vec![SavedComponent::new(&"pp-1".into(), "fusion", 6)];
            s.weapons = vec![SavedComponent {
                mount: Some(MountType::Turret),
                arcs: vec![FiringArc::Forward, FiringArc::Port],
                ..SavedComponent::new(&"w-1".into(), "laser", 2)
            }];
            s.damage_zones = vec![SavedZone {
                code: ZoneCode::Forward,
                installed_ids: vec!["w-1".into(), "pp-1".into()],
            }];
        });
        let loaded = load_design(&saved, &catalog).unwrap();
        assert!(loaded.warnings.is_empty(), "{:?}", loaded.warnings);
        let zone = &loaded.design.damage_zones[0];
        assert_eq!(zone.code, ZoneCode::Forward);
        // Laser turret: ceil(2 * 125%) = 3 per mount, two mounts; plant 6.
        assert_eq!(zone.total_hull_points, 6 + 6);

        let again = load_design(&save_design(&loaded.design), &catalog).unwrap();
        assert_eq!(again.design, loaded.design);
    }

    #[test]
    fn unknown_hull_fails_the_load() {
        let saved = saved_with(|s| s.hull_id = "dreadnought".into());
        assert!(matches!(
            load_design(&saved, &catalog()),
            Err(Error::UnknownHull { .. })
        ));
    }

    #[test]
    fn unknown_type_drops_one_record_and_its_zone_reference() {
        let saved = saved_with(|s| {
            s.power_plants = vec![SavedComponent::new(&"pp-1".into(), "fusion", 4)];
            s.weapons = vec![SavedComponent {
                arcs: vec![FiringArc::Forward],
                ..SavedComponent::new(&"w-1".into(), "disintegrator", 1)
            }];
            s.damage_zones = vec![SavedZone {
                code: ZoneCode::Forward,
                installed_ids: vec!["w-1".into(), "pp-1".into()],
            }];
        });
        let loaded = load_design(&saved, &catalog()).unwrap();
        assert_eq!(loaded.design.power_plants.len(), 1);
        assert!(loaded.design.weapons.is_empty());
        assert_eq!(
            loaded.warnings,
            vec![
                LoadWarning::UnknownType {
                    category: "weapon",
                    installed_id: "w-1".into(),
                    type_id: "disintegrator".into(),
                },
                LoadWarning::DroppedZoneReference {
                    zone: ZoneCode::Forward,
                    installed_id: "w-1".into(),
                },
            ]
        );
        assert_eq!(loaded.design.damage_zones[0].total_hull_points, 4);
    }

    #[test]
    fn legacy_countermeasures_migrate_to_sets() {
        // 100 HP at 25 per unit: 4 units per full set.
        let legacy = saved_with(|s| {
            s.format_version = 1;
            s.defenses = vec![SavedComponent::new(&"def-1".into(), "chaff", 8)];
        });
        let loaded = load_design(&legacy, &catalog()).unwrap();
        assert_eq!(loaded.design.defenses[0].quantity, 2);
        assert_eq!(
            loaded.warnings,
            vec![LoadWarning::MigratedQuantity {
                installed_id: "def-1".into(),
                from: 8,
                to: 2,
            }]
        );

        let current = saved_with(|s| {
            s.defenses = vec![SavedComponent::new(&"def-1".into(), "chaff", 2)];
        });
        let loaded = load_design(&current, &catalog()).unwrap();
        assert_eq!(loaded.design.defenses[0].quantity, 2);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn oversized_quantity_is_clamped_with_a_warning() {
        let saved = saved_with(|s| {
            s.weapons = vec![SavedComponent {
                mount: Some(MountType::Turret),
                arcs: vec![FiringArc::Forward],
                ..SavedComponent::new(&"w-1".into(), "laser", 2_000_000_000)
            }];
        });
        let loaded = load_design(&saved, &catalog()).unwrap();
        assert_eq!(loaded.design.weapons[0].quantity, MAX_SAVED_QUANTITY);
        assert_eq!(
            loaded.warnings,
            vec![LoadWarning::ClampedQuantity {
                installed_id: "w-1".into(),
                from: 2_000_000_000,
                to: MAX_SAVED_QUANTITY,
            }]
        );

        // The clamped design still calculates: wildly over budget, not a crash.
        let stats = calculate_design_stats(&loaded.design);
        assert_eq!(stats.used_hull_points, 3 * MAX_SAVED_QUANTITY);
        assert!(stats.remaining_hull_points < 0);
        assert_eq!(classify(&validate(&loaded.design)), DesignState::Error);
    }

    #[test]
    fn missing_format_version_reads_as_legacy() {
        let saved = SavedDesign::from_json(r#"{ "name": "Old", "hullId": "frigate" }"#).unwrap();
        assert_eq!(saved.format_version, 1);
    }

    #[test]
    fn broken_chart_is_regenerated() {
        let saved = saved_with(|s| {
            s.hit_location_chart = Some(HitLocationChart {
                hit_die: 8,
                columns: vec![HitLocationColumn {
                    direction: AttackDirection::Forward,
                    entries: vec![HitLocationEntry {
                        min_roll: 1,
                        max_roll: 5,
                        zone: ZoneCode::Forward,
                    }],
                }],
            });
        });
        let loaded = load_design(&saved, &catalog()).unwrap();
        assert!(matches!(
            loaded.warnings.as_slice(),
            [LoadWarning::RegeneratedChart { .. }]
        ));
        let zones = loaded.design.zone_layout().zones;
        assert!(validate_chart(&loaded.design.hit_location_chart, &zones).is_empty());
    }
}
