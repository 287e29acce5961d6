//! Ship design: the hull, every installed list, damage zones and the
//! hit-location chart, plus the aggregate calculator over all of it.
//!
//! A [`ShipDesign`] holds inputs only. Hull points, power and cost are
//! recomputed from the installed records on every read, so there is no
//! cached value to drift. Every `with_*` / `change_*` operation returns a new
//! design and leaves `self` untouched.

use serde::{Deserialize, Serialize};

use crate::armor::{calculate_armor_stats, is_armor_weight_allowed, ArmorStats, InstalledArmor};
use crate::catalog::{Catalog, Hull, ProgressLevel};
use crate::command::{calculate_command_stats, CommandStats, InstalledCommandControl, LinkTargets};
use crate::defenses::{calculate_defense_stats, DefenseStats, InstalledDefenseSystem};
use crate::engines::{calculate_engine_stats, EngineStats, InstalledEngine};
use crate::error::Result;
use crate::ftl::{calculate_ftl_stats, FtlStats, InstalledFtlDrive};
use crate::hangar::{calculate_hangar_stats, HangarStats, InstalledHangarMisc};
use crate::hit_location::{generate_chart, HitLocationChart};
use crate::ids::{next_installed_id, InstalledId};
use crate::ordnance::{calculate_ordnance_stats, InstalledLaunchSystem, OrdnanceStats};
use crate::power::{calculate_power_stats, InstalledFuelTank, InstalledPowerPlant, PowerStats};
use crate::sensors::{calculate_sensor_stats, InstalledSensor, SensorStats};
use crate::sizing::ShipContext;
use crate::support::{
    calculate_support_stats, InstalledAccommodation, InstalledEvacuation, InstalledGravity,
    InstalledLifeSupport, SupportStats, SupportSystems,
};
use crate::weapons::{calculate_weapon_stats, InstalledWeapon, WeaponStats};
use crate::zones::{
    assign_system, auto_assign, diagram_status, rebuild_zones, sync_zone_systems,
    unassign_system, zone_layout, DamageZone, DiagramStatus, ZoneCode, ZoneLayout,
    ZoneSystemCategory, ZoneSystemRef,
};

/// Progress level a new design is constrained to.
pub const DEFAULT_PROGRESS_LEVEL: ProgressLevel = 8;

// ============================================================================
// DESIGN TYPES & REQUIREMENTS
// ============================================================================

/// What kind of installation is being designed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DesignType {
    #[default]
    Warship,
    SpaceStation,
    GroundBase,
}

/// A construction step: one subsystem category of the design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DesignStep {
    PowerPlant,
    Engines,
    Ftl,
    Armor,
    Support,
    Weapons,
    Defenses,
    CommandControl,
    Sensors,
    HangarMisc,
}

impl DesignStep {
    pub const ALL: [DesignStep; 10] = [
        DesignStep::PowerPlant,
        DesignStep::Engines,
        DesignStep::Ftl,
        DesignStep::Armor,
        DesignStep::Support,
        DesignStep::Weapons,
        DesignStep::Defenses,
        DesignStep::CommandControl,
        DesignStep::Sensors,
        DesignStep::HangarMisc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PowerPlant => "power plant",
            Self::Engines => "engines",
            Self::Ftl => "FTL drive",
            Self::Armor => "armor",
            Self::Support => "support systems",
            Self::Weapons => "weapons",
            Self::Defenses => "defenses",
            Self::CommandControl => "command & control",
            Self::Sensors => "sensors",
            Self::HangarMisc => "hangars & misc",
        }
    }
}

/// How a design type treats a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Requirement {
    /// Missing is an error.
    Mandatory,
    /// Missing adds a line to the optional-steps warning.
    Expected,
    /// Never reported.
    Optional,
    /// Installing one is a warning.
    NotApplicable,
}

impl DesignType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Warship => "Warship",
            Self::SpaceStation => "Space station",
            Self::GroundBase => "Ground base",
        }
    }

    /// The declared requirements table.
    pub fn requirement(&self, step: DesignStep) -> Requirement {
        use DesignStep::*;
        use Requirement::*;
        match (self, step) {
            (_, PowerPlant) => Mandatory,

            (Self::Warship, Engines) => Mandatory,
            (Self::SpaceStation, Engines) => Optional,
            (Self::GroundBase, Engines) => NotApplicable,

            (Self::Warship, Ftl) => Expected,
            (Self::SpaceStation, Ftl) => Optional,
            (Self::GroundBase, Ftl) => NotApplicable,

            (Self::GroundBase, Weapons) => Optional,
            (_, HangarMisc) => Optional,
            (_, Armor | Support | Weapons | Defenses | CommandControl | Sensors) => Expected,
        }
    }
}

/// Progress-level ceiling and allowed tech tracks for the design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignConstraints {
    pub progress_level: ProgressLevel,
    /// Empty means every track is allowed.
    #[serde(default)]
    pub tech_tracks: Vec<String>,
}

impl Default for DesignConstraints {
    fn default() -> Self {
        Self {
            progress_level: DEFAULT_PROGRESS_LEVEL,
            tech_tracks: Vec::new(),
        }
    }
}

// ============================================================================
// SHIP DESIGN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipDesign {
    pub name: String,
    pub design_type: DesignType,
    pub constraints: DesignConstraints,
    pub hull: Hull,
    pub armor: Vec<InstalledArmor>,
    pub power_plants: Vec<InstalledPowerPlant>,
    pub fuel_tanks: Vec<InstalledFuelTank>,
    pub engines: Vec<InstalledEngine>,
    pub ftl_drives: Vec<InstalledFtlDrive>,
    pub life_support: Vec<InstalledLifeSupport>,
    pub accommodations: Vec<InstalledAccommodation>,
    pub evacuation: Vec<InstalledEvacuation>,
    pub gravity: Vec<InstalledGravity>,
    pub weapons: Vec<InstalledWeapon>,
    pub launch_systems: Vec<InstalledLaunchSystem>,
    pub defenses: Vec<InstalledDefenseSystem>,
    pub command_control: Vec<InstalledCommandControl>,
    pub sensors: Vec<InstalledSensor>,
    pub hangar_misc: Vec<InstalledHangarMisc>,
    pub damage_zones: Vec<DamageZone>,
    pub hit_location_chart: HitLocationChart,
}

/// Outcome of [`ShipDesign::change_hull`].
#[derive(Debug, Clone, PartialEq)]
pub struct HullChange {
    pub design: ShipDesign,
    /// Zone assignments lost because their zone no longer exists.
    pub dropped_zone_systems: Vec<ZoneSystemRef>,
    /// Installations removed because the new ship class forbids them.
    pub dropped_installations: Vec<InstalledId>,
}

macro_rules! replace_list {
    ($($method:ident => $field:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $method(&self, $field: Vec<$ty>) -> ShipDesign {
                ShipDesign {
                    $field,
                    ..self.clone()
                }
                .resynced()
            }
        )*
    };
}

impl ShipDesign {
    /// An empty design on `hull` with fresh zones and chart.
    pub fn new(name: &str, hull: &Hull, design_type: DesignType, catalog: &Catalog) -> Self {
        let layout = zone_layout(hull.ship_class, hull.total_hull_points());
        Self {
            name: name.to_string(),
            design_type,
            constraints: DesignConstraints::default(),
            hull: hull.clone(),
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
            damage_zones: crate::zones::create_zones(&layout),
            hit_location_chart: generate_chart(&layout, &catalog.hit_location_tables),
        }
    }

    pub fn context(&self) -> ShipContext {
        ShipContext::from_hull(&self.hull)
    }

    pub fn zone_layout(&self) -> ZoneLayout {
        zone_layout(self.hull.ship_class, self.hull.total_hull_points())
    }

    pub fn support(&self) -> SupportSystems<'_> {
        SupportSystems {
            life_support: &self.life_support,
            accommodations: &self.accommodations,
            evacuation: &self.evacuation,
            gravity: &self.gravity,
        }
    }

    pub fn link_targets(&self) -> LinkTargets {
        LinkTargets::collect(
            &self.weapons,
            &self.launch_systems,
            &self.sensors,
            &self.context(),
        )
    }

    /// Whether anything is installed for a step.
    pub fn has_step(&self, step: DesignStep) -> bool {
        match step {
            DesignStep::PowerPlant => !self.power_plants.is_empty(),
            DesignStep::Engines => !self.engines.is_empty(),
            DesignStep::Ftl => !self.ftl_drives.is_empty(),
            DesignStep::Armor => !self.armor.is_empty(),
            DesignStep::Support => !self.support().is_empty(),
            DesignStep::Weapons => !self.weapons.is_empty() || !self.launch_systems.is_empty(),
            DesignStep::Defenses => !self.defenses.is_empty(),
            DesignStep::CommandControl => !self.command_control.is_empty(),
            DesignStep::Sensors => !self.sensors.is_empty(),
            DesignStep::HangarMisc => !self.hangar_misc.is_empty(),
        }
    }

    pub fn installed_ids(&self) -> Vec<&InstalledId> {
        let mut ids: Vec<&InstalledId> = Vec::new();
        ids.extend(self.armor.iter().map(|x| &x.id));
        ids.extend(self.power_plants.iter().map(|x| &x.id));
        ids.extend(self.fuel_tanks.iter().map(|x| &x.id));
        ids.extend(self.engines.iter().map(|x| &x.id));
        ids.extend(self.ftl_drives.iter().map(|x| &x.id));
        ids.extend(self.life_support.iter().map(|x| &x.id));
        ids.extend(self.accommodations.iter().map(|x| &x.id));
        ids.extend(self.evacuation.iter().map(|x| &x.id));
        ids.extend(self.gravity.iter().map(|x| &x.id));
        ids.extend(self.weapons.iter().map(|x| &x.id));
        ids.extend(self.launch_systems.iter().map(|x| &x.id));
        ids.extend(self.defenses.iter().map(|x| &x.id));
        ids.extend(self.command_control.iter().map(|x| &x.id));
        ids.extend(self.sensors.iter().map(|x| &x.id));
        ids.extend(self.hangar_misc.iter().map(|x| &x.id));
        ids
    }

    /// A fresh `prefix-N` id unused anywhere in the design.
    pub fn next_id(&self, prefix: &str) -> InstalledId {
        next_installed_id(prefix, self.installed_ids())
    }

    replace_list! {
        with_armor => armor: InstalledArmor,
        with_power_plants => power_plants: InstalledPowerPlant,
        with_fuel_tanks => fuel_tanks: InstalledFuelTank,
        with_engines => engines: InstalledEngine,
        with_ftl_drives => ftl_drives: InstalledFtlDrive,
        with_life_support => life_support: InstalledLifeSupport,
        with_accommodations => accommodations: InstalledAccommodation,
        with_evacuation => evacuation: InstalledEvacuation,
        with_gravity => gravity: InstalledGravity,
        with_weapons => weapons: InstalledWeapon,
        with_launch_systems => launch_systems: InstalledLaunchSystem,
        with_defenses => defenses: InstalledDefenseSystem,
        with_command_control => command_control: InstalledCommandControl,
        with_sensors => sensors: InstalledSensor,
        with_hangar_misc => hangar_misc: InstalledHangarMisc,
    }

    pub fn with_constraints(&self, constraints: DesignConstraints) -> ShipDesign {
        ShipDesign {
            constraints,
            ..self.clone()
        }
    }

    pub fn with_design_type(&self, design_type: DesignType) -> ShipDesign {
        ShipDesign {
            design_type,
            ..self.clone()
        }
    }

    pub fn with_name(&self, name: &str) -> ShipDesign {
        ShipDesign {
            name: name.to_string(),
            ..self.clone()
        }
    }

    /// Remove one installed record from whichever list holds it. Links from
    /// controls to it are left in place and surface as orphans.
    pub fn without_installed(&self, id: &InstalledId) -> ShipDesign {
        let mut design = self.clone();
        design.armor.retain(|x| &x.id != id);
        design.power_plants.retain(|x| &x.id != id);
        design.fuel_tanks.retain(|x| &x.id != id);
        design.engines.retain(|x| &x.id != id);
        design.ftl_drives.retain(|x| &x.id != id);
        design.life_support.retain(|x| &x.id != id);
        design.accommodations.retain(|x| &x.id != id);
        design.evacuation.retain(|x| &x.id != id);
        design.gravity.retain(|x| &x.id != id);
        design.weapons.retain(|x| &x.id != id);
        design.launch_systems.retain(|x| &x.id != id);
        design.defenses.retain(|x| &x.id != id);
        design.command_control.retain(|x| &x.id != id);
        design.sensors.retain(|x| &x.id != id);
        design.hangar_misc.retain(|x| &x.id != id);
        design.resynced()
    }

    /// Refresh zone references from the current installations.
    fn resynced(self) -> ShipDesign {
        let refs = collect_zone_systems(&self);
        let sync = sync_zone_systems(&self.damage_zones, &refs);
        if !sync.displaced.is_empty() {
            log::debug!(
                "{} systems no longer fit their zone and were unassigned",
                sync.displaced.len()
            );
        }
        ShipDesign {
            damage_zones: sync.zones,
            ..self
        }
    }

    /// Swap the hull. Zones are rebuilt for the new layout (keeping
    /// assignments whose zone survives), the chart is regenerated, and
    /// installations the new ship class forbids are removed.
    pub fn change_hull(&self, hull: &Hull, catalog: &Catalog) -> HullChange {
        let ship_class = hull.ship_class;
        let mut dropped_installations = Vec::new();
        let mut design = ShipDesign {
            hull: hull.clone(),
            ..self.clone()
        };
        design.armor.retain(|layer| {
            let allowed = is_armor_weight_allowed(layer.armor_type.weight, ship_class);
            if !allowed {
                dropped_installations.push(layer.id.clone());
            }
            allowed
        });
        let ctx = design.context();
        design.hangar_misc.retain(|space| {
            let allowed = space.is_allowed_for(&ctx);
            if !allowed {
                dropped_installations.push(space.id.clone());
            }
            allowed
        });

        let layout = design.zone_layout();
        let rebuilt = rebuild_zones(&self.damage_zones, &layout);
        design.damage_zones = rebuilt.zones;
        design.hit_location_chart = generate_chart(&layout, &catalog.hit_location_tables);
        let design = design.resynced();

        log::info!(
            "Hull changed to {} ({} HP, {}): {} zones, {} installations dropped",
            hull.name,
            hull.total_hull_points(),
            ship_class,
            design.damage_zones.len(),
            dropped_installations.len()
        );
        HullChange {
            design,
            dropped_zone_systems: rebuilt.dropped,
            dropped_installations,
        }
    }

    // ------------------------------------------------------------------------
    // Zones
    // ------------------------------------------------------------------------

    pub fn zone_systems(&self) -> Vec<ZoneSystemRef> {
        collect_zone_systems(self)
    }

    /// Assign an installed system to a zone.
    pub fn assign_zone(&self, code: ZoneCode, installed_id: &InstalledId) -> Result<ShipDesign> {
        let system = self
            .zone_systems()
            .into_iter()
            .find(|s| &s.installed_id == installed_id)
            .ok_or_else(|| crate::error::Error::ZoneSystemNotFound {
                installed_id: installed_id.to_string(),
            })?;
        Ok(ShipDesign {
            damage_zones: assign_system(&self.damage_zones, code, &system)?,
            ..self.clone()
        })
    }

    pub fn unassign_zone(&self, installed_id: &InstalledId) -> Result<ShipDesign> {
        Ok(ShipDesign {
            damage_zones: unassign_system(&self.damage_zones, installed_id)?,
            ..self.clone()
        })
    }

    pub fn auto_assign_zones(&self) -> ShipDesign {
        ShipDesign {
            damage_zones: auto_assign(&self.damage_zones, &self.zone_systems()),
            ..self.clone()
        }
    }

    pub fn diagram_status(&self) -> DiagramStatus {
        diagram_status(&self.damage_zones, &self.zone_systems())
    }
}

/// Zone references for every zone-placed installation. Armor covers the
/// whole hull and has no zone.
pub fn collect_zone_systems(design: &ShipDesign) -> Vec<ZoneSystemRef> {
    use ZoneSystemCategory as Cat;

    let ctx = design.context();
    let mut refs = Vec::new();
    for x in &design.weapons {
        refs.push(
            ZoneSystemRef::new(
                Cat::Weapon,
                &x.id,
                &x.weapon_type.profile.name,
                x.footprint(&ctx).hull_points,
            )
            .with_firepower(x.weapon_type.firepower.rank(), &x.arcs),
        );
    }
    for x in &design.launch_systems {
        refs.push(
            ZoneSystemRef::new(
                Cat::Launcher,
                &x.id,
                &x.launch_type.profile.name,
                x.footprint(&ctx).hull_points,
            )
            .with_firepower(x.launch_type.firepower.rank(), &x.arcs),
        );
    }
    for x in &design.defenses {
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(
            Cat::Defense,
            &x.id,
            &x.defense_type.profile.name,
            fp.hull_points,
        ));
    }
    for x in &design.sensors {
        let category = match x.kind() {
            crate::catalog::SensorKind::Communications => Cat::Communication,
            _ => Cat::Sensor,
        };
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(category, &x.id, &x.sensor_type.profile.name, fp.hull_points));
    }
    for x in &design.command_control {
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(
            Cat::CommandControl,
            &x.id,
            &x.control_type.profile.name,
            fp.hull_points,
        ));
    }
    for x in &design.hangar_misc {
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(
            Cat::HangarMisc,
            &x.id,
            &x.hangar_type.profile.name,
            fp.hull_points,
        ));
    }
    for x in &design.life_support {
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(
            Cat::Support,
            &x.id,
            &x.life_support_type.profile.name,
            fp.hull_points,
        ));
    }
    for x in &design.accommodations {
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(
            Cat::Support,
            &x.id,
            &x.accommodation_type.profile.name,
            fp.hull_points,
        ));
    }
    for x in &design.evacuation {
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(
            Cat::Support,
            &x.id,
            &x.evacuation_type.profile.name,
            fp.hull_points,
        ));
    }
    for x in &design.gravity {
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(
            Cat::Support,
            &x.id,
            &x.gravity_type.profile.name,
            fp.hull_points,
        ));
    }
    for x in &design.ftl_drives {
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(Cat::Ftl, &x.id, &x.drive_type.profile.name, fp.hull_points));
    }
    for x in &design.engines {
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(
            Cat::Engine,
            &x.id,
            &x.engine_type.profile.name,
            fp.hull_points,
        ));
    }
    for x in &design.fuel_tanks {
        let name = format!("Fuel ({})", x.consumer_type_id);
        refs.push(ZoneSystemRef::new(Cat::FuelTank, &x.id, &name, x.hull_points));
    }
    for x in &design.power_plants {
        let fp = x.footprint(&ctx);
        refs.push(ZoneSystemRef::new(
            Cat::PowerPlant,
            &x.id,
            &x.plant_type.profile.name,
            fp.hull_points,
        ));
    }
    refs
}

// ============================================================================
// AGGREGATE STATS
// ============================================================================

/// Row of the per-category breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreakdownCategory {
    Armor,
    PowerPlants,
    Engines,
    Ftl,
    Support,
    Weapons,
    Ordnance,
    Defenses,
    CommandControl,
    Sensors,
    HangarMisc,
}

impl BreakdownCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Armor => "Armor",
            Self::PowerPlants => "Power plants & fuel",
            Self::Engines => "Engines & fuel",
            Self::Ftl => "FTL & fuel",
            Self::Support => "Support",
            Self::Weapons => "Weapons",
            Self::Ordnance => "Launchers & ordnance",
            Self::Defenses => "Defenses",
            Self::CommandControl => "Command & control",
            Self::Sensors => "Sensors",
            Self::HangarMisc => "Hangars & misc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: BreakdownCategory,
    pub hull_points: u32,
    /// Power drawn (zero for power plants, whose output is reported separately).
    pub power: u32,
    pub cost: u64,
}

/// Ship-wide totals plus every category's stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignStats {
    pub total_hull_points: u32,
    pub used_hull_points: u32,
    /// Negative when the design is over budget.
    pub remaining_hull_points: i64,
    pub power_generated: u32,
    /// Continuous draw; FTL excluded.
    pub power_consumed: u32,
    pub ftl_power: u32,
    pub power_balance: i64,
    /// Hull cost plus every installation.
    pub total_cost: u64,
    pub breakdown: Vec<CategoryBreakdown>,
    pub armor: ArmorStats,
    pub power: PowerStats,
    pub engines: EngineStats,
    pub ftl: FtlStats,
    pub support: SupportStats,
    pub weapons: WeaponStats,
    pub ordnance: OrdnanceStats,
    pub defenses: DefenseStats,
    pub command: CommandStats,
    pub sensors: SensorStats,
    pub hangar: HangarStats,
}

pub fn calculate_design_stats(design: &ShipDesign) -> DesignStats {
    let ctx = design.context();
    let targets = design.link_targets();

    let armor = calculate_armor_stats(&design.armor, &ctx);
    let power = calculate_power_stats(&design.power_plants, &design.fuel_tanks, &ctx);
    let engines = calculate_engine_stats(&design.engines, &design.fuel_tanks, &ctx);
    let ftl = calculate_ftl_stats(&design.ftl_drives, &design.fuel_tanks, &ctx);
    let support = calculate_support_stats(design.support(), &ctx);
    let weapons = calculate_weapon_stats(&design.weapons, &ctx);
    let ordnance = calculate_ordnance_stats(&design.launch_systems, &ctx);
    let defenses = calculate_defense_stats(&design.defenses, &ctx);
    let command = calculate_command_stats(&design.command_control, &targets, &ctx);
    let sensors = calculate_sensor_stats(&design.sensors, &ctx);
    let hangar = calculate_hangar_stats(&design.hangar_misc, &ctx);

    let row = |category, hull_points, power, cost| CategoryBreakdown {
        category,
        hull_points,
        power,
        cost,
    };
    let breakdown = vec![
        row(BreakdownCategory::Armor, armor.hull_points, armor.power, armor.cost),
        row(BreakdownCategory::PowerPlants, power.hull_points, 0, power.cost),
        row(BreakdownCategory::Engines, engines.hull_points, engines.power, engines.cost),
        row(BreakdownCategory::Ftl, ftl.hull_points, ftl.power, ftl.cost),
        row(BreakdownCategory::Support, support.hull_points, support.power, support.cost),
        row(BreakdownCategory::Weapons, weapons.hull_points, weapons.power, weapons.cost),
        row(BreakdownCategory::Ordnance, ordnance.hull_points, ordnance.power, ordnance.cost),
        row(BreakdownCategory::Defenses, defenses.hull_points, defenses.power, defenses.cost),
        row(BreakdownCategory::CommandControl, command.hull_points, command.power, command.cost),
        row(BreakdownCategory::Sensors, sensors.hull_points, sensors.power, sensors.cost),
        row(BreakdownCategory::HangarMisc, hangar.hull_points, hangar.power, hangar.cost),
    ];

    let total_hull_points = design.hull.total_hull_points();
    let used_hull_points: u32 = breakdown.iter().map(|r| r.hull_points).sum();
    let power_consumed: u32 = breakdown
        .iter()
        .filter(|r| r.category != BreakdownCategory::Ftl)
        .map(|r| r.power)
        .sum();
    let total_cost = design.hull.cost + breakdown.iter().map(|r| r.cost).sum::<u64>();

    log::debug!(
        "Recalculated {}: {}/{} HP, {} PP generated, {} PP consumed",
        design.name,
        used_hull_points,
        total_hull_points,
        power.power_generated,
        power_consumed
    );

    DesignStats {
        total_hull_points,
        used_hull_points,
        remaining_hull_points: total_hull_points as i64 - used_hull_points as i64,
        power_generated: power.power_generated,
        power_consumed,
        ftl_power: ftl.power,
        power_balance: power.power_generated as i64 - power_consumed as i64,
        total_cost,
        breakdown,
        armor,
        power,
        engines,
        ftl,
        support,
        weapons,
        ordnance,
        defenses,
        command,
        sensors,
        hangar,
    }
}
