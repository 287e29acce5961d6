//! Reference data: hulls and component types for every subsystem category.
//!
//! A [`Catalog`] is an immutable snapshot built once (usually from JSON) and
//! passed explicitly into loads and queries. Calculators never look anything
//! up globally.
//!
//! Sizing, power and cost models are written in the JSON by field presence
//! (`hullPercentage`, `coveragePerHullPoint`, `coveragePerUnit`,
//! `baseCapacity`, `allocated`, plain `hullPoints`). They are resolved into
//! the closed enums [`SizingStrategy`], [`PowerModel`] and [`CostModel`] when
//! the catalog is parsed, so a malformed entry fails the load instead of
//! miscalculating later.
//!
//! ```
//! use hullwright_logic::catalog::{Catalog, filter_by_constraints};
//!
//! let catalog = Catalog::empty();
//! assert!(filter_by_constraints(&catalog.weapons, 7, &[]).is_empty());
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hit_location::HitLocationTable;

/// Ordinal technology era.
pub type ProgressLevel = u8;

// ============================================================================
// SHIP CLASS & HULL
// ============================================================================

/// Size class of a hull. Gates armor weights, hangar types and zone layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShipClass {
    SmallCraft,
    Light,
    Medium,
    Heavy,
    SuperHeavy,
}

impl ShipClass {
    pub fn all() -> &'static [ShipClass] {
        &[
            Self::SmallCraft,
            Self::Light,
            Self::Medium,
            Self::Heavy,
            Self::SuperHeavy,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SmallCraft => "Small Craft",
            Self::Light => "Light",
            Self::Medium => "Medium",
            Self::Heavy => "Heavy",
            Self::SuperHeavy => "Super-Heavy",
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Damage thresholds of a hull. Display/reference only, never recalculated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageTrack {
    pub stun: u32,
    pub wound: u32,
    pub mortal: u32,
    pub critical: u32,
}

/// A hull (chassis) entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hull {
    pub id: String,
    pub name: String,
    pub ship_class: ShipClass,
    /// Base hull points. Percentage-sized systems are computed from this only.
    pub hull_points: u32,
    /// Extra hull points usable by installations but ignored by percentage sizing.
    #[serde(default)]
    pub bonus_hull_points: u32,
    #[serde(default)]
    pub toughness: String,
    #[serde(default)]
    pub damage_track: DamageTrack,
    /// Crew the hull requires.
    pub crew: u32,
    pub cost: u64,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Hull {
    pub fn total_hull_points(&self) -> u32 {
        self.hull_points + self.bonus_hull_points
    }
}

// ============================================================================
// SIZING / POWER / COST MODELS
// ============================================================================

/// How a component's hull-point footprint scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SizingStrategy {
    /// `hull_points * quantity`.
    FixedPerUnit { hull_points: u32 },
    /// `ceil(base_hull_points * percentage / 100)` per unit.
    PercentageOfHull { percentage: f64 },
    /// `base + ceil(ship_hull_points / coverage)`, optionally capped.
    CoverageBased {
        base_hull_points: u32,
        coverage_per_hull_point: u32,
        max_hull_points: Option<u32>,
    },
    /// Quantity counts full-coverage sets of `ceil(ship_hull_points / coverage)` units.
    CoverageMultiples {
        hull_points_per_unit: u32,
        coverage_per_unit: u32,
    },
    /// `base * quantity + extra_hp`, capacity grows with the extra hull points.
    Expandable {
        base_hull_points: u32,
        base_capacity: u32,
        capacity_per_extra_hp: u32,
        expansion_cost_per_hp: u64,
    },
    /// Quantity is the number of hull points allocated directly.
    Allocated { min_hull_points: u32 },
}

/// How a component draws power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum PowerModel {
    None,
    /// Power points per installed unit.
    PerUnit(u32),
    /// Power points per hull point of the installation itself, rounded up.
    PerSystemHullPoint(f64),
}

/// How a component is priced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CostModel {
    PerUnit { cost: u64 },
    PerSystemHullPoint { base: u64, per_hull_point: u64 },
    PerShipHullPoint { cost: u64 },
}

/// Fields shared by every sized component type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSystemProfile", into = "RawSystemProfile")]
pub struct SystemProfile {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    pub tech_tracks: Vec<String>,
    pub sizing: SizingStrategy,
    pub power: PowerModel,
    pub cost: CostModel,
    pub description: String,
}

impl SystemProfile {
    /// Fixed-size profile with per-unit power and cost.
    pub fn fixed(id: &str, name: &str, hull_points: u32, power: u32, cost: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            progress_level: 6,
            tech_tracks: Vec::new(),
            sizing: SizingStrategy::FixedPerUnit { hull_points },
            power: if power == 0 {
                PowerModel::None
            } else {
                PowerModel::PerUnit(power)
            },
            cost: CostModel::PerUnit { cost },
            description: String::new(),
        }
    }

    pub fn with_sizing(mut self, sizing: SizingStrategy) -> Self {
        self.sizing = sizing;
        self
    }

    pub fn with_power(mut self, power: PowerModel) -> Self {
        self.power = power;
        self
    }

    pub fn with_cost(mut self, cost: CostModel) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_gate(mut self, progress_level: ProgressLevel, tech_tracks: &[&str]) -> Self {
        self.progress_level = progress_level;
        self.tech_tracks = tech_tracks.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// JSON form of [`SystemProfile`]: the strategy is implied by which fields exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSystemProfile {
    id: String,
    name: String,
    progress_level: ProgressLevel,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tech_tracks: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    hull_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hull_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coverage_per_hull_point: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_hull_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coverage_per_unit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    capacity_per_extra_hp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expansion_cost_per_hp: Option<u64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    allocated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_hull_points: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    power_required: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    power_per_hull_point: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    cost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_cost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cost_per_hull_point: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cost_per_ship_hull_point: Option<u64>,
}

impl RawSystemProfile {
    fn resolve_sizing(&self) -> Result<SizingStrategy> {
        let markers: Vec<&str> = [
            ("hullPercentage", self.hull_percentage.is_some()),
            ("coveragePerHullPoint", self.coverage_per_hull_point.is_some()),
            ("coveragePerUnit", self.coverage_per_unit.is_some()),
            ("baseCapacity", self.base_capacity.is_some()),
            ("allocated", self.allocated),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| name)
        .collect();

        if markers.len() > 1 {
            return Err(Error::AmbiguousSizing {
                id: self.id.clone(),
                fields: markers.join(", "),
            });
        }

        let invalid = |message: &str| Error::InvalidSizing {
            id: self.id.clone(),
            message: message.to_string(),
        };

        match markers.first().copied() {
            Some("hullPercentage") => {
                let percentage = self.hull_percentage.unwrap_or_default();
                if !percentage.is_finite() || percentage <= 0.0 {
                    return Err(invalid("hullPercentage must be a positive number"));
                }
                Ok(SizingStrategy::PercentageOfHull { percentage })
            }
            Some("coveragePerHullPoint") => {
                let coverage = self.coverage_per_hull_point.unwrap_or_default();
                if coverage == 0 {
                    return Err(invalid("coveragePerHullPoint must be non-zero"));
                }
                Ok(SizingStrategy::CoverageBased {
                    base_hull_points: self.hull_points.unwrap_or(0),
                    coverage_per_hull_point: coverage,
                    max_hull_points: self.max_hull_points,
                })
            }
            Some("coveragePerUnit") => {
                let coverage = self.coverage_per_unit.unwrap_or_default();
                if coverage == 0 {
                    return Err(invalid("coveragePerUnit must be non-zero"));
                }
                let hull_points_per_unit = self.hull_points.ok_or_else(|| {
                    invalid("coveragePerUnit requires hullPoints per unit")
                })?;
                Ok(SizingStrategy::CoverageMultiples {
                    hull_points_per_unit,
                    coverage_per_unit: coverage,
                })
            }
            Some("baseCapacity") => Ok(SizingStrategy::Expandable {
                base_hull_points: self.hull_points.unwrap_or(0),
                base_capacity: self.base_capacity.unwrap_or(0),
                capacity_per_extra_hp: self.capacity_per_extra_hp.unwrap_or(0),
                expansion_cost_per_hp: self.expansion_cost_per_hp.unwrap_or(0),
            }),
            Some(_) => Ok(SizingStrategy::Allocated {
                min_hull_points: self.min_hull_points.unwrap_or(1),
            }),
            None => match self.hull_points {
                Some(hull_points) => Ok(SizingStrategy::FixedPerUnit { hull_points }),
                None => Err(Error::MissingSizing {
                    id: self.id.clone(),
                }),
            },
        }
    }

    fn resolve_power(&self) -> Result<PowerModel> {
        match (self.power_required, self.power_per_hull_point) {
            (Some(_), Some(_)) => Err(Error::AmbiguousSizing {
                id: self.id.clone(),
                fields: "powerRequired, powerPerHullPoint".to_string(),
            }),
            (Some(0), None) | (None, None) => Ok(PowerModel::None),
            (Some(required), None) => Ok(PowerModel::PerUnit(required)),
            (None, Some(rate)) if rate.is_finite() && rate >= 0.0 => {
                Ok(PowerModel::PerSystemHullPoint(rate))
            }
            (None, Some(_)) => Err(Error::InvalidSizing {
                id: self.id.clone(),
                message: "powerPerHullPoint must be a non-negative number".to_string(),
            }),
        }
    }

    fn resolve_cost(&self) -> Result<CostModel> {
        let present = [
            self.cost.is_some(),
            self.cost_per_hull_point.is_some(),
            self.cost_per_ship_hull_point.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count();
        if present > 1 {
            return Err(Error::AmbiguousSizing {
                id: self.id.clone(),
                fields: "cost, costPerHullPoint, costPerShipHullPoint".to_string(),
            });
        }
        if let Some(cost) = self.cost_per_ship_hull_point {
            return Ok(CostModel::PerShipHullPoint { cost });
        }
        if let Some(per_hull_point) = self.cost_per_hull_point {
            return Ok(CostModel::PerSystemHullPoint {
                base: self.base_cost.unwrap_or(0),
                per_hull_point,
            });
        }
        Ok(CostModel::PerUnit {
            cost: self.cost.unwrap_or(0),
        })
    }
}

impl TryFrom<RawSystemProfile> for SystemProfile {
    type Error = Error;

    fn try_from(raw: RawSystemProfile) -> Result<Self> {
        let sizing = raw.resolve_sizing()?;
        let power = raw.resolve_power()?;
        let cost = raw.resolve_cost()?;
        Ok(Self {
            id: raw.id,
            name: raw.name,
            progress_level: raw.progress_level,
            tech_tracks: raw.tech_tracks,
            sizing,
            power,
            cost,
            description: raw.description,
        })
    }
}

impl From<SystemProfile> for RawSystemProfile {
    fn from(profile: SystemProfile) -> Self {
        let mut raw = RawSystemProfile {
            id: profile.id,
            name: profile.name,
            progress_level: profile.progress_level,
            tech_tracks: profile.tech_tracks,
            description: profile.description,
            ..Default::default()
        };
        match profile.sizing {
            SizingStrategy::FixedPerUnit { hull_points } => raw.hull_points = Some(hull_points),
            SizingStrategy::PercentageOfHull { percentage } => {
                raw.hull_percentage = Some(percentage)
            }
            SizingStrategy::CoverageBased {
                base_hull_points,
                coverage_per_hull_point,
                max_hull_points,
            } => {
                raw.hull_points = Some(base_hull_points);
                raw.coverage_per_hull_point = Some(coverage_per_hull_point);
                raw.max_hull_points = max_hull_points;
            }
            SizingStrategy::CoverageMultiples {
                hull_points_per_unit,
                coverage_per_unit,
            } => {
                raw.hull_points = Some(hull_points_per_unit);
                raw.coverage_per_unit = Some(coverage_per_unit);
            }
            SizingStrategy::Expandable {
                base_hull_points,
                base_capacity,
                capacity_per_extra_hp,
                expansion_cost_per_hp,
            } => {
                raw.hull_points = Some(base_hull_points);
                raw.base_capacity = Some(base_capacity);
                raw.capacity_per_extra_hp = Some(capacity_per_extra_hp);
                raw.expansion_cost_per_hp = Some(expansion_cost_per_hp);
            }
            SizingStrategy::Allocated { min_hull_points } => {
                raw.allocated = true;
                raw.min_hull_points = Some(min_hull_points);
            }
        }
        match profile.power {
            PowerModel::None => {}
            PowerModel::PerUnit(required) => raw.power_required = Some(required),
            PowerModel::PerSystemHullPoint(rate) => raw.power_per_hull_point = Some(rate),
        }
        match profile.cost {
            CostModel::PerUnit { cost } => raw.cost = Some(cost),
            CostModel::PerSystemHullPoint {
                base,
                per_hull_point,
            } => {
                raw.base_cost = (base > 0).then_some(base);
                raw.cost_per_hull_point = Some(per_hull_point);
            }
            CostModel::PerShipHullPoint { cost } => raw.cost_per_ship_hull_point = Some(cost),
        }
        raw
    }
}

// ============================================================================
// CATEGORY TYPES
// ============================================================================

/// Armor weight; heavier armor needs a larger hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArmorWeight {
    Light,
    Medium,
    Heavy,
    SuperHeavy,
}

impl ArmorWeight {
    pub fn min_ship_class(&self) -> ShipClass {
        match self {
            Self::Light => ShipClass::SmallCraft,
            Self::Medium => ShipClass::Light,
            Self::Heavy => ShipClass::Medium,
            Self::SuperHeavy => ShipClass::Heavy,
        }
    }
}

/// Armor protection ratings by damage type, as die expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protection {
    pub low_impact: String,
    pub high_impact: String,
    pub energy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorType {
    #[serde(flatten)]
    pub profile: SystemProfile,
    pub weight: ArmorWeight,
    #[serde(default)]
    pub protection: Protection,
}

/// Fuel a consuming system needs, bought as tank hull points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRequirement {
    pub cost_per_hull_point: u64,
    /// Days of operation each tank hull point buys.
    pub days_per_hull_point: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerPlantType {
    #[serde(flatten)]
    pub profile: SystemProfile,
    /// Power points generated per allocated hull point.
    pub power_generated_per_hull_point: f64,
    #[serde(default)]
    pub fuel: Option<FuelRequirement>,
}

/// One row of an engine's performance table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccelerationStep {
    /// Minimum share of base hull points (percent) devoted to the engine.
    pub min_percent: f64,
    pub acceleration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineType {
    #[serde(flatten)]
    pub profile: SystemProfile,
    #[serde(default)]
    pub acceleration_table: Vec<AccelerationStep>,
    #[serde(default)]
    pub fuel: Option<FuelRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FtlDriveType {
    #[serde(flatten)]
    pub profile: SystemProfile,
    /// Light-years per jump (or drive-specific rating).
    pub rating: f64,
    /// Smallest share of base hull points (percent) for an allocated drive to work.
    #[serde(default)]
    pub min_percent_of_hull: Option<f64>,
    #[serde(default)]
    pub fuel: Option<FuelRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeSupportType {
    /// Expandable: capacity is hull points of ship covered.
    #[serde(flatten)]
    pub profile: SystemProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccommodationKind {
    Crew,
    Troop,
    Passenger,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationType {
    #[serde(flatten)]
    pub profile: SystemProfile,
    pub kind: AccommodationKind,
    /// People housed per unit.
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvacuationType {
    /// Expandable: capacity is people evacuated.
    #[serde(flatten)]
    pub profile: SystemProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GravitySystemType {
    #[serde(flatten)]
    pub profile: SystemProfile,
}

/// Weapon size class. The rank orders weapons lightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Firepower {
    Small,
    Light,
    Medium,
    Heavy,
    SuperHeavy,
}

impl Firepower {
    pub fn rank(&self) -> u8 {
        match self {
            Self::Small => 1,
            Self::Light => 2,
            Self::Medium => 3,
            Self::Heavy => 4,
            Self::SuperHeavy => 5,
        }
    }
}

/// How a weapon is mounted on the hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MountType {
    Standard,
    Fixed,
    Turret,
    Sponson,
    Bank,
}

impl MountType {
    pub fn all() -> &'static [MountType] {
        &[
            Self::Standard,
            Self::Fixed,
            Self::Turret,
            Self::Sponson,
            Self::Bank,
        ]
    }

    /// Hull-point multiplier in percent.
    pub fn hull_point_percent(&self) -> u64 {
        match self {
            Self::Standard | Self::Bank => 100,
            Self::Fixed => 75,
            Self::Turret | Self::Sponson => 125,
        }
    }

    /// Cost multiplier in percent.
    pub fn cost_percent(&self) -> u64 {
        match self {
            Self::Standard => 100,
            Self::Fixed => 75,
            Self::Turret => 125,
            Self::Sponson => 110,
            Self::Bank => 90,
        }
    }

    /// Firing arcs the mount can cover.
    pub fn max_arcs(&self) -> usize {
        match self {
            Self::Fixed | Self::Standard | Self::Bank => 1,
            Self::Sponson => 2,
            Self::Turret => 3,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Fixed => "fixed",
            Self::Turret => "turret",
            Self::Sponson => "sponson",
            Self::Bank => "bank",
        }
    }
}

/// Guns sharing one mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GunConfiguration {
    #[default]
    Single,
    Twin,
    Triple,
    Quad,
}

impl GunConfiguration {
    pub fn guns(&self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Twin => 2,
            Self::Triple => 3,
            Self::Quad => 4,
        }
    }

    /// Hull-point and cost multiplier in percent.
    pub fn size_percent(&self) -> u64 {
        match self {
            Self::Single => 100,
            Self::Twin => 150,
            Self::Triple => 200,
            Self::Quad => 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponType {
    #[serde(flatten)]
    pub profile: SystemProfile,
    pub firepower: Firepower,
    #[serde(default)]
    pub damage: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub accuracy: i8,
    /// Mounts this weapon may use; empty means any.
    #[serde(default)]
    pub allowed_mounts: Vec<MountType>,
}

impl WeaponType {
    pub fn allows_mount(&self, mount: MountType) -> bool {
        self.allowed_mounts.is_empty() || self.allowed_mounts.contains(&mount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrdnanceKind {
    Missile,
    Torpedo,
    Bomb,
    Mine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSystemType {
    /// Expandable: capacity is ordnance capacity units.
    #[serde(flatten)]
    pub profile: SystemProfile,
    pub ordnance_kinds: Vec<OrdnanceKind>,
    #[serde(default = "default_rate_of_fire")]
    pub rate_of_fire: u8,
    #[serde(default = "default_launcher_firepower")]
    pub firepower: Firepower,
}

fn default_rate_of_fire() -> u8 {
    1
}

fn default_launcher_firepower() -> Firepower {
    Firepower::Medium
}

/// A round of ordnance that launch systems carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdnanceType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<String>,
    pub kind: OrdnanceKind,
    /// Launcher capacity units one round occupies.
    pub size: u32,
    pub cost: u64,
    #[serde(default)]
    pub damage: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefenseKind {
    Screen,
    Countermeasure,
    PointDefense,
    DamageControl,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseSystemType {
    #[serde(flatten)]
    pub profile: SystemProfile,
    pub kind: DefenseKind,
    #[serde(default)]
    pub effect: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKind {
    Cockpit,
    CommandDeck,
    ComputerCore,
    FireControl,
    SensorControl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandControlType {
    #[serde(flatten)]
    pub profile: SystemProfile,
    pub kind: ControlKind,
    /// Cost per hull point of the linked battery or sensor (fire/sensor controls).
    #[serde(default)]
    pub linked_cost_per_hull_point: u64,
    #[serde(default)]
    pub control_bonus: i8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorKind {
    Active,
    Passive,
    Communications,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorType {
    #[serde(flatten)]
    pub profile: SystemProfile,
    pub kind: SensorKind,
    #[serde(default)]
    pub range: String,
    /// Contacts tracked per unit.
    #[serde(default)]
    pub tracking: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HangarMiscKind {
    Hangar,
    DockingClamp,
    Cargo,
    Laboratory,
    Medical,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HangarMiscType {
    #[serde(flatten)]
    pub profile: SystemProfile,
    pub kind: HangarMiscKind,
    /// Capacity per unit (craft hull points, cargo tons...). Expandable types use their sizing capacity.
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub min_ship_class: Option<ShipClass>,
}

// ============================================================================
// CATALOG ENTRY TRAIT & CONSTRAINT FILTER
// ============================================================================

/// Anything listed in the catalog: identified and gated by progress level
/// and tech tracks.
pub trait CatalogEntry {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn progress_level(&self) -> ProgressLevel;
    fn tech_tracks(&self) -> &[String];
}

macro_rules! profile_entry {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CatalogEntry for $ty {
                fn id(&self) -> &str {
                    &self.profile.id
                }
                fn name(&self) -> &str {
                    &self.profile.name
                }
                fn progress_level(&self) -> ProgressLevel {
                    self.profile.progress_level
                }
                fn tech_tracks(&self) -> &[String] {
                    &self.profile.tech_tracks
                }
            }
        )*
    };
}

profile_entry!(
    ArmorType,
    PowerPlantType,
    EngineType,
    FtlDriveType,
    LifeSupportType,
    AccommodationType,
    EvacuationType,
    GravitySystemType,
    WeaponType,
    LaunchSystemType,
    DefenseSystemType,
    CommandControlType,
    SensorType,
    HangarMiscType,
);

impl CatalogEntry for Hull {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn progress_level(&self) -> ProgressLevel {
        self.progress_level
    }
    fn tech_tracks(&self) -> &[String] {
        &self.tech_tracks
    }
}

impl CatalogEntry for OrdnanceType {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn progress_level(&self) -> ProgressLevel {
        self.progress_level
    }
    fn tech_tracks(&self) -> &[String] {
        &self.tech_tracks
    }
}

/// Whether an entry is available under a progress-level ceiling and a set
/// of allowed tech tracks. An empty track list on either side means
/// "unrestricted".
pub fn is_available<T: CatalogEntry + ?Sized>(
    item: &T,
    ceiling: ProgressLevel,
    allowed_tracks: &[String],
) -> bool {
    if item.progress_level() > ceiling {
        return false;
    }
    let tracks = item.tech_tracks();
    tracks.is_empty()
        || allowed_tracks.is_empty()
        || tracks.iter().any(|t| allowed_tracks.contains(t))
}

/// Subset of `items` available under the given constraints, in catalog order.
pub fn filter_by_constraints<'a, T: CatalogEntry>(
    items: &'a [T],
    ceiling: ProgressLevel,
    allowed_tracks: &[String],
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| is_available(*item, ceiling, allowed_tracks))
        .collect()
}

// ============================================================================
// CATALOG SNAPSHOT
// ============================================================================

/// Immutable snapshot of all reference data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Catalog {
    pub hulls: Vec<Hull>,
    pub armor: Vec<ArmorType>,
    pub power_plants: Vec<PowerPlantType>,
    pub engines: Vec<EngineType>,
    pub ftl_drives: Vec<FtlDriveType>,
    pub life_support: Vec<LifeSupportType>,
    pub accommodations: Vec<AccommodationType>,
    pub evacuation: Vec<EvacuationType>,
    pub gravity: Vec<GravitySystemType>,
    pub weapons: Vec<WeaponType>,
    pub launch_systems: Vec<LaunchSystemType>,
    pub ordnance: Vec<OrdnanceType>,
    pub defenses: Vec<DefenseSystemType>,
    pub command_control: Vec<CommandControlType>,
    pub sensors: Vec<SensorType>,
    pub hangar_misc: Vec<HangarMiscType>,
    pub hit_location_tables: Vec<HitLocationTable>,
}

fn find<'a, T: CatalogEntry>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

fn check_unique<T: CatalogEntry>(category: &'static str, items: &[T]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            return Err(Error::DuplicateTypeId {
                category,
                id: item.id().to_string(),
            });
        }
    }
    Ok(())
}

impl Catalog {
    /// A catalog with no entries. Every query on it returns nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse and check a catalog snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.check_unique_ids()?;
        log::info!(
            "Catalog loaded: {} hulls, {} weapons, {} defenses, {} hit-location tables",
            catalog.hulls.len(),
            catalog.weapons.len(),
            catalog.defenses.len(),
            catalog.hit_location_tables.len()
        );
        Ok(catalog)
    }

    /// Reject duplicate ids within any one category.
    pub fn check_unique_ids(&self) -> Result<()> {
        check_unique("hull", &self.hulls)?;
        check_unique("armor", &self.armor)?;
        check_unique("power plant", &self.power_plants)?;
        check_unique("engine", &self.engines)?;
        check_unique("FTL drive", &self.ftl_drives)?;
        check_unique("life support", &self.life_support)?;
        check_unique("accommodation", &self.accommodations)?;
        check_unique("evacuation", &self.evacuation)?;
        check_unique("gravity", &self.gravity)?;
        check_unique("weapon", &self.weapons)?;
        check_unique("launch system", &self.launch_systems)?;
        check_unique("ordnance", &self.ordnance)?;
        check_unique("defense", &self.defenses)?;
        check_unique("command & control", &self.command_control)?;
        check_unique("sensor", &self.sensors)?;
        check_unique("hangar/misc", &self.hangar_misc)?;
        Ok(())
    }

    pub fn hull(&self, id: &str) -> Option<&Hull> {
        find(&self.hulls, id)
    }
    pub fn armor_type(&self, id: &str) -> Option<&ArmorType> {
        find(&self.armor, id)
    }
    pub fn power_plant(&self, id: &str) -> Option<&PowerPlantType> {
        find(&self.power_plants, id)
    }
    pub fn engine(&self, id: &str) -> Option<&EngineType> {
        find(&self.engines, id)
    }
    pub fn ftl_drive(&self, id: &str) -> Option<&FtlDriveType> {
        find(&self.ftl_drives, id)
    }
    pub fn life_support_type(&self, id: &str) -> Option<&LifeSupportType> {
        find(&self.life_support, id)
    }
    pub fn accommodation(&self, id: &str) -> Option<&AccommodationType> {
        find(&self.accommodations, id)
    }
    pub fn evacuation_type(&self, id: &str) -> Option<&EvacuationType> {
        find(&self.evacuation, id)
    }
    pub fn gravity_type(&self, id: &str) -> Option<&GravitySystemType> {
        find(&self.gravity, id)
    }
    pub fn weapon(&self, id: &str) -> Option<&WeaponType> {
        find(&self.weapons, id)
    }
    pub fn launch_system(&self, id: &str) -> Option<&LaunchSystemType> {
        find(&self.launch_systems, id)
    }
    pub fn ordnance_type(&self, id: &str) -> Option<&OrdnanceType> {
        find(&self.ordnance, id)
    }
    pub fn defense(&self, id: &str) -> Option<&DefenseSystemType> {
        find(&self.defenses, id)
    }
    pub fn command_control_type(&self, id: &str) -> Option<&CommandControlType> {
        find(&self.command_control, id)
    }
    pub fn sensor(&self, id: &str) -> Option<&SensorType> {
        find(&self.sensors, id)
    }
    pub fn hangar_misc_type(&self, id: &str) -> Option<&HangarMiscType> {
        find(&self.hangar_misc, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gated(pl: u8, tracks: &[&str]) -> WeaponType {
        WeaponType {
            profile: SystemProfile::fixed("w", "W", 1, 1, 10).with_gate(pl, tracks),
            firepower: Firepower::Light,
            damage: String::new(),
            range: String::new(),
            accuracy: 0,
            allowed_mounts: Vec::new(),
        }
    }

    fn tracks(t: &[&str]) -> Vec<String> {
        t.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn filter_respects_progress_level_ceiling() {
        assert!(is_available(&gated(7, &[]), 7, &[]));
        assert!(!is_available(&gated(8, &[]), 7, &[]));
    }

    #[test]
    fn filter_tech_track_predicate() {
        // Untracked items are always allowed.
        assert!(is_available(&gated(6, &[]), 7, &tracks(&["G"])));
        // No allowed tracks means unrestricted.
        assert!(is_available(&gated(6, &["G"]), 7, &[]));
        // Intersection required otherwise.
        assert!(is_available(&gated(6, &["G", "A"]), 7, &tracks(&["A"])));
        assert!(!is_available(&gated(6, &["G"]), 7, &tracks(&["A"])));
    }

    #[test]
    fn filter_preserves_order() {
        let items = vec![gated(6, &[]), gated(9, &[]), gated(7, &[])];
        let out = filter_by_constraints(&items, 7, &[]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].profile.progress_level, 6);
        assert_eq!(out[1].profile.progress_level, 7);
    }

    #[test]
    fn field_presence_selects_sizing() {
        let json = r#"{"id":"a","name":"A","progressLevel":6,"weight":"light","hullPercentage":5,"costPerHullPoint":2000}"#;
        let armor: ArmorType = serde_json::from_str(json).unwrap();
        assert_eq!(
            armor.profile.sizing,
            SizingStrategy::PercentageOfHull { percentage: 5.0 }
        );
        assert_eq!(
            armor.profile.cost,
            CostModel::PerSystemHullPoint {
                base: 0,
                per_hull_point: 2000
            }
        );

        let json = r#"{"id":"d","name":"Deck","progressLevel":6,"kind":"commandDeck","hullPoints":1,"coveragePerHullPoint":200,"maxHullPoints":10,"cost":5000}"#;
        let deck: CommandControlType = serde_json::from_str(json).unwrap();
        assert_eq!(
            deck.profile.sizing,
            SizingStrategy::CoverageBased {
                base_hull_points: 1,
                coverage_per_hull_point: 200,
                max_hull_points: Some(10)
            }
        );
    }

    #[test]
    fn conflicting_markers_are_rejected() {
        let json = r#"{"id":"x","name":"X","progressLevel":6,"kind":"screen","hullPercentage":5,"coveragePerUnit":10,"hullPoints":1}"#;
        let err = serde_json::from_str::<DefenseSystemType>(json).unwrap_err();
        assert!(err.to_string().contains("conflicting sizing"), "{err}");
    }

    #[test]
    fn missing_sizing_is_rejected() {
        let json = r#"{"id":"x","name":"X","progressLevel":6,"kind":"active"}"#;
        let err = serde_json::from_str::<SensorType>(json).unwrap_err();
        assert!(err.to_string().contains("no sizing fields"), "{err}");
    }

    #[test]
    fn profile_round_trips_through_raw_form() {
        let profile = SystemProfile::fixed("cm", "Chaff", 1, 0, 500).with_sizing(
            SizingStrategy::CoverageMultiples {
                hull_points_per_unit: 1,
                coverage_per_unit: 40,
            },
        );
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("coveragePerUnit"));
        let back: SystemProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn duplicate_ids_fail_the_load() {
        let json = r#"{"hulls":[
            {"id":"h","name":"H","shipClass":"light","hullPoints":40,"crew":10,"cost":100,"progressLevel":6},
            {"id":"h","name":"H2","shipClass":"light","hullPoints":50,"crew":10,"cost":100,"progressLevel":6}
        ]}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, Error::DuplicateTypeId { category: "hull", .. }));
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = Catalog::from_json("{}").unwrap();
        assert!(catalog.hulls.is_empty());
        assert!(catalog.hull("anything").is_none());
        assert!(filter_by_constraints(&catalog.sensors, 9, &[]).is_empty());
    }

    #[test]
    fn heavier_armor_needs_bigger_hulls() {
        assert!(ArmorWeight::Light.min_ship_class() < ArmorWeight::Heavy.min_ship_class());
        assert_eq!(ArmorWeight::SuperHeavy.min_ship_class(), ShipClass::Heavy);
    }
}
