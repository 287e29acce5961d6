//! Defense systems: screens, countermeasures, point defense, damage control.
//!
//! Countermeasures are usually coverage-multiples sized: the quantity counts
//! full-coverage sets, not raw units.

use serde::{Deserialize, Serialize};

use crate::catalog::{DefenseKind, DefenseSystemType};
use crate::ids::InstalledId;
use crate::sizing::{self, Footprint, ShipContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledDefenseSystem {
    pub id: InstalledId,
    pub defense_type: DefenseSystemType,
    pub quantity: u32,
}

impl InstalledDefenseSystem {
    pub fn new(id: InstalledId, defense_type: &DefenseSystemType, quantity: u32) -> Self {
        Self {
            id,
            defense_type: defense_type.clone(),
            quantity,
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(&self.defense_type.profile, ctx, self.quantity, 0)
    }

    pub fn kind(&self) -> DefenseKind {
        self.defense_type.kind
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseStats {
    pub hull_points: u32,
    pub power: u32,
    pub cost: u64,
    /// Distinct screen types installed. Screens do not stack.
    pub screen_types: Vec<String>,
    pub countermeasure_sets: u32,
    pub point_defense_units: u32,
    pub damage_control_hull_points: u32,
}

pub fn calculate_defense_stats(
    defenses: &[InstalledDefenseSystem],
    ctx: &ShipContext,
) -> DefenseStats {
    let mut stats = DefenseStats::default();
    for defense in defenses {
        let fp = defense.footprint(ctx);
        stats.hull_points += fp.hull_points;
        stats.power += fp.power;
        stats.cost += fp.cost;
        match defense.kind() {
            DefenseKind::Screen => {
                let id = &defense.defense_type.profile.id;
                if !stats.screen_types.contains(id) {
                    stats.screen_types.push(id.clone());
                }
            }
            DefenseKind::Countermeasure => stats.countermeasure_sets += defense.quantity,
            DefenseKind::PointDefense => stats.point_defense_units += fp.units,
            DefenseKind::DamageControl => stats.damage_control_hull_points += fp.hull_points,
            DefenseKind::Other => {}
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CostModel, PowerModel, ShipClass, SizingStrategy, SystemProfile};

    fn defense(id: &str, kind: DefenseKind, profile: SystemProfile) -> DefenseSystemType {
        DefenseSystemType {
            profile: SystemProfile { id: id.into(), ..profile },
            kind,
            effect: String::new(),
        }
    }

    fn ctx() -> ShipContext {
        ShipContext {
            base_hull_points: 120,
            total_hull_points: 130,
            ship_class: ShipClass::Light,
        }
    }

    #[test]
    fn screen_costs_per_ship_hull_point() {
        let screen = defense(
            "deflector",
            DefenseKind::Screen,
            SystemProfile::fixed("", "Deflector", 0, 0, 0)
                .with_sizing(SizingStrategy::PercentageOfHull { percentage: 5.0 })
                .with_power(PowerModel::PerSystemHullPoint(1.0))
                .with_cost(CostModel::PerShipHullPoint { cost: 200 }),
        );
        let fp = InstalledDefenseSystem::new("def-1".into(), &screen, 1).footprint(&ctx());
        assert_eq!(fp.hull_points, 6);
        assert_eq!(fp.power, 6);
        assert_eq!(fp.cost, 24_000);
    }

    #[test]
    fn countermeasure_quantity_counts_sets() {
        let chaff = defense(
            "chaff",
            DefenseKind::Countermeasure,
            SystemProfile::fixed("", "Chaff", 0, 0, 250).with_sizing(
                SizingStrategy::CoverageMultiples {
                    hull_points_per_unit: 1,
                    coverage_per_unit: 50,
                },
            ),
        );
        let installed = InstalledDefenseSystem::new("def-1".into(), &chaff, 2);
        let fp = installed.footprint(&ctx());
        assert_eq!(fp.units, 6);
        assert_eq!(fp.hull_points, 6);
        assert_eq!(fp.cost, 1_500);

        let stats = calculate_defense_stats(&[installed], &ctx());
        assert_eq!(stats.countermeasure_sets, 2);
    }

    #[test]
    fn distinct_screens_are_listed_once() {
        let screen = defense(
            "deflector",
            DefenseKind::Screen,
            SystemProfile::fixed("", "Deflector", 2, 2, 5_000),
        );
        let other = defense(
            "reflective",
            DefenseKind::Screen,
            SystemProfile::fixed("", "Reflective Hull", 2, 0, 5_000),
        );
        let stats = calculate_defense_stats(
            &[
                InstalledDefenseSystem::new("def-1".into(), &screen, 1),
                InstalledDefenseSystem::new("def-2".into(), &screen, 1),
                InstalledDefenseSystem::new("def-3".into(), &other, 1),
            ],
            &ctx(),
        );
        assert_eq!(stats.screen_types, vec!["deflector".to_string(), "reflective".to_string()]);
        assert_eq!(stats.hull_points, 6);
    }
}
