//! Power plants and fuel tanks.
//!
//! Power plants are sized by allocating hull points directly; they generate
//! `power_generated_per_hull_point * allocated_hp`, rounded down. Fuel tanks
//! are shared by every fuel-burning category (plants, engines, FTL drives):
//! each tank names the consuming type it feeds and is costed by that type's
//! fuel requirement.

use serde::{Deserialize, Serialize};

use crate::catalog::{FuelRequirement, PowerPlantType, SizingStrategy};
use crate::ids::InstalledId;
use crate::sizing::{self, Footprint, ShipContext};

// ============================================================================
// POWER PLANTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledPowerPlant {
    pub id: InstalledId,
    pub plant_type: PowerPlantType,
    /// Hull points allocated to the plant.
    pub hull_points: u32,
}

impl InstalledPowerPlant {
    pub fn new(id: InstalledId, plant_type: &PowerPlantType, hull_points: u32) -> Self {
        Self {
            id,
            plant_type: plant_type.clone(),
            hull_points,
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(&self.plant_type.profile, ctx, self.hull_points, 0)
    }

    pub fn power_generated(&self) -> u32 {
        power_generated(&self.plant_type, self.hull_points)
    }

    /// Allocated below the type's minimum size.
    pub fn is_undersized(&self) -> bool {
        is_below_minimum(&self.plant_type.profile.sizing, self.hull_points)
    }
}

/// `floor(rate * allocated_hp)`.
pub fn power_generated(plant_type: &PowerPlantType, hull_points: u32) -> u32 {
    (hull_points as u64 * sizing::to_hundredths(plant_type.power_generated_per_hull_point) / 100)
        as u32
}

/// Whether an allocated-size system is below its minimum allocation.
pub fn is_below_minimum(sizing: &SizingStrategy, hull_points: u32) -> bool {
    match *sizing {
        SizingStrategy::Allocated { min_hull_points } => hull_points < min_hull_points,
        _ => false,
    }
}

// ============================================================================
// FUEL TANKS
// ============================================================================

/// Category of the system a fuel tank feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FuelConsumer {
    PowerPlant,
    Engine,
    Ftl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledFuelTank {
    pub id: InstalledId,
    pub consumer: FuelConsumer,
    /// Catalog id of the consuming type.
    pub consumer_type_id: String,
    pub fuel: FuelRequirement,
    pub hull_points: u32,
}

impl InstalledFuelTank {
    pub fn new(
        id: InstalledId,
        consumer: FuelConsumer,
        consumer_type_id: &str,
        fuel: FuelRequirement,
        hull_points: u32,
    ) -> Self {
        Self {
            id,
            consumer,
            consumer_type_id: consumer_type_id.to_string(),
            fuel,
            hull_points,
        }
    }

    pub fn cost(&self) -> u64 {
        self.fuel.cost_per_hull_point * self.hull_points as u64
    }

    pub fn endurance_days(&self) -> f64 {
        self.hull_points as f64 * self.fuel.days_per_hull_point
    }
}

/// Totals for the tanks feeding one consumer category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelStats {
    pub tanks: usize,
    pub hull_points: u32,
    pub cost: u64,
    /// Shortest endurance among the fed types, if any tank exists.
    pub endurance_days: Option<f64>,
}

pub fn calculate_fuel_stats(tanks: &[InstalledFuelTank], consumer: FuelConsumer) -> FuelStats {
    let mut stats = FuelStats::default();
    let mut by_type: Vec<(&str, f64)> = Vec::new();
    for tank in tanks.iter().filter(|t| t.consumer == consumer) {
        stats.tanks += 1;
        stats.hull_points += tank.hull_points;
        stats.cost += tank.cost();
        match by_type
            .iter_mut()
            .find(|(id, _)| *id == tank.consumer_type_id)
        {
            Some((_, days)) => *days += tank.endurance_days(),
            None => by_type.push((tank.consumer_type_id.as_str(), tank.endurance_days())),
        }
    }
    stats.endurance_days = by_type
        .iter()
        .map(|(_, days)| *days)
        .reduce(f64::min);
    stats
}

/// Tanks whose consuming type is not installed.
pub fn orphaned_fuel_tanks<'a>(
    tanks: &'a [InstalledFuelTank],
    consumer: FuelConsumer,
    installed_type_ids: &[&str],
) -> Vec<&'a InstalledFuelTank> {
    tanks
        .iter()
        .filter(|t| {
            t.consumer == consumer && !installed_type_ids.contains(&t.consumer_type_id.as_str())
        })
        .collect()
}

// ============================================================================
// STATS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerStats {
    pub hull_points: u32,
    pub power_generated: u32,
    pub cost: u64,
    pub plants: usize,
    pub undersized: Vec<InstalledId>,
    pub fuel: FuelStats,
}

pub fn calculate_power_stats(
    plants: &[InstalledPowerPlant],
    tanks: &[InstalledFuelTank],
    ctx: &ShipContext,
) -> PowerStats {
    let fuel = calculate_fuel_stats(tanks, FuelConsumer::PowerPlant);
    let mut stats = PowerStats {
        plants: plants.len(),
        hull_points: fuel.hull_points,
        cost: fuel.cost,
        fuel,
        ..Default::default()
    };
    for plant in plants {
        let fp = plant.footprint(ctx);
        stats.hull_points += fp.hull_points;
        stats.cost += fp.cost;
        stats.power_generated += plant.power_generated();
        if plant.is_undersized() {
            stats.undersized.push(plant.id.clone());
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CostModel, ShipClass, SystemProfile};

    fn fusion(rate: f64) -> PowerPlantType {
        PowerPlantType {
            profile: SystemProfile::fixed("fusion", "Fusion Plant", 0, 0, 0)
                .with_sizing(SizingStrategy::Allocated { min_hull_points: 2 })
                .with_cost(CostModel::PerSystemHullPoint {
                    base: 10_000,
                    per_hull_point: 5_000,
                }),
            power_generated_per_hull_point: rate,
            fuel: Some(FuelRequirement {
                cost_per_hull_point: 1_000,
                days_per_hull_point: 30.0,
            }),
        }
    }

    fn ctx() -> ShipContext {
        ShipContext {
            base_hull_points: 40,
            total_hull_points: 40,
            ship_class: ShipClass::Light,
        }
    }

    #[test]
    fn generation_rounds_down() {
        let plant = InstalledPowerPlant::new("pp-1".into(), &fusion(1.5), 5);
        assert_eq!(plant.power_generated(), 7);
        assert_eq!(plant.footprint(&ctx()).hull_points, 5);
        assert_eq!(plant.footprint(&ctx()).cost, 35_000);
        assert_eq!(plant.footprint(&ctx()).power, 0);
    }

    #[test]
    fn undersized_plants_are_flagged() {
        let plants = vec![
            InstalledPowerPlant::new("pp-1".into(), &fusion(2.0), 1),
            InstalledPowerPlant::new("pp-2".into(), &fusion(2.0), 4),
        ];
        let stats = calculate_power_stats(&plants, &[], &ctx());
        assert_eq!(stats.power_generated, 10);
        assert_eq!(stats.hull_points, 5);
        assert_eq!(stats.undersized, vec![InstalledId::new("pp-1")]);
    }

    #[test]
    fn fuel_tanks_are_counted_per_consumer() {
        let fuel = fusion(2.0).fuel.unwrap();
        let tanks = vec![
            InstalledFuelTank::new("tank-1".into(), FuelConsumer::PowerPlant, "fusion", fuel, 2),
            InstalledFuelTank::new("tank-2".into(), FuelConsumer::Engine, "ion", fuel, 3),
        ];
        let plants = vec![InstalledPowerPlant::new("pp-1".into(), &fusion(2.0), 4)];
        let stats = calculate_power_stats(&plants, &tanks, &ctx());
        assert_eq!(stats.hull_points, 6);
        assert_eq!(stats.fuel.cost, 2_000);
        assert_eq!(stats.fuel.endurance_days, Some(60.0));
        assert_eq!(stats.cost, 30_000 + 2_000);

        let orphans = orphaned_fuel_tanks(&tanks, FuelConsumer::Engine, &[]);
        assert_eq!(orphans.len(), 1);
        assert!(orphaned_fuel_tanks(&tanks, FuelConsumer::PowerPlant, &["fusion"]).is_empty());
    }

    #[test]
    fn no_tanks_means_no_endurance() {
        assert_eq!(calculate_fuel_stats(&[], FuelConsumer::Ftl).endurance_days, None);
    }
}
