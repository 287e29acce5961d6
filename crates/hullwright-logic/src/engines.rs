//! Engines: allocated hull points buy acceleration from a per-type table.

use serde::{Deserialize, Serialize};

use crate::catalog::EngineType;
use crate::ids::InstalledId;
use crate::power::{
    calculate_fuel_stats, is_below_minimum, FuelConsumer, FuelStats, InstalledFuelTank,
};
use crate::sizing::{self, Footprint, ShipContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledEngine {
    pub id: InstalledId,
    pub engine_type: EngineType,
    /// Hull points allocated to the engine.
    pub hull_points: u32,
}

impl InstalledEngine {
    pub fn new(id: InstalledId, engine_type: &EngineType, hull_points: u32) -> Self {
        Self {
            id,
            engine_type: engine_type.clone(),
            hull_points,
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(&self.engine_type.profile, ctx, self.hull_points, 0)
    }
}

/// Share of base hull points, in percent.
pub fn percent_of_hull(hull_points: u32, base_hull_points: u32) -> f64 {
    if base_hull_points == 0 {
        0.0
    } else {
        hull_points as f64 * 100.0 / base_hull_points as f64
    }
}

/// Acceleration of the highest table row the percentage reaches.
pub fn acceleration_for(engine_type: &EngineType, percent: f64) -> f64 {
    engine_type
        .acceleration_table
        .iter()
        .filter(|step| percent >= step.min_percent)
        .map(|step| step.acceleration)
        .fold(0.0, f64::max)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub hull_points: u32,
    pub power: u32,
    pub cost: u64,
    pub engines: usize,
    /// Engine hull points (without tanks) as a share of base hull points.
    pub percent_of_hull: f64,
    pub acceleration: f64,
    pub undersized: Vec<InstalledId>,
    pub fuel: FuelStats,
}

/// Engines of the same type pool their hull points before the table
/// lookup; the ship's acceleration is the best any type reaches.
pub fn calculate_engine_stats(
    engines: &[InstalledEngine],
    tanks: &[InstalledFuelTank],
    ctx: &ShipContext,
) -> EngineStats {
    let fuel = calculate_fuel_stats(tanks, FuelConsumer::Engine);
    let mut stats = EngineStats {
        engines: engines.len(),
        hull_points: fuel.hull_points,
        cost: fuel.cost,
        fuel,
        ..Default::default()
    };
    let mut pooled: Vec<(&EngineType, u32)> = Vec::new();
    let mut engine_hull_points = 0;
    for engine in engines {
        let fp = engine.footprint(ctx);
        stats.hull_points += fp.hull_points;
        stats.power += fp.power;
        stats.cost += fp.cost;
        engine_hull_points += fp.hull_points;
        if is_below_minimum(&engine.engine_type.profile.sizing, engine.hull_points) {
            stats.undersized.push(engine.id.clone());
        }
        match pooled
            .iter_mut()
            .find(|(t, _)| t.profile.id == engine.engine_type.profile.id)
        {
            Some((_, hp)) => *hp += fp.hull_points,
            None => pooled.push((&engine.engine_type, fp.hull_points)),
        }
    }
    stats.percent_of_hull = percent_of_hull(engine_hull_points, ctx.base_hull_points);
    stats.acceleration = pooled
        .iter()
        .map(|(t, hp)| acceleration_for(t, percent_of_hull(*hp, ctx.base_hull_points)))
        .fold(0.0, f64::max);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AccelerationStep, CostModel, PowerModel, ShipClass, SizingStrategy, SystemProfile,
    };

    fn ion() -> EngineType {
        EngineType {
            profile: SystemProfile::fixed("ion", "Ion Engine", 0, 0, 0)
                .with_sizing(SizingStrategy::Allocated { min_hull_points: 1 })
                .with_power(PowerModel::PerSystemHullPoint(0.5))
                .with_cost(CostModel::PerSystemHullPoint {
                    base: 0,
                    per_hull_point: 2_000,
                }),
            acceleration_table: vec![
                AccelerationStep {
                    min_percent: 10.0,
                    acceleration: 1.0,
                },
                AccelerationStep {
                    min_percent: 20.0,
                    acceleration: 2.0,
                },
                AccelerationStep {
                    min_percent: 30.0,
                    acceleration: 3.0,
                },
            ],
            fuel: None,
        }
    }

    fn ctx() -> ShipContext {
        ShipContext {
            base_hull_points: 20,
            total_hull_points: 20,
            ship_class: ShipClass::Light,
        }
    }

    #[test]
    fn engine_power_scales_with_its_own_size() {
        let engine = InstalledEngine::new("eng-1".into(), &ion(), 5);
        let fp = engine.footprint(&ctx());
        assert_eq!(fp.hull_points, 5);
        assert_eq!(fp.power, 3);
        assert_eq!(fp.cost, 10_000);
    }

    #[test]
    fn same_type_engines_pool_for_acceleration() {
        let engines = vec![
            InstalledEngine::new("eng-1".into(), &ion(), 2),
            InstalledEngine::new("eng-2".into(), &ion(), 2),
        ];
        let stats = calculate_engine_stats(&engines, &[], &ctx());
        assert_eq!(stats.percent_of_hull, 20.0);
        assert_eq!(stats.acceleration, 2.0);
        assert_eq!(stats.power, 2);
    }

    #[test]
    fn below_first_row_is_no_acceleration() {
        assert_eq!(acceleration_for(&ion(), 5.0), 0.0);
        assert_eq!(acceleration_for(&ion(), 35.0), 3.0);
        assert_eq!(percent_of_hull(3, 0), 0.0);
    }
}
