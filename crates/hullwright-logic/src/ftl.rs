//! FTL drives. Their power draw is intermittent and kept out of the
//! continuous power balance.

use serde::{Deserialize, Serialize};

use crate::catalog::FtlDriveType;
use crate::ids::InstalledId;
use crate::power::{
    calculate_fuel_stats, is_below_minimum, FuelConsumer, FuelStats, InstalledFuelTank,
};
use crate::sizing::{self, Footprint, ShipContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledFtlDrive {
    pub id: InstalledId,
    pub drive_type: FtlDriveType,
    /// Hull points allocated, or unit count for fixed-size drives.
    pub quantity: u32,
}

impl InstalledFtlDrive {
    pub fn new(id: InstalledId, drive_type: &FtlDriveType, quantity: u32) -> Self {
        Self {
            id,
            drive_type: drive_type.clone(),
            quantity,
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(&self.drive_type.profile, ctx, self.quantity, 0)
    }

    /// Smallest hull-point size at which the drive works on this hull.
    pub fn minimum_hull_points(&self, ctx: &ShipContext) -> u32 {
        self.drive_type
            .min_percent_of_hull
            .map_or(0, |pct| sizing::percentage_of_hull(ctx.base_hull_points, pct))
    }

    pub fn is_undersized(&self, ctx: &ShipContext) -> bool {
        is_below_minimum(&self.drive_type.profile.sizing, self.quantity)
            || self.footprint(ctx).hull_points < self.minimum_hull_points(ctx)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FtlStats {
    pub hull_points: u32,
    /// Drawn only while the drive is engaged.
    pub power: u32,
    pub cost: u64,
    pub drives: usize,
    /// Best rating among drives that meet their minimum size.
    pub rating: Option<f64>,
    pub undersized: Vec<InstalledId>,
    pub fuel: FuelStats,
}

pub fn calculate_ftl_stats(
    drives: &[InstalledFtlDrive],
    tanks: &[InstalledFuelTank],
    ctx: &ShipContext,
) -> FtlStats {
    let fuel = calculate_fuel_stats(tanks, FuelConsumer::Ftl);
    let mut stats = FtlStats {
        drives: drives.len(),
        hull_points: fuel.hull_points,
        cost: fuel.cost,
        fuel,
        ..Default::default()
    };
    for drive in drives {
        let fp = drive.footprint(ctx);
        stats.hull_points += fp.hull_points;
        stats.power += fp.power;
        stats.cost += fp.cost;
        if drive.is_undersized(ctx) {
            stats.undersized.push(drive.id.clone());
        } else {
            let rating = drive.drive_type.rating;
            stats.rating = Some(stats.rating.map_or(rating, |best| best.max(rating)));
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CostModel, PowerModel, ShipClass, SizingStrategy, SystemProfile};

    fn stardrive() -> FtlDriveType {
        FtlDriveType {
            profile: SystemProfile::fixed("stardrive", "Stardrive", 0, 0, 0)
                .with_sizing(SizingStrategy::Allocated { min_hull_points: 1 })
                .with_power(PowerModel::PerSystemHullPoint(1.0))
                .with_cost(CostModel::PerSystemHullPoint {
                    base: 0,
                    per_hull_point: 20_000,
                }),
            rating: 5.0,
            min_percent_of_hull: Some(10.0),
            fuel: None,
        }
    }

    fn ctx(base: u32) -> ShipContext {
        ShipContext {
            base_hull_points: base,
            total_hull_points: base,
            ship_class: ShipClass::Medium,
        }
    }

    #[test]
    fn drive_below_percentage_minimum_gives_no_rating() {
        let small = InstalledFtlDrive::new("ftl-1".into(), &stardrive(), 9);
        assert_eq!(small.minimum_hull_points(&ctx(95)), 10);
        let stats = calculate_ftl_stats(&[small], &[], &ctx(95));
        assert_eq!(stats.rating, None);
        assert_eq!(stats.undersized, vec![InstalledId::new("ftl-1")]);
        assert_eq!(stats.power, 9);
    }

    #[test]
    fn sufficient_drive_rates() {
        let drive = InstalledFtlDrive::new("ftl-1".into(), &stardrive(), 10);
        let stats = calculate_ftl_stats(&[drive], &[], &ctx(100));
        assert_eq!(stats.rating, Some(5.0));
        assert_eq!(stats.cost, 200_000);
        assert!(stats.undersized.is_empty());
    }
}
