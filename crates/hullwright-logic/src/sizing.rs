//! Sizing, power and cost formulas shared by every subsystem calculator.
//!
//! All arithmetic is integer. Percentages and per-hull-point rates are
//! carried as hundredths so that `77 HP × 5%` is exactly `3.85 → 4` and never
//! drifts with float rounding.

use serde::{Deserialize, Serialize};

use crate::catalog::{CostModel, Hull, PowerModel, ShipClass, SizingStrategy, SystemProfile};

/// The hull-derived values every calculator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipContext {
    /// Base hull points. Percentage and coverage formulas use only this.
    pub base_hull_points: u32,
    /// Base plus bonus hull points: the budget installations draw from.
    pub total_hull_points: u32,
    pub ship_class: ShipClass,
}

impl ShipContext {
    pub fn from_hull(hull: &Hull) -> Self {
        Self {
            base_hull_points: hull.hull_points,
            total_hull_points: hull.total_hull_points(),
            ship_class: hull.ship_class,
        }
    }
}

/// Everything one installation contributes, computed from its inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    /// Units actually installed (coverage multiples expand to full sets).
    pub units: u32,
    pub hull_points: u32,
    pub power: u32,
    pub cost: u64,
    /// Capacity of expandable systems; zero for everything else.
    pub capacity: u32,
}

/// Integer ceiling division. Division by zero yields zero.
pub fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        0
    } else {
        numerator.div_ceil(denominator)
    }
}

/// A non-negative decimal rate as integer hundredths.
pub fn to_hundredths(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value * 100.0).round() as u64
    } else {
        0
    }
}

/// `ceil(base_hull_points * percentage / 100)`. Always rounds up.
pub fn percentage_of_hull(base_hull_points: u32, percentage: f64) -> u32 {
    ceil_div(base_hull_points as u64 * to_hundredths(percentage), 10_000) as u32
}

/// `base + ceil(ship_hull_points / coverage)`, clamped to `max` when given.
pub fn coverage_hull_points(
    base_hull_points: u32,
    ship_hull_points: u32,
    coverage_per_hull_point: u32,
    max_hull_points: Option<u32>,
) -> u32 {
    let hull_points = base_hull_points
        + ceil_div(ship_hull_points as u64, coverage_per_hull_point as u64) as u32;
    max_hull_points.map_or(hull_points, |max| hull_points.min(max))
}

/// Units needed to cover the whole hull once.
pub fn units_for_full_coverage(ship_hull_points: u32, coverage_per_unit: u32) -> u32 {
    ceil_div(ship_hull_points as u64, coverage_per_unit as u64) as u32
}

/// Units actually installed for `quantity`. For coverage multiples the
/// quantity counts full-coverage sets.
pub fn effective_units(sizing: &SizingStrategy, ship_hull_points: u32, quantity: u32) -> u32 {
    match *sizing {
        SizingStrategy::CoverageMultiples {
            coverage_per_unit, ..
        } => quantity.saturating_mul(units_for_full_coverage(ship_hull_points, coverage_per_unit)),
        _ => quantity,
    }
}

/// Hull points of one installation.
pub fn hull_points(
    sizing: &SizingStrategy,
    ship_hull_points: u32,
    quantity: u32,
    extra_hull_points: u32,
) -> u32 {
    match *sizing {
        SizingStrategy::FixedPerUnit { hull_points } => hull_points.saturating_mul(quantity),
        SizingStrategy::PercentageOfHull { percentage } => {
            percentage_of_hull(ship_hull_points, percentage).saturating_mul(quantity)
        }
        SizingStrategy::CoverageBased {
            base_hull_points,
            coverage_per_hull_point,
            max_hull_points,
        } => {
            coverage_hull_points(
                base_hull_points,
                ship_hull_points,
                coverage_per_hull_point,
                max_hull_points,
            )
            .saturating_mul(quantity)
        }
        SizingStrategy::CoverageMultiples {
            hull_points_per_unit,
            ..
        } => {
            hull_points_per_unit.saturating_mul(effective_units(sizing, ship_hull_points, quantity))
        }
        SizingStrategy::Expandable {
            base_hull_points, ..
        } => base_hull_points
            .saturating_mul(quantity)
            .saturating_add(extra_hull_points),
        SizingStrategy::Allocated { .. } => quantity,
    }
}

/// Capacity of an expandable installation: `base * quantity + extra * per_extra`.
pub fn capacity(sizing: &SizingStrategy, quantity: u32, extra_hull_points: u32) -> u32 {
    match *sizing {
        SizingStrategy::Expandable {
            base_capacity,
            capacity_per_extra_hp,
            ..
        } => base_capacity
            .saturating_mul(quantity)
            .saturating_add(extra_hull_points.saturating_mul(capacity_per_extra_hp)),
        _ => 0,
    }
}

/// Power drawn. Per-hull-point models use the installation's own hull
/// points, never the ship's.
pub fn power_required(model: &PowerModel, units: u32, system_hull_points: u32) -> u32 {
    match *model {
        PowerModel::None => 0,
        PowerModel::PerUnit(required) => required.saturating_mul(units),
        PowerModel::PerSystemHullPoint(rate) => {
            ceil_div(system_hull_points as u64 * to_hundredths(rate), 100) as u32
        }
    }
}

/// Cost of one installation, including expansion cost for expandable sizing.
pub fn cost(
    model: &CostModel,
    sizing: &SizingStrategy,
    ship_hull_points: u32,
    units: u32,
    system_hull_points: u32,
    extra_hull_points: u32,
) -> u64 {
    if units == 0 && system_hull_points == 0 {
        return 0;
    }
    let base = match *model {
        CostModel::PerUnit { cost } => cost * units as u64,
        CostModel::PerSystemHullPoint {
            base,
            per_hull_point,
        } => base + per_hull_point * system_hull_points as u64,
        CostModel::PerShipHullPoint { cost } => cost * ship_hull_points as u64 * units as u64,
    };
    let expansion = match *sizing {
        SizingStrategy::Expandable {
            expansion_cost_per_hp,
            ..
        } => expansion_cost_per_hp * extra_hull_points as u64,
        _ => 0,
    };
    base + expansion
}

/// Full footprint of `quantity` units (plus `extra_hull_points` for
/// expandable systems) of a profile on a ship.
pub fn footprint(
    profile: &SystemProfile,
    ctx: &ShipContext,
    quantity: u32,
    extra_hull_points: u32,
) -> Footprint {
    let ship_hp = ctx.base_hull_points;
    let units = effective_units(&profile.sizing, ship_hp, quantity);
    let extra = match profile.sizing {
        SizingStrategy::Expandable { .. } => extra_hull_points,
        _ => 0,
    };
    let hull_points = hull_points(&profile.sizing, ship_hp, quantity, extra);
    Footprint {
        units,
        hull_points,
        power: power_required(&profile.power, units, hull_points),
        cost: cost(&profile.cost, &profile.sizing, ship_hp, units, hull_points, extra),
        capacity: capacity(&profile.sizing, quantity, extra),
    }
}

/// Convert a legacy raw-unit count of a coverage-multiples system into a
/// number of full-coverage sets.
///
/// Approximate: the old format stored raw units, and any count of at least
/// one full set is assumed to be raw. A legacy count that was not an exact
/// multiple is truncated to whole sets.
pub fn legacy_coverage_sets(quantity: u32, units_per_full_set: u32) -> u32 {
    if units_per_full_set > 1 && quantity >= units_per_full_set {
        quantity / units_per_full_set
    } else {
        quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(base: u32, bonus: u32) -> ShipContext {
        ShipContext {
            base_hull_points: base,
            total_hull_points: base + bonus,
            ship_class: ShipClass::Light,
        }
    }

    #[test]
    fn percentage_rounds_up() {
        assert_eq!(percentage_of_hull(77, 5.0), 4);
        assert_eq!(percentage_of_hull(100, 5.0), 5);
        assert_eq!(percentage_of_hull(101, 5.0), 6);
        assert_eq!(percentage_of_hull(20, 2.5), 1);
        assert_eq!(percentage_of_hull(0, 10.0), 0);
    }

    #[test]
    fn percentage_ignores_bonus_hull_points() {
        let profile = SystemProfile::fixed("grav", "Grav", 0, 0, 0)
            .with_sizing(SizingStrategy::PercentageOfHull { percentage: 10.0 });
        let fp = footprint(&profile, &ctx(50, 50), 1, 0);
        assert_eq!(fp.hull_points, 5);
    }

    #[test]
    fn coverage_based_adds_base_and_clamps() {
        assert_eq!(coverage_hull_points(1, 400, 200, None), 3);
        assert_eq!(coverage_hull_points(1, 401, 200, None), 4);
        assert_eq!(coverage_hull_points(1, 4000, 200, Some(10)), 10);
    }

    #[test]
    fn coverage_multiples_scale_by_full_sets() {
        let profile = SystemProfile::fixed("chaff", "Chaff", 0, 1, 300).with_sizing(
            SizingStrategy::CoverageMultiples {
                hull_points_per_unit: 1,
                coverage_per_unit: 40,
            },
        );
        let one = footprint(&profile, &ctx(100, 0), 1, 0);
        assert_eq!(one.units, 3);
        assert_eq!(one.hull_points, 3);
        assert_eq!(one.power, 3);
        assert_eq!(one.cost, 900);

        let mut previous = Footprint::default();
        for quantity in 1..6 {
            let fp = footprint(&profile, &ctx(100, 0), quantity, 0);
            assert!(fp.hull_points >= previous.hull_points);
            assert!(fp.power >= previous.power);
            assert!(fp.cost >= previous.cost);
            assert_eq!(fp.hull_points, one.hull_points * quantity);
            assert_eq!(fp.power, one.power * quantity);
            assert_eq!(fp.cost, one.cost * quantity as u64);
            previous = fp;
        }
    }

    #[test]
    fn expandable_adds_extra_hull_points() {
        let profile = SystemProfile::fixed("pods", "Escape Pods", 0, 0, 1000).with_sizing(
            SizingStrategy::Expandable {
                base_hull_points: 2,
                base_capacity: 10,
                capacity_per_extra_hp: 6,
                expansion_cost_per_hp: 400,
            },
        );
        let fp = footprint(&profile, &ctx(100, 0), 2, 3);
        assert_eq!(fp.hull_points, 7);
        assert_eq!(fp.capacity, 38);
        assert_eq!(fp.cost, 2 * 1000 + 3 * 400);
    }

    #[test]
    fn extra_hull_points_ignored_for_fixed_sizing() {
        let profile = SystemProfile::fixed("l", "Laser", 2, 1, 100);
        let fp = footprint(&profile, &ctx(100, 0), 3, 9);
        assert_eq!(fp.hull_points, 6);
    }

    #[test]
    fn power_per_system_hull_point_uses_system_size() {
        assert_eq!(power_required(&PowerModel::PerSystemHullPoint(0.5), 1, 5), 3);
        assert_eq!(power_required(&PowerModel::PerSystemHullPoint(2.0), 1, 5), 10);
        assert_eq!(power_required(&PowerModel::PerUnit(3), 4, 99), 12);
        assert_eq!(power_required(&PowerModel::None, 4, 99), 0);
    }

    #[test]
    fn cost_models() {
        let fixed = SizingStrategy::FixedPerUnit { hull_points: 1 };
        assert_eq!(cost(&CostModel::PerUnit { cost: 50 }, &fixed, 100, 3, 3, 0), 150);
        assert_eq!(
            cost(
                &CostModel::PerSystemHullPoint {
                    base: 1000,
                    per_hull_point: 200
                },
                &fixed,
                100,
                1,
                5,
                0
            ),
            2000
        );
        assert_eq!(cost(&CostModel::PerShipHullPoint { cost: 10 }, &fixed, 80, 1, 4, 0), 800);
        assert_eq!(cost(&CostModel::PerUnit { cost: 50 }, &fixed, 100, 0, 0, 0), 0);
    }

    #[test]
    fn allocated_quantity_is_hull_points() {
        let profile = SystemProfile::fixed("pp", "Fusion", 0, 0, 0)
            .with_sizing(SizingStrategy::Allocated { min_hull_points: 2 })
            .with_cost(CostModel::PerSystemHullPoint {
                base: 5000,
                per_hull_point: 1000,
            });
        let fp = footprint(&profile, &ctx(40, 0), 6, 0);
        assert_eq!(fp.hull_points, 6);
        assert_eq!(fp.cost, 11_000);
    }

    #[test]
    fn legacy_migration_heuristic() {
        assert_eq!(legacy_coverage_sets(9, 3), 3);
        assert_eq!(legacy_coverage_sets(2, 3), 2);
        assert_eq!(legacy_coverage_sets(5, 1), 5);
        // Not an exact multiple: truncated, the heuristic is approximate.
        assert_eq!(legacy_coverage_sets(7, 3), 2);
    }

    #[test]
    fn footprint_is_deterministic() {
        let profile = SystemProfile::fixed("dc", "Damage Control", 0, 0, 0)
            .with_sizing(SizingStrategy::PercentageOfHull { percentage: 2.0 })
            .with_power(PowerModel::PerSystemHullPoint(1.0));
        let a = footprint(&profile, &ctx(77, 5), 1, 0);
        let b = footprint(&profile, &ctx(77, 5), 1, 0);
        assert_eq!(a, b);
        assert_eq!(a.hull_points, 2);
        assert_eq!(a.power, 2);
    }

    #[test]
    fn huge_quantities_saturate_instead_of_wrapping() {
        let fixed = SizingStrategy::FixedPerUnit { hull_points: 10 };
        assert_eq!(hull_points(&fixed, 100, u32::MAX, 0), u32::MAX);
        assert_eq!(power_required(&PowerModel::PerUnit(3), u32::MAX, 0), u32::MAX);
    }
}
