//! Armor: percentage-of-hull plating.

use serde::{Deserialize, Serialize};

use crate::catalog::{ArmorType, ArmorWeight, Protection, ShipClass};
use crate::ids::InstalledId;
use crate::sizing::{self, Footprint, ShipContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledArmor {
    pub id: InstalledId,
    pub armor_type: ArmorType,
}

impl InstalledArmor {
    pub fn new(id: InstalledId, armor_type: &ArmorType) -> Self {
        Self {
            id,
            armor_type: armor_type.clone(),
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(&self.armor_type.profile, ctx, 1, 0)
    }

    pub fn hull_points(&self, ctx: &ShipContext) -> u32 {
        self.footprint(ctx).hull_points
    }

    pub fn cost(&self, ctx: &ShipContext) -> u64 {
        self.footprint(ctx).cost
    }
}

/// Whether armor of this weight may be fitted to a hull of this class.
pub fn is_armor_weight_allowed(weight: ArmorWeight, ship_class: ShipClass) -> bool {
    ship_class >= weight.min_ship_class()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorStats {
    pub hull_points: u32,
    pub power: u32,
    pub cost: u64,
    pub layers: usize,
    /// Protection of the heaviest installed layer.
    pub best_protection: Option<Protection>,
    /// Layers too heavy for the ship class.
    pub illegal_for_class: Vec<InstalledId>,
}

pub fn calculate_armor_stats(armor: &[InstalledArmor], ctx: &ShipContext) -> ArmorStats {
    let mut stats = ArmorStats {
        layers: armor.len(),
        ..Default::default()
    };
    for layer in armor {
        let fp = layer.footprint(ctx);
        stats.hull_points += fp.hull_points;
        stats.power += fp.power;
        stats.cost += fp.cost;
        if !is_armor_weight_allowed(layer.armor_type.weight, ctx.ship_class) {
            stats.illegal_for_class.push(layer.id.clone());
        }
    }
    stats.best_protection = armor
        .iter()
        .max_by_key(|layer| layer.armor_type.weight)
        .map(|layer| layer.armor_type.protection.clone());
    stats
}
