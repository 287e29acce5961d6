//! Hangars, docking clamps, cargo holds and other miscellaneous spaces.

use serde::{Deserialize, Serialize};

use crate::catalog::{HangarMiscKind, HangarMiscType, SizingStrategy};
use crate::ids::InstalledId;
use crate::sizing::{self, Footprint, ShipContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledHangarMisc {
    pub id: InstalledId,
    pub hangar_type: HangarMiscType,
    pub quantity: u32,
    #[serde(default)]
    pub extra_hull_points: u32,
}

impl InstalledHangarMisc {
    pub fn new(
        id: InstalledId,
        hangar_type: &HangarMiscType,
        quantity: u32,
        extra_hull_points: u32,
    ) -> Self {
        Self {
            id,
            hangar_type: hangar_type.clone(),
            quantity,
            extra_hull_points,
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(
            &self.hangar_type.profile,
            ctx,
            self.quantity,
            self.extra_hull_points,
        )
    }

    /// Expandable spaces report their sized capacity; the rest hold
    /// `capacity` per unit.
    pub fn capacity(&self, ctx: &ShipContext) -> u32 {
        match self.hangar_type.profile.sizing {
            SizingStrategy::Expandable { .. } => self.footprint(ctx).capacity,
            _ => self.hangar_type.capacity * self.quantity,
        }
    }

    pub fn is_allowed_for(&self, ctx: &ShipContext) -> bool {
        self.hangar_type
            .min_ship_class
            .map_or(true, |min| ctx.ship_class >= min)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HangarStats {
    pub hull_points: u32,
    pub power: u32,
    pub cost: u64,
    pub hangar_capacity: u32,
    pub docking_capacity: u32,
    pub cargo_capacity: u32,
    /// Spaces that need a larger ship class.
    pub illegal_for_class: Vec<InstalledId>,
}

pub fn calculate_hangar_stats(spaces: &[InstalledHangarMisc], ctx: &ShipContext) -> HangarStats {
    let mut stats = HangarStats::default();
    for space in spaces {
        let fp = space.footprint(ctx);
        stats.hull_points += fp.hull_points;
        stats.power += fp.power;
        stats.cost += fp.cost;
        let capacity = space.capacity(ctx);
        match space.hangar_type.kind {
            HangarMiscKind::Hangar => stats.hangar_capacity += capacity,
            HangarMiscKind::DockingClamp => stats.docking_capacity += capacity,
            HangarMiscKind::Cargo => stats.cargo_capacity += capacity,
            HangarMiscKind::Laboratory | HangarMiscKind::Medical | HangarMiscKind::Other => {}
        }
        if !space.is_allowed_for(ctx) {
            stats.illegal_for_class.push(space.id.clone());
        }
    }
    stats
}
