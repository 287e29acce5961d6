//! Support systems: life support, accommodations, evacuation and artificial
//! gravity.
//!
//! Life support and evacuation are expandable: extra hull points buy extra
//! capacity (hull points of ship covered and people evacuated respectively).
//! Accommodations house a fixed number of people per unit, split by kind.

use serde::{Deserialize, Serialize};

use crate::catalog::{
    AccommodationKind, AccommodationType, EvacuationType, GravitySystemType, LifeSupportType,
};
use crate::ids::InstalledId;
use crate::sizing::{self, Footprint, ShipContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledLifeSupport {
    pub id: InstalledId,
    pub life_support_type: LifeSupportType,
    pub quantity: u32,
    #[serde(default)]
    pub extra_hull_points: u32,
}

impl InstalledLifeSupport {
    pub fn new(
        id: InstalledId,
        life_support_type: &LifeSupportType,
        quantity: u32,
        extra_hull_points: u32,
    ) -> Self {
        Self {
            id,
            life_support_type: life_support_type.clone(),
            quantity,
            extra_hull_points,
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(
            &self.life_support_type.profile,
            ctx,
            self.quantity,
            self.extra_hull_points,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledAccommodation {
    pub id: InstalledId,
    pub accommodation_type: AccommodationType,
    pub quantity: u32,
}

impl InstalledAccommodation {
    pub fn new(id: InstalledId, accommodation_type: &AccommodationType, quantity: u32) -> Self {
        Self {
            id,
            accommodation_type: accommodation_type.clone(),
            quantity,
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(&self.accommodation_type.profile, ctx, self.quantity, 0)
    }

    pub fn capacity(&self) -> u32 {
        self.accommodation_type.capacity * self.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledEvacuation {
    pub id: InstalledId,
    pub evacuation_type: EvacuationType,
    pub quantity: u32,
    #[serde(default)]
    pub extra_hull_points: u32,
}

impl InstalledEvacuation {
    pub fn new(
        id: InstalledId,
        evacuation_type: &EvacuationType,
        quantity: u32,
        extra_hull_points: u32,
    ) -> Self {
        Self {
            id,
            evacuation_type: evacuation_type.clone(),
            quantity,
            extra_hull_points,
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(
            &self.evacuation_type.profile,
            ctx,
            self.quantity,
            self.extra_hull_points,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledGravity {
    pub id: InstalledId,
    pub gravity_type: GravitySystemType,
}

impl InstalledGravity {
    pub fn new(id: InstalledId, gravity_type: &GravitySystemType) -> Self {
        Self {
            id,
            gravity_type: gravity_type.clone(),
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(&self.gravity_type.profile, ctx, 1, 0)
    }
}

/// Borrowed view of every support list on a design.
#[derive(Debug, Clone, Copy)]
pub struct SupportSystems<'a> {
    pub life_support: &'a [InstalledLifeSupport],
    pub accommodations: &'a [InstalledAccommodation],
    pub evacuation: &'a [InstalledEvacuation],
    pub gravity: &'a [InstalledGravity],
}

impl SupportSystems<'_> {
    pub fn is_empty(&self) -> bool {
        self.life_support.is_empty()
            && self.accommodations.is_empty()
            && self.evacuation.is_empty()
            && self.gravity.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportStats {
    pub hull_points: u32,
    pub power: u32,
    pub cost: u64,
    /// Hull points of ship the life support covers.
    pub life_support_coverage: u32,
    pub crew_capacity: u32,
    pub troop_capacity: u32,
    pub passenger_capacity: u32,
    pub suspended_capacity: u32,
    pub evacuation_capacity: u32,
    pub artificial_gravity: bool,
}

impl SupportStats {
    fn add(&mut self, fp: &Footprint) {
        self.hull_points += fp.hull_points;
        self.power += fp.power;
        self.cost += fp.cost;
    }
}

pub fn calculate_support_stats(systems: SupportSystems<'_>, ctx: &ShipContext) -> SupportStats {
    let mut stats = SupportStats::default();
    for unit in systems.life_support {
        let fp = unit.footprint(ctx);
        stats.add(&fp);
        stats.life_support_coverage += fp.capacity;
    }
    for unit in systems.accommodations {
        stats.add(&unit.footprint(ctx));
        let capacity = unit.capacity();
        match unit.accommodation_type.kind {
            AccommodationKind::Crew => stats.crew_capacity += capacity,
            AccommodationKind::Troop => stats.troop_capacity += capacity,
            AccommodationKind::Passenger => stats.passenger_capacity += capacity,
            AccommodationKind::Suspended => stats.suspended_capacity += capacity,
        }
    }
    for unit in systems.evacuation {
        let fp = unit.footprint(ctx);
        stats.add(&fp);
        stats.evacuation_capacity += fp.capacity;
    }
    for unit in systems.gravity {
        stats.add(&unit.footprint(ctx));
    }
    stats.artificial_gravity = !systems.gravity.is_empty();
    stats
}
