//! Launch systems and their ordnance loadouts.
//!
//! Launchers are expandable: extra hull points add magazine capacity. Each
//! loaded round uses `size` capacity and adds its own cost.

use serde::{Deserialize, Serialize};

use crate::catalog::{LaunchSystemType, OrdnanceType};
use crate::ids::{BatteryKey, InstalledId};
use crate::sizing::{self, Footprint, ShipContext};
use crate::weapons::WeaponBattery;
use crate::zones::FiringArc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedOrdnance {
    pub ordnance_type: OrdnanceType,
    pub quantity: u32,
}

impl LoadedOrdnance {
    pub fn capacity_used(&self) -> u32 {
        self.ordnance_type.size * self.quantity
    }

    pub fn cost(&self) -> u64 {
        self.ordnance_type.cost * self.quantity as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledLaunchSystem {
    pub id: InstalledId,
    pub launch_type: LaunchSystemType,
    pub quantity: u32,
    #[serde(default)]
    pub extra_hull_points: u32,
    #[serde(default)]
    pub arcs: Vec<FiringArc>,
    #[serde(default)]
    pub loadout: Vec<LoadedOrdnance>,
}

impl InstalledLaunchSystem {
    pub fn new(
        id: InstalledId,
        launch_type: &LaunchSystemType,
        quantity: u32,
        extra_hull_points: u32,
        arcs: &[FiringArc],
    ) -> Self {
        Self {
            id,
            launch_type: launch_type.clone(),
            quantity,
            extra_hull_points,
            arcs: arcs.to_vec(),
            loadout: Vec::new(),
        }
    }

    pub fn with_loadout(mut self, loadout: Vec<LoadedOrdnance>) -> Self {
        self.loadout = loadout;
        self
    }

    pub fn battery_key(&self) -> BatteryKey {
        launcher_battery_key(&self.launch_type.profile.id)
    }

    /// Launcher footprint; the cost includes the loaded ordnance.
    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        let mut fp = sizing::footprint(
            &self.launch_type.profile,
            ctx,
            self.quantity,
            self.extra_hull_points,
        );
        fp.cost += self.ordnance_cost();
        fp
    }

    pub fn ordnance_cost(&self) -> u64 {
        self.loadout.iter().map(LoadedOrdnance::cost).sum()
    }

    pub fn capacity_used(&self) -> u32 {
        self.loadout.iter().map(LoadedOrdnance::capacity_used).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.loadout.iter().all(|o| o.quantity == 0)
    }

    /// Loaded ordnance of a kind this launcher cannot fire.
    pub fn incompatible_ordnance(&self) -> Vec<&OrdnanceType> {
        self.loadout
            .iter()
            .filter(|o| !self.launch_type.ordnance_kinds.contains(&o.ordnance_type.kind))
            .map(|o| &o.ordnance_type)
            .collect()
    }
}

pub fn launcher_battery_key(type_id: &str) -> BatteryKey {
    BatteryKey::new(format!("{type_id}:launcher"))
}

/// Group launchers by type into batteries, ordered by key.
pub fn launcher_batteries(
    launchers: &[InstalledLaunchSystem],
    ctx: &ShipContext,
) -> Vec<WeaponBattery> {
    let mut batteries: Vec<WeaponBattery> = Vec::new();
    for launcher in launchers {
        let key = launcher.battery_key();
        let hull_points = launcher.footprint(ctx).hull_points;
        match batteries.iter_mut().find(|b| b.key == key) {
            Some(battery) => {
                battery.members.push(launcher.id.clone());
                battery.mounts += launcher.quantity;
                battery.hull_points += hull_points;
            }
            None => batteries.push(WeaponBattery {
                key,
                name: launcher.launch_type.profile.name.clone(),
                type_id: launcher.launch_type.profile.id.clone(),
                mount: None,
                firepower: launcher.launch_type.firepower,
                members: vec![launcher.id.clone()],
                mounts: launcher.quantity,
                hull_points,
            }),
        }
    }
    batteries.sort_by(|a, b| a.key.cmp(&b.key));
    batteries
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdnanceStats {
    pub hull_points: u32,
    pub power: u32,
    /// Launchers plus loaded ordnance.
    pub cost: u64,
    pub ordnance_cost: u64,
    pub capacity: u32,
    pub capacity_used: u32,
    pub launchers: u32,
    pub batteries: Vec<WeaponBattery>,
    pub empty_launchers: Vec<InstalledId>,
    pub over_capacity: Vec<InstalledId>,
    pub incompatible_ordnance: Vec<InstalledId>,
    pub without_arcs: Vec<InstalledId>,
}

pub fn calculate_ordnance_stats(
    launchers: &[InstalledLaunchSystem],
    ctx: &ShipContext,
) -> OrdnanceStats {
    let mut stats = OrdnanceStats {
        batteries: launcher_batteries(launchers, ctx),
        ..Default::default()
    };
    for launcher in launchers {
        let fp = launcher.footprint(ctx);
        let used = launcher.capacity_used();
        stats.hull_points += fp.hull_points;
        stats.power += fp.power;
        stats.cost += fp.cost;
        stats.ordnance_cost += launcher.ordnance_cost();
        stats.capacity += fp.capacity;
        stats.capacity_used += used;
        stats.launchers += launcher.quantity;
        if launcher.is_empty() {
            stats.empty_launchers.push(launcher.id.clone());
        }
        if used > fp.capacity {
            stats.over_capacity.push(launcher.id.clone());
        }
        if !launcher.incompatible_ordnance().is_empty() {
            stats.incompatible_ordnance.push(launcher.id.clone());
        }
        if launcher.arcs.is_empty() {
            stats.without_arcs.push(launcher.id.clone());
        }
    }
    stats
}
