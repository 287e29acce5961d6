//! Weapons and weapon batteries.
//!
//! A weapon's base size and cost come from its catalog profile; the mount
//! and gun configuration scale both by integer percentages, rounded up per
//! mount before multiplying by quantity. Power scales by gun count.
//!
//! Batteries are derived, never stored: weapons sharing type and mount form
//! one battery, which is what fire controls link to.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Firepower, GunConfiguration, MountType, WeaponType};
use crate::ids::{BatteryKey, InstalledId};
use crate::sizing::{self, Footprint, ShipContext};
use crate::zones::FiringArc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledWeapon {
    pub id: InstalledId,
    pub weapon_type: WeaponType,
    pub mount: MountType,
    #[serde(default)]
    pub gun_configuration: GunConfiguration,
    pub quantity: u32,
    #[serde(default)]
    pub arcs: Vec<FiringArc>,
}

impl InstalledWeapon {
    pub fn new(
        id: InstalledId,
        weapon_type: &WeaponType,
        mount: MountType,
        gun_configuration: GunConfiguration,
        quantity: u32,
        arcs: &[FiringArc],
    ) -> Self {
        Self {
            id,
            weapon_type: weapon_type.clone(),
            mount,
            gun_configuration,
            quantity,
            arcs: arcs.to_vec(),
        }
    }

    pub fn battery_key(&self) -> BatteryKey {
        weapon_battery_key(&self.weapon_type.profile.id, self.mount)
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        weapon_footprint(
            &self.weapon_type,
            self.mount,
            self.gun_configuration,
            self.quantity,
            ctx,
        )
    }

    /// Total guns across every mount.
    pub fn gun_count(&self) -> u32 {
        self.gun_configuration.guns().saturating_mul(self.quantity)
    }

    pub fn has_excess_arcs(&self) -> bool {
        self.arcs.len() > self.mount.max_arcs()
    }
}

pub fn weapon_battery_key(type_id: &str, mount: MountType) -> BatteryKey {
    BatteryKey::new(format!("{type_id}:{}", mount.key()))
}

/// `ceil(base * config% * mount% / 10000) * quantity` for hull points and
/// cost; `power * guns * quantity` for power.
pub fn weapon_footprint(
    weapon_type: &WeaponType,
    mount: MountType,
    gun_configuration: GunConfiguration,
    quantity: u32,
    ctx: &ShipContext,
) -> Footprint {
    let single = sizing::footprint(&weapon_type.profile, ctx, 1, 0);
    let hull_scale = gun_configuration.size_percent() * mount.hull_point_percent();
    let cost_scale = gun_configuration.size_percent() * mount.cost_percent();
    let hull_points_per_mount =
        sizing::ceil_div(single.hull_points as u64 * hull_scale, 10_000) as u32;
    let cost_per_mount = sizing::ceil_div(single.cost * cost_scale, 10_000);
    Footprint {
        units: quantity,
        hull_points: hull_points_per_mount.saturating_mul(quantity),
        power: single
            .power
            .saturating_mul(gun_configuration.guns())
            .saturating_mul(quantity),
        cost: cost_per_mount.saturating_mul(quantity as u64),
        capacity: 0,
    }
}

// ============================================================================
// BATTERIES
// ============================================================================

/// Weapons or launchers sharing type and mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponBattery {
    pub key: BatteryKey,
    pub name: String,
    pub type_id: String,
    /// `None` for launcher batteries.
    pub mount: Option<MountType>,
    pub firepower: Firepower,
    pub members: Vec<InstalledId>,
    pub mounts: u32,
    pub hull_points: u32,
}

/// Group weapons into batteries, ordered by key.
pub fn weapon_batteries(weapons: &[InstalledWeapon], ctx: &ShipContext) -> Vec<WeaponBattery> {
    let mut batteries: BTreeMap<BatteryKey, WeaponBattery> = BTreeMap::new();
    for weapon in weapons {
        let hull_points = weapon.footprint(ctx).hull_points;
        let battery = batteries
            .entry(weapon.battery_key())
            .or_insert_with(|| WeaponBattery {
                key: weapon.battery_key(),
                name: format!("{} ({})", weapon.weapon_type.profile.name, weapon.mount.key()),
                type_id: weapon.weapon_type.profile.id.clone(),
                mount: Some(weapon.mount),
                firepower: weapon.weapon_type.firepower,
                members: Vec::new(),
                mounts: 0,
                hull_points: 0,
            });
        battery.members.push(weapon.id.clone());
        battery.mounts += weapon.quantity;
        battery.hull_points += hull_points;
    }
    batteries.into_values().collect()
}

// ============================================================================
// STATS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponStats {
    pub hull_points: u32,
    pub power: u32,
    pub cost: u64,
    pub mounts: u32,
    pub guns: u32,
    pub batteries: Vec<WeaponBattery>,
    /// Weapons with no firing arc; they can never be placed in a zone.
    pub without_arcs: Vec<InstalledId>,
    /// Weapons with more arcs than their mount allows.
    pub excess_arcs: Vec<InstalledId>,
    /// Weapons on a mount their type does not allow.
    pub disallowed_mounts: Vec<InstalledId>,
}

pub fn calculate_weapon_stats(weapons: &[InstalledWeapon], ctx: &ShipContext) -> WeaponStats {
    let mut stats = WeaponStats {
        batteries: weapon_batteries(weapons, ctx),
        ..Default::default()
    };
    for weapon in weapons {
        let fp = weapon.footprint(ctx);
        stats.hull_points += fp.hull_points;
        stats.power += fp.power;
        stats.cost += fp.cost;
        stats.mounts += weapon.quantity;
        stats.guns += weapon.gun_count();
        if weapon.arcs.is_empty() {
            stats.without_arcs.push(weapon.id.clone());
        }
        if weapon.has_excess_arcs() {
            stats.excess_arcs.push(weapon.id.clone());
        }
        if !weapon.weapon_type.allows_mount(weapon.mount) {
            stats.disallowed_mounts.push(weapon.id.clone());
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ShipClass, SystemProfile};

    fn laser() -> WeaponType {
        WeaponType {
            profile: SystemProfile::fixed("laser", "Light Laser", 2, 1, 1_000),
            firepower: Firepower::Light,
            damage: "d4+1w".into(),
            range: "4/8/12".into(),
            accuracy: 0,
            allowed_mounts: vec![MountType::Standard, MountType::Turret, MountType::Fixed],
        }
    }

    fn ctx() -> ShipContext {
        ShipContext {
            base_hull_points: 60,
            total_hull_points: 60,
            ship_class: ShipClass::Light,
        }
    }

    #[test]
    fn mount_and_configuration_scale_with_upward_rounding() {
        // 2 HP * 150% * 125% = 3.75 -> 4 per mount.
        let fp = weapon_footprint(
            &laser(),
            MountType::Turret,
            GunConfiguration::Twin,
            2,
            &ctx(),
        );
        assert_eq!(fp.hull_points, 8);
        assert_eq!(fp.cost, 2 * 1_875);
        assert_eq!(fp.power, 4);

        // 2 HP * 100% * 75% = 1.5 -> 2.
        let fixed =
            weapon_footprint(&laser(), MountType::Fixed, GunConfiguration::Single, 1, &ctx());
        assert_eq!(fixed.hull_points, 2);
        assert_eq!(fixed.cost, 750);
    }

    #[test]
    fn batteries_group_by_type_and_mount() {
        let weapons = vec![
            InstalledWeapon::new(
                "w-1".into(),
                &laser(),
                MountType::Turret,
                GunConfiguration::Single,
                1,
                &[FiringArc::Forward],
            ),
            InstalledWeapon::new(
                "w-2".into(),
                &laser(),
                MountType::Turret,
                GunConfiguration::Twin,
                1,
                &[FiringArc::Aft],
            ),
            InstalledWeapon::new(
                "w-3".into(),
                &laser(),
                MountType::Standard,
                GunConfiguration::Single,
                2,
                &[FiringArc::Port],
            ),
        ];
        let batteries = weapon_batteries(&weapons, &ctx());
        assert_eq!(batteries.len(), 2);
        let turret = batteries
            .iter()
            .find(|b| b.key == BatteryKey::new("laser:turret"))
            .unwrap();
        assert_eq!(turret.members.len(), 2);
        assert_eq!(turret.mounts, 2);
        assert_eq!(turret.hull_points, 3 + 4);
    }

    #[test]
    fn stats_flag_arc_and_mount_problems() {
        let weapons = vec![
            InstalledWeapon::new(
                "w-1".into(),
                &laser(),
                MountType::Fixed,
                GunConfiguration::Single,
                1,
                &[],
            ),
            InstalledWeapon::new(
                "w-2".into(),
                &laser(),
                MountType::Standard,
                GunConfiguration::Single,
                1,
                &[FiringArc::Forward, FiringArc::Port],
            ),
            InstalledWeapon::new(
                "w-3".into(),
                &laser(),
                MountType::Sponson,
                GunConfiguration::Single,
                1,
                &[FiringArc::Port],
            ),
        ];
        let stats = calculate_weapon_stats(&weapons, &ctx());
        assert_eq!(stats.without_arcs, vec![InstalledId::new("w-1")]);
        assert_eq!(stats.excess_arcs, vec![InstalledId::new("w-2")]);
        assert_eq!(stats.disallowed_mounts, vec![InstalledId::new("w-3")]);
        assert_eq!(stats.mounts, 3);
        assert_eq!(stats.guns, 3);
    }
}
