//! Command & control: cockpits, command decks, computer cores, and the
//! fire and sensor controls that link to batteries and sensors.
//!
//! A control's link is a lookup key, not ownership. It is resolved against
//! [`LinkTargets`] on every read: the linked cost follows the target's
//! current size, and a dangling key is reported as an orphan, never removed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{CommandControlType, ControlKind};
use crate::ids::{BatteryKey, InstalledId};
use crate::ordnance::{launcher_batteries, InstalledLaunchSystem};
use crate::sensors::InstalledSensor;
use crate::sizing::{self, Footprint, ShipContext};
use crate::weapons::{weapon_batteries, InstalledWeapon};

/// What a fire or sensor control is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "target")]
pub enum ControlLink {
    Battery(BatteryKey),
    Sensor(InstalledId),
}

/// Current hull points of everything a control can link to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTargets {
    pub batteries: BTreeMap<BatteryKey, u32>,
    pub sensors: BTreeMap<InstalledId, u32>,
}

impl LinkTargets {
    pub fn collect(
        weapons: &[InstalledWeapon],
        launchers: &[InstalledLaunchSystem],
        sensors: &[InstalledSensor],
        ctx: &ShipContext,
    ) -> Self {
        let batteries = weapon_batteries(weapons, ctx)
            .into_iter()
            .chain(launcher_batteries(launchers, ctx))
            .map(|b| (b.key, b.hull_points))
            .collect();
        let sensors = sensors
            .iter()
            .map(|s| (s.id.clone(), s.footprint(ctx).hull_points))
            .collect();
        Self { batteries, sensors }
    }

    /// Hull points of the linked target, if it exists.
    pub fn resolve(&self, link: &ControlLink) -> Option<u32> {
        match link {
            ControlLink::Battery(key) => self.batteries.get(key).copied(),
            ControlLink::Sensor(id) => self.sensors.get(id).copied(),
        }
    }
}

/// Resolution state of a control's link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkStatus {
    /// The control kind does not link.
    NotLinkable,
    Unlinked,
    Linked,
    /// The key names nothing that exists, or the wrong kind of target.
    Orphaned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledCommandControl {
    pub id: InstalledId,
    pub control_type: CommandControlType,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<ControlLink>,
}

impl InstalledCommandControl {
    pub fn new(id: InstalledId, control_type: &CommandControlType, quantity: u32) -> Self {
        Self {
            id,
            control_type: control_type.clone(),
            quantity,
            link: None,
        }
    }

    pub fn linked_to(mut self, link: ControlLink) -> Self {
        self.link = Some(link);
        self
    }

    pub fn kind(&self) -> ControlKind {
        self.control_type.kind
    }

    /// Own footprint, without any linked cost.
    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(&self.control_type.profile, ctx, self.quantity, 0)
    }

    pub fn link_status(&self, targets: &LinkTargets) -> LinkStatus {
        let expects_battery = match self.kind() {
            ControlKind::FireControl => true,
            ControlKind::SensorControl => false,
            _ => return LinkStatus::NotLinkable,
        };
        match &self.link {
            None => LinkStatus::Unlinked,
            Some(link @ ControlLink::Battery(_)) if expects_battery => {
                resolved_status(targets.resolve(link))
            }
            Some(link @ ControlLink::Sensor(_)) if !expects_battery => {
                resolved_status(targets.resolve(link))
            }
            Some(_) => LinkStatus::Orphaned,
        }
    }

    /// `linked_cost_per_hull_point * linked_hp`; zero when the link dangles.
    pub fn linked_cost(&self, targets: &LinkTargets) -> u64 {
        if self.link_status(targets) != LinkStatus::Linked {
            return 0;
        }
        let linked_hull_points = self
            .link
            .as_ref()
            .and_then(|link| targets.resolve(link))
            .unwrap_or(0);
        self.control_type.linked_cost_per_hull_point * linked_hull_points as u64
    }

    pub fn cost(&self, ctx: &ShipContext, targets: &LinkTargets) -> u64 {
        self.footprint(ctx).cost + self.linked_cost(targets)
    }
}

fn resolved_status(hull_points: Option<u32>) -> LinkStatus {
    match hull_points {
        Some(_) => LinkStatus::Linked,
        None => LinkStatus::Orphaned,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandStats {
    pub hull_points: u32,
    pub power: u32,
    /// Own cost plus linked cost.
    pub cost: u64,
    pub linked_cost: u64,
    pub has_cockpit: bool,
    pub has_command_deck: bool,
    pub has_computer_core: bool,
    pub fire_controls: Vec<InstalledId>,
    pub sensor_controls: Vec<InstalledId>,
    pub orphaned_fire_controls: Vec<InstalledId>,
    pub orphaned_sensor_controls: Vec<InstalledId>,
    pub unlinked_controls: Vec<InstalledId>,
    /// Battery keys some fire control resolves to.
    pub controlled_batteries: Vec<BatteryKey>,
}

pub fn calculate_command_stats(
    controls: &[InstalledCommandControl],
    targets: &LinkTargets,
    ctx: &ShipContext,
) -> CommandStats {
    let mut stats = CommandStats::default();
    for control in controls {
        let fp = control.footprint(ctx);
        let linked_cost = control.linked_cost(targets);
        stats.hull_points += fp.hull_points;
        stats.power += fp.power;
        stats.cost += fp.cost + linked_cost;
        stats.linked_cost += linked_cost;

        let status = control.link_status(targets);
        match control.kind() {
            ControlKind::Cockpit => stats.has_cockpit = true,
            ControlKind::CommandDeck => stats.has_command_deck = true,
            ControlKind::ComputerCore => stats.has_computer_core = true,
            ControlKind::FireControl => {
                stats.fire_controls.push(control.id.clone());
                if status == LinkStatus::Orphaned {
                    stats.orphaned_fire_controls.push(control.id.clone());
                }
                if let (LinkStatus::Linked, Some(ControlLink::Battery(key))) =
                    (status, &control.link)
                {
                    if !stats.controlled_batteries.contains(key) {
                        stats.controlled_batteries.push(key.clone());
                    }
                }
            }
            ControlKind::SensorControl => {
                stats.sensor_controls.push(control.id.clone());
                if status == LinkStatus::Orphaned {
                    stats.orphaned_sensor_controls.push(control.id.clone());
                }
            }
        }
        if status == LinkStatus::Unlinked {
            stats.unlinked_controls.push(control.id.clone());
        }
    }
    stats
}
