//! Sensors and communications arrays.

use serde::{Deserialize, Serialize};

use crate::catalog::{SensorKind, SensorType};
use crate::ids::InstalledId;
use crate::sizing::{self, Footprint, ShipContext};
use crate::zones::FiringArc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledSensor {
    pub id: InstalledId,
    pub sensor_type: SensorType,
    pub quantity: u32,
    /// Coverage arcs; informational, sensors are not zone-restricted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arcs: Vec<FiringArc>,
}

impl InstalledSensor {
    pub fn new(id: InstalledId, sensor_type: &SensorType, quantity: u32) -> Self {
        Self {
            id,
            sensor_type: sensor_type.clone(),
            quantity,
            arcs: Vec::new(),
        }
    }

    pub fn footprint(&self, ctx: &ShipContext) -> Footprint {
        sizing::footprint(&self.sensor_type.profile, ctx, self.quantity, 0)
    }

    pub fn kind(&self) -> SensorKind {
        self.sensor_type.kind
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorStats {
    pub hull_points: u32,
    pub power: u32,
    pub cost: u64,
    pub sensors: u32,
    pub has_active_sensor: bool,
    pub has_communications: bool,
    /// Contacts the installed sensors can track at once.
    pub tracking_capability: u32,
}

pub fn calculate_sensor_stats(sensors: &[InstalledSensor], ctx: &ShipContext) -> SensorStats {
    let mut stats = SensorStats::default();
    for sensor in sensors {
        let fp = sensor.footprint(ctx);
        stats.hull_points += fp.hull_points;
        stats.power += fp.power;
        stats.cost += fp.cost;
        stats.sensors += sensor.quantity;
        stats.tracking_capability += sensor.sensor_type.tracking * sensor.quantity;
        match sensor.kind() {
            SensorKind::Active if sensor.quantity > 0 => stats.has_active_sensor = true,
            SensorKind::Communications if sensor.quantity > 0 => stats.has_communications = true,
            _ => {}
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ShipClass, SystemProfile};

    fn sensor(id: &str, kind: SensorKind, tracking: u32) -> SensorType {
        SensorType {
            profile: SystemProfile::fixed(id, id, 1, 1, 5_000),
            kind,
            range: "10/20/40".into(),
            tracking,
        }
    }

    #[test]
    fn active_sensor_and_tracking() {
        let ctx = ShipContext {
            base_hull_points: 40,
            total_hull_points: 40,
            ship_class: ShipClass::Light,
        };
        let sensors = vec![
            InstalledSensor::new("s-1".into(), &sensor("radar", SensorKind::Active, 4), 2),
            InstalledSensor::new("s-2".into(), &sensor("ir", SensorKind::Passive, 2), 1),
        ];
        let stats = calculate_sensor_stats(&sensors, &ctx);
        assert!(stats.has_active_sensor);
        assert!(!stats.has_communications);
        assert_eq!(stats.tracking_capability, 10);
        assert_eq!(stats.hull_points, 3);
        assert_eq!(stats.cost, 15_000);

        let passive_only = calculate_sensor_stats(&sensors[1..], &ctx);
        assert!(!passive_only.has_active_sensor);
    }
}
