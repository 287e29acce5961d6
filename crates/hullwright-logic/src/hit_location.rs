//! Hit-location charts: map a die roll and attack direction to a damage zone.
//!
//! A chart holds one column per attack direction; each column partitions the
//! die range `1..=hit_die` into contiguous roll ranges, one per zone. Curated
//! tables from the catalog are preferred; layouts without one get a
//! generated chart that favors the zones most exposed to the attack.

use serde::{Deserialize, Serialize};

use crate::zones::{Facing, ZoneCode, ZoneLayout};

/// Side of the ship an attack comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttackDirection {
    Forward,
    Port,
    Starboard,
    Aft,
}

impl AttackDirection {
    pub const ALL: [AttackDirection; 4] = [
        AttackDirection::Forward,
        AttackDirection::Port,
        AttackDirection::Starboard,
        AttackDirection::Aft,
    ];

    pub fn facing(&self) -> Facing {
        match self {
            Self::Forward => Facing::Forward,
            Self::Port => Facing::Port,
            Self::Starboard => Facing::Starboard,
            Self::Aft => Facing::Aft,
        }
    }
}

/// Inclusive roll range landing on one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitLocationEntry {
    pub min_roll: u8,
    pub max_roll: u8,
    pub zone: ZoneCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitLocationColumn {
    pub direction: AttackDirection,
    pub entries: Vec<HitLocationEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitLocationChart {
    pub hit_die: u8,
    pub columns: Vec<HitLocationColumn>,
}

impl HitLocationChart {
    pub fn column(&self, direction: AttackDirection) -> Option<&HitLocationColumn> {
        self.columns.iter().find(|c| c.direction == direction)
    }
}

/// Hand-authored chart for one (hit die, zone set) combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitLocationTable {
    pub hit_die: u8,
    pub zones: Vec<ZoneCode>,
    pub columns: Vec<HitLocationColumn>,
}

impl HitLocationTable {
    /// Whether this table was authored for `layout`: same die, same zone set.
    pub fn fits(&self, layout: &ZoneLayout) -> bool {
        self.hit_die == layout.hit_die
            && self.zones.len() == layout.zones.len()
            && layout.zones.iter().all(|z| self.zones.contains(z))
    }

    pub fn to_chart(&self) -> HitLocationChart {
        HitLocationChart {
            hit_die: self.hit_die,
            columns: self.columns.clone(),
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Structural problem in a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "defect")]
pub enum ChartDefect {
    MissingDirection { direction: AttackDirection },
    DuplicateDirection { direction: AttackDirection },
    /// A roll no entry covers.
    Gap { direction: AttackDirection, roll: u8 },
    /// A roll covered twice, or entries out of order.
    Overlap { direction: AttackDirection, roll: u8 },
    InvertedRange { direction: AttackDirection, min_roll: u8, max_roll: u8 },
    /// A range reaching past the die.
    OutOfRange { direction: AttackDirection, max_roll: u8 },
    /// An entry naming a zone the layout does not have.
    UnknownZone { direction: AttackDirection, zone: ZoneCode },
}

/// Check that every direction appears once and partitions `1..=hit_die`
/// over zones from `zones`. An empty result means the chart is sound.
pub fn validate_chart(chart: &HitLocationChart, zones: &[ZoneCode]) -> Vec<ChartDefect> {
    let mut defects = Vec::new();
    for direction in AttackDirection::ALL {
        let columns: Vec<&HitLocationColumn> = chart
            .columns
            .iter()
            .filter(|c| c.direction == direction)
            .collect();
        match columns.as_slice() {
            [] => defects.push(ChartDefect::MissingDirection { direction }),
            [column] => check_column(column, chart.hit_die, zones, &mut defects),
            _ => defects.push(ChartDefect::DuplicateDirection { direction }),
        }
    }
    defects
}

fn check_column(
    column: &HitLocationColumn,
    hit_die: u8,
    zones: &[ZoneCode],
    defects: &mut Vec<ChartDefect>,
) {
    let direction = column.direction;
    let mut next: u16 = 1;
    for entry in &column.entries {
        if !zones.contains(&entry.zone) {
            defects.push(ChartDefect::UnknownZone {
                direction,
                zone: entry.zone,
            });
        }
        if entry.min_roll > entry.max_roll {
            defects.push(ChartDefect::InvertedRange {
                direction,
                min_roll: entry.min_roll,
                max_roll: entry.max_roll,
            });
            continue;
        }
        let min = entry.min_roll as u16;
        if min > next {
            defects.push(ChartDefect::Gap {
                direction,
                roll: next as u8,
            });
        } else if min < next {
            defects.push(ChartDefect::Overlap {
                direction,
                roll: entry.min_roll,
            });
        }
        if entry.max_roll > hit_die {
            defects.push(ChartDefect::OutOfRange {
                direction,
                max_roll: entry.max_roll,
            });
        }
        next = next.max(entry.max_roll as u16 + 1);
    }
    if next <= hit_die as u16 {
        defects.push(ChartDefect::Gap {
            direction,
            roll: next as u8,
        });
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// How exposed a zone is to an attack: 0 faces it, 1 is beside it, 2 faces away.
fn exposure(zone: ZoneCode, direction: AttackDirection) -> u8 {
    let facing = direction.facing();
    if zone.facings().contains(&facing) {
        0
    } else if zone.facings().contains(&facing.opposite()) {
        2
    } else {
        1
    }
}

/// Split the die over the layout's zones for one direction. Zones are
/// ordered by exposure (ties keep layout order); the die is divided evenly
/// with the remainder going to the most exposed zones. When the layout has
/// more zones than die faces the least exposed zones get no rolls.
pub fn partition_column(
    zones: &[ZoneCode],
    hit_die: u8,
    direction: AttackDirection,
) -> HitLocationColumn {
    let mut ordered: Vec<ZoneCode> = zones.to_vec();
    ordered.sort_by_key(|z| exposure(*z, direction));

    let mut entries = Vec::new();
    if !ordered.is_empty() && hit_die > 0 {
        let n = ordered.len() as u16;
        let die = hit_die as u16;
        let base = die / n;
        let remainder = die % n;
        let mut next: u16 = 1;
        for (i, zone) in ordered.iter().enumerate() {
            let share = base + u16::from((i as u16) < remainder);
            if share == 0 {
                continue;
            }
            entries.push(HitLocationEntry {
                min_roll: next as u8,
                max_roll: (next + share - 1) as u8,
                zone: *zone,
            });
            next += share;
        }
    }
    HitLocationColumn { direction, entries }
}

/// Generated chart for a layout, every direction partitioned by exposure.
pub fn generated_chart(layout: &ZoneLayout) -> HitLocationChart {
    HitLocationChart {
        hit_die: layout.hit_die,
        columns: AttackDirection::ALL
            .iter()
            .map(|d| partition_column(&layout.zones, layout.hit_die, *d))
            .collect(),
    }
}

/// Chart for a layout: the matching curated table if there is a sound one,
/// otherwise a generated chart.
pub fn generate_chart(layout: &ZoneLayout, tables: &[HitLocationTable]) -> HitLocationChart {
    if let Some(table) = tables.iter().find(|t| t.fits(layout)) {
        let chart = table.to_chart();
        let defects = validate_chart(&chart, &layout.zones);
        if defects.is_empty() {
            return chart;
        }
        debug_assert!(
            false,
            "curated hit-location table for d{} is malformed: {defects:?}",
            table.hit_die
        );
        log::error!(
            "Curated d{} table with {} zones is malformed ({} defects); generating one",
            table.hit_die,
            table.zones.len(),
            defects.len()
        );
    }
    generated_chart(layout)
}

/// Zone hit by `roll` from `direction`, if the chart covers it.
pub fn zone_for_roll(
    chart: &HitLocationChart,
    direction: AttackDirection,
    roll: u8,
) -> Option<ZoneCode> {
    chart
        .column(direction)?
        .entries
        .iter()
        .find(|e| e.min_roll <= roll && roll <= e.max_roll)
        .map(|e| e.zone)
}
