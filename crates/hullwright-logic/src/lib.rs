//! Pure design calculations for Hullwright.
//!
//! This crate contains every derived-state calculation of the starship
//! designer: hull-point usage, power balance, cost, validation, damage
//! zones and hit-location charts. Functions take plain data (a hull, lists
//! of installed components, an immutable [`catalog::Catalog`]) and return
//! new values. Nothing here touches files, terminals or global state, so
//! the same code serves the CLI, tests and any front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Reference data: hulls, component types, sizing/power/cost models |
//! | [`sizing`] | Hull-point, power and cost formulas shared by every category |
//! | [`ids`] | Typed lookup keys for installed records and batteries |
//! | [`armor`] | Armor layers, weight-for-class legality |
//! | [`power`] | Power plants, fuel tanks, endurance |
//! | [`engines`] | Engines, percent of hull, acceleration |
//! | [`ftl`] | FTL drives and minimum drive size |
//! | [`support`] | Life support, accommodations, evacuation, gravity |
//! | [`weapons`] | Mounts, gun configurations, weapon batteries |
//! | [`ordnance`] | Launch systems, loadouts, launcher batteries |
//! | [`defenses`] | Screens, countermeasures, point defense, damage control |
//! | [`command`] | Command & control, fire/sensor control links |
//! | [`sensors`] | Sensors and communications |
//! | [`hangar`] | Hangars, docking clamps, cargo and misc spaces |
//! | [`design`] | The ship design and its aggregate stats |
//! | [`validation`] | Declarative rule set and design-state roll-up |
//! | [`zones`] | Damage-zone layouts, placement and auto-assignment |
//! | [`hit_location`] | Hit-location charts: curated, generated, validated |
//! | [`persistence`] | Minimal saved records and catalog-driven rebuild |
//! | [`error`] | Error type for malformed reference data and requests |

pub mod armor;
pub mod catalog;
pub mod command;
pub mod defenses;
pub mod design;
pub mod engines;
pub mod error;
pub mod ftl;
pub mod hangar;
pub mod hit_location;
pub mod ids;
pub mod ordnance;
pub mod persistence;
pub mod power;
pub mod sensors;
pub mod sizing;
pub mod support;
pub mod validation;
pub mod weapons;
pub mod zones;

pub use error::{Error, Result};
