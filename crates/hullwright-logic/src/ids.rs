//! Typed identifiers for installed records and derived groupings.
//!
//! These are lookup keys, not ownership: anything holding one must resolve
//! it against the current design and handle the not-found case.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one installed record (a weapon mount, a sensor, a hangar...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstalledId(pub String);

impl InstalledId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstalledId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstalledId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Key of a weapon battery: installed weapons or launchers sharing a type
/// and mount signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatteryKey(pub String);

impl BatteryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatteryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Next free `prefix-N` id that does not collide with `existing`.
pub fn next_installed_id<'a>(
    prefix: &str,
    existing: impl IntoIterator<Item = &'a InstalledId>,
) -> InstalledId {
    let taken: Vec<&InstalledId> = existing.into_iter().collect();
    let mut n = taken.len() + 1;
    loop {
        let candidate = InstalledId(format!("{prefix}-{n}"));
        if !taken.contains(&&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_skips_taken() {
        let existing = vec![InstalledId::new("wpn-1"), InstalledId::new("wpn-2")];
        assert_eq!(next_installed_id("wpn", &existing), InstalledId::new("wpn-3"));

        let gappy = vec![InstalledId::new("wpn-2")];
        assert_eq!(next_installed_id("wpn", &gappy), InstalledId::new("wpn-3"));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = InstalledId::new("sensor-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sensor-1\"");
        let key: BatteryKey = serde_json::from_str("\"laser:turret\"").unwrap();
        assert_eq!(key.as_str(), "laser:turret");
    }
}
