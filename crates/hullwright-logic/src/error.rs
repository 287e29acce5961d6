use thiserror::Error;

use crate::zones::ZoneCode;

/// Convenient result alias for the Hullwright logic crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised for malformed reference data or malformed requests.
///
/// Design-state problems (hull points exceeded, missing subsystems, power
/// deficits) are never errors; they surface as validation issues.
#[derive(Debug, Error)]
pub enum Error {
    /// A catalog entry declared more than one sizing marker.
    #[error("catalog entry {id} declares conflicting sizing fields: {fields}")]
    AmbiguousSizing { id: String, fields: String },

    /// A catalog entry declared no sizing marker at all.
    #[error("catalog entry {id} has no sizing fields")]
    MissingSizing { id: String },

    /// A sizing field held a value that cannot be used (zero coverage, negative percentage).
    #[error("catalog entry {id} has an invalid sizing value: {message}")]
    InvalidSizing { id: String, message: String },

    /// Two entries in the same catalog category share an id.
    #[error("duplicate {category} id in catalog: {id}")]
    DuplicateTypeId { category: &'static str, id: String },

    /// A saved design refers to a hull that the catalog does not contain.
    #[error("unknown hull id: {id}")]
    UnknownHull { id: String },

    /// A zone operation named a zone that is not part of the current layout.
    #[error("zone {code} is not part of this hull's layout")]
    UnknownZone { code: ZoneCode },

    /// A directional system was placed in a zone none of its arcs can reach.
    #[error("{name} cannot be placed in zone {code}: no firing arc faces that zone")]
    ArcIncompatible { name: String, code: ZoneCode },

    /// A zone operation referred to an installed system that is not assigned.
    #[error("installed system {installed_id} is not assigned to any zone")]
    ZoneSystemNotFound { installed_id: String },

    /// Wrapper for JSON parse failures of catalogs and saved designs.
    #[error(transparent)]
    CatalogParse(#[from] serde_json::Error),
}
