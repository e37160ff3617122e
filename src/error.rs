//! Error taxonomy: store faults, scan errors, and listing validation.

use crate::types::{Collection, Role};
use thiserror::Error;

/// The record store could not load or append.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {collection}: {source}")]
    Io {
        collection: Collection,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error on {collection}: {source}")]
    Serialization {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed collection {collection}: {reason}")]
    Malformed { collection: Collection, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a single scan call. A scan either completes or surfaces one of these.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Store fault: {0}")]
    Store(#[from] StoreError),

    #[error("Role mismatch: record is {actual:?}, caller declared {declared:?}")]
    RoleMismatch { declared: Role, actual: Role },

    #[error("Wrong counterpart collection for {role:?}: expected {expected}, got {got}")]
    WrongCollection {
        role: Role,
        expected: Collection,
        got: Collection,
    },
}

/// Input rejected at the API boundary. The core predicate never raises these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid age range: ageMin {min} > ageMax {max}")]
    InvertedAgeRange { min: u32, max: u32 },

    #[error("Demand listing must name at least one target region")]
    NoTargets,

    #[error("Field must not be empty: {0}")]
    EmptyField(&'static str),
}
