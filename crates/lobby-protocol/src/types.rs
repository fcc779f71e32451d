//! Identity types and failure categories shared across the lobby.
//!
//! Each id is a "newtype wrapper" around a `u64`. You can't pass a
//! `RoomId` where a `UserId` is expected, even though both are integers
//! underneath, and signatures like `fn join(room: RoomId, user: UserId)`
//! read better than two bare numbers.
//!
//! `#[serde(transparent)]` serializes an id as the plain number, so
//! `UserId(42)` becomes `42` in JSON rather than `{"0": 42}`.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Declares a `u64` newtype id with a prefixed `Display` form.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// A registered user. Assigned by the user registry, starting at 1.
    UserId,
    "U-"
);

define_id!(
    /// One simulated connection. A user who reconnects gets a fresh id.
    ConnectionId,
    "conn-"
);

define_id!(
    /// A network group of users.
    NetworkId,
    "N-"
);

define_id!(
    /// A room (game lobby).
    RoomId,
    "R-"
);

define_id!(
    /// A game started from a room.
    GameId,
    "G-"
);

// ---------------------------------------------------------------------------
// FailureKind
// ---------------------------------------------------------------------------

/// The category of a rejected operation.
///
/// Every error enum in the workspace maps its variants onto one of these,
/// so a presentation layer can decide how to react (show a form error,
/// refresh its listing, or tell the user they lack permission) without
/// matching on each crate's variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Bad input, rejected before any state was looked at.
    Validation,
    /// The referenced entity does not exist.
    NotFound,
    /// The entity exists but its current state forbids the operation
    /// (wrong status, duplicate membership, capacity reached). Callers
    /// may refresh and retry.
    Conflict,
    /// The requester is not allowed to perform the operation.
    Unauthorized,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Unauthorized => write!(f, "unauthorized"),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
