//! Room configuration, access modes, and the room state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RoomError;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration for a room registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Smallest `max_players` a room may be created with.
    pub min_players: usize,

    /// Prefix for generated room names. A room created without a name is
    /// called `"{prefix} {id}"`.
    pub default_name_prefix: String,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            default_name_prefix: "Room".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomAccess
// ---------------------------------------------------------------------------

/// Who may join a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomAccess {
    /// Anyone may join.
    Public,
    /// Joining requires the room password.
    Private,
}

impl FromStr for RoomAccess {
    type Err = RoomError;

    /// Parses the raw access string a presentation layer collects.
    /// Only the exact strings `public` and `private` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(RoomError::InvalidAccess(other.to_string())),
        }
    }
}

impl fmt::Display for RoomAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// ```text
/// Waiting ──(start game)──→ Started
///    │                         │
///    └──────(close)────────────┴──→ Closed
/// ```
///
/// - **Waiting**: accepting joins and leaves.
/// - **Started**: a game is running. Membership is frozen.
/// - **Closed**: terminal. There is no way back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Started,
    Closed,
}

impl RoomStatus {
    /// Returns `true` if players may join or leave.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` if the room is still live (waiting or started).
    /// An owner may hold at most one live room.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Waiting | Self::Started)
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Waiting, Self::Started)
                | (Self::Waiting, Self::Closed)
                | (Self::Started, Self::Closed)
        )
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Started => write!(f, "started"),
            Self::Closed => write!(f, "closed"),
        }
    }
}
