//! Shared vocabulary for the lobby core.
//!
//! Every other crate in the workspace speaks in terms of these types:
//!
//! - **Identifiers** ([`UserId`], [`ConnectionId`], [`NetworkId`],
//!   [`RoomId`], [`GameId`]): typed ids that cross registry boundaries.
//!   Registries never hand out references to each other's records; they
//!   refer to them by id and resolve through the owning registry.
//! - **Notifications** ([`Notification`], [`NotificationKind`]): what the
//!   network broker writes into a user's inbox.
//! - **Failure categories** ([`FailureKind`]): how every error in the
//!   workspace is classified for the presentation layer.
//!
//! # Architecture
//!
//! ```text
//! lobby (facade)
//!     ↕
//! lobby-network / lobby-room      ← groups, rooms, games
//!     ↕
//! lobby-session                   ← users and simulated connections
//!     ↕
//! lobby-protocol (this crate)     ← ids, notifications
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod notification;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use notification::{Notification, NotificationKind};
pub use types::{ConnectionId, FailureKind, GameId, NetworkId, RoomId, UserId};
