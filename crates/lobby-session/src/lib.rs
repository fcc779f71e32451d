//! User identity and connection state for the lobby core.
//!
//! This crate owns two independent registries:
//!
//! 1. **Users**: registering and authenticating users ([`UserRegistry`])
//! 2. **Connections**: which users are currently "online" through the
//!    in-memory connection simulation ([`ConnectionTracker`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Network / Room layers (above)  ← resolve user ids, check who's connected
//!     ↕
//! Session layer (this crate)     ← user records and connection records
//!     ↕
//! Protocol layer (below)         ← provides UserId, ConnectionId
//! ```
//!
//! Neither registry locks anything itself. They are plain owned state;
//! the `lobby` facade puts each one behind its own lock.

mod connection;
mod error;
mod tracker;
mod user;
mod users;

pub use connection::{ConnectionConfig, ConnectionInfo, Endpoint};
pub use error::SessionError;
pub use tracker::ConnectionTracker;
pub use user::{SessionConfig, User};
pub use users::UserRegistry;
