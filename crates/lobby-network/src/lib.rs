//! Network groups for the lobby core.
//!
//! A network is a named, owned, optionally password-protected group of
//! users layered over the simulated connections of `lobby-session`.
//! Membership changes are announced to participants through per-user
//! notification inboxes.
//!
//! # Key types
//!
//! - [`NetworkBroker`]: creates, joins, leaves and closes networks;
//!   delivers notifications
//! - [`Network`]: a network record
//! - [`NotificationReceiver`]: a user's inbox, from
//!   [`NetworkBroker::subscribe`]

mod broker;
mod error;
mod inbox;
mod network;

pub use broker::NetworkBroker;
pub use error::NetworkError;
pub use inbox::{NotificationReceiver, NotificationSender};
pub use network::{BroadcastReport, Network, NetworkConfig, NetworkStatus};
