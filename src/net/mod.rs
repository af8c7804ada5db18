//! Networking: wire protocol, remote tank cache and the inbound queue
//!
//! The channel is a fire-and-forget broadcast. There are no acks, sequence
//! numbers or retries, and a disconnect just means no more snapshots arrive.

pub mod cache;
pub mod inbox;
pub mod protocol;

pub use cache::{RemoteTank, RemoteTanks, STALE_AFTER_MS, apply_snapshot};
pub use inbox::Inbox;
pub use protocol::{BulletFired, NetMessage, TankSnapshot, WireVec, decode, encode};
