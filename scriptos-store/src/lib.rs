//! In-memory state stores shared by command handlers.
//!
//! Nothing here survives a restart; every store lives for the process lifetime.

/// Channel id to channel name lookups.
pub mod channels;
/// Per-user `/script` rate limiting.
pub mod cooldowns;

pub use channels::ChannelDirectory;
pub use cooldowns::{CooldownTracker, Reservation};
