//! Discord transport adapter.
//!
//! Handles:
//! - Gateway event handling (ready, guild_create, message)
//! - Outbound reply delivery as embeds

pub mod delivery;
pub mod gateway;

// Re-exports
pub use delivery::{build_embed, deliver, resolve_destination, ColorMap};
pub use gateway::Gateway;
