//! Guild state.
//!
//! Handles:
//! - Snapshotting a guild's channels and roles from bootstrap payloads
//! - Validating required names and collecting diagnostics
//! - Resolving reply destinations by channel name

pub mod cache;
pub mod snapshot;

// Re-exports
pub use cache::GuildCache;
pub use snapshot::{GuildDirectory, GuildSnapshot};
