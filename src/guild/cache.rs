//! Guild snapshot cache.
//!
//! Thread-safe map from guild id to its validated snapshot. Snapshots are
//! rebuilt wholesale on every bootstrap payload; an insert replaces the
//! previous snapshot, it never merges into it.

use dashmap::DashMap;
use tracing::debug;

use super::snapshot::{GuildDirectory, GuildSnapshot};
use crate::error::{BotError, Result};

/// Cache of validated guild snapshots.
pub struct GuildCache {
    snapshots: DashMap<u64, GuildSnapshot>,
    required_channels: Vec<String>,
    required_roles: Vec<String>,
}

impl GuildCache {
    /// Create a cache validating against the given requirement names.
    pub fn new(required_channels: Vec<String>, required_roles: Vec<String>) -> Self {
        Self {
            snapshots: DashMap::new(),
            required_channels,
            required_roles,
        }
    }

    /// Build and store the snapshot for a guild, replacing any previous one.
    ///
    /// Invalid snapshots are cached too; their issues feed diagnostics while
    /// the guild keeps being served.
    pub fn insert(&self, directory: GuildDirectory) -> GuildSnapshot {
        let snapshot =
            GuildSnapshot::build(directory, &self.required_channels, &self.required_roles);
        let replaced = self
            .snapshots
            .insert(snapshot.guild_id, snapshot.clone())
            .is_some();

        debug!(
            guild_id = snapshot.guild_id,
            name = %snapshot.name,
            replaced,
            "Cached guild snapshot"
        );
        snapshot
    }

    /// Fetch the snapshot for a guild.
    pub fn snapshot(&self, guild_id: u64) -> Result<GuildSnapshot> {
        self.snapshots
            .get(&guild_id)
            .map(|entry| entry.value().clone())
            .ok_or(BotError::GuildNotCached(guild_id))
    }

    /// Resolve a reply's channel name to a channel id.
    ///
    /// The empty name is the contextual sentinel: it resolves to the channel
    /// the triggering message arrived on, and fails with `NoDestination`
    /// when there is no such channel to fall back on.
    pub fn channel_for(
        &self,
        guild_id: u64,
        name: &str,
        contextual: Option<u64>,
    ) -> Result<u64> {
        if name.is_empty() {
            return contextual.ok_or_else(|| {
                BotError::NoDestination(
                    "no channel named and no originating channel to fall back on".to_string(),
                )
            });
        }

        let snapshot = self.snapshot(guild_id)?;
        snapshot.channel(name).ok_or_else(|| BotError::ChannelNotFound {
            guild_id,
            name: name.to_string(),
        })
    }

    /// Resolve a role name to a role id.
    pub fn role_for(&self, guild_id: u64, name: &str) -> Result<u64> {
        let snapshot = self.snapshot(guild_id)?;
        snapshot.role(name).ok_or_else(|| BotError::RoleNotFound {
            guild_id,
            name: name.to_string(),
        })
    }

    /// Number of guilds on hand.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
