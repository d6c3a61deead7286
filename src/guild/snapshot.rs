//! Per-guild channel and role snapshots.

use std::collections::HashMap;

/// Transport-free listing of a guild's channels and roles.
///
/// The Discord adapter builds one of these from gateway payloads; nothing
/// in this module touches transport types.
#[derive(Debug, Clone, Default)]
pub struct GuildDirectory {
    pub guild_id: u64,
    pub guild_name: String,
    /// (name, channel id) pairs
    pub channels: Vec<(String, u64)>,
    /// (name, role id) pairs
    pub roles: Vec<(String, u64)>,
}

impl GuildDirectory {
    pub fn new(guild_id: u64, guild_name: impl Into<String>) -> Self {
        Self {
            guild_id,
            guild_name: guild_name.into(),
            channels: Vec::new(),
            roles: Vec::new(),
        }
    }

    pub fn with_channel(mut self, name: impl Into<String>, id: u64) -> Self {
        self.channels.push((name.into(), id));
        self
    }

    pub fn with_role(mut self, name: impl Into<String>, id: u64) -> Self {
        self.roles.push((name.into(), id));
        self
    }
}

/// Validated name-to-id maps for one guild.
///
/// The full listing is kept so replies may route to any existing channel;
/// validation runs over the required names only. Duplicate names resolve
/// to the lowest id (the oldest object).
#[derive(Debug, Clone)]
pub struct GuildSnapshot {
    pub guild_id: u64,
    pub name: String,
    channels: HashMap<String, u64>,
    roles: HashMap<String, u64>,
    required_channels: Vec<String>,
    required_roles: Vec<String>,
    issues: Vec<String>,
}

impl GuildSnapshot {
    /// Resolve a directory against the required channel and role names.
    pub fn build(
        directory: GuildDirectory,
        required_channels: &[String],
        required_roles: &[String],
    ) -> Self {
        let channels = resolve(directory.channels);
        let roles = resolve(directory.roles);

        let mut issues = Vec::new();
        for name in required_channels {
            if !channels.contains_key(name) {
                issues.push(format!("- Channel Error: `#{}` not found.", name));
            }
        }
        for name in required_roles {
            if !roles.contains_key(name) {
                issues.push(format!("- Role Error: '{}' does not exist.", name));
            }
        }

        Self {
            guild_id: directory.guild_id,
            name: directory.guild_name,
            channels,
            roles,
            required_channels: required_channels.to_vec(),
            required_roles: required_roles.to_vec(),
            issues,
        }
    }

    /// Whether every required channel and role resolved.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Diagnostic lines for unresolved requirements, one per missing item.
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    /// Channel id for an exact name, if the guild has one.
    pub fn channel(&self, name: &str) -> Option<u64> {
        self.channels.get(name).copied()
    }

    /// Role id for an exact name, if the guild has one.
    pub fn role(&self, name: &str) -> Option<u64> {
        self.roles.get(name).copied()
    }

    /// The requirement names this snapshot was validated against.
    pub fn requirements(&self) -> (&[String], &[String]) {
        (&self.required_channels, &self.required_roles)
    }
}

/// Build a name-to-id map; on duplicate names the lowest id wins.
fn resolve(mut listing: Vec<(String, u64)>) -> HashMap<String, u64> {
    listing.sort_by_key(|(_, id)| *id);
    let mut map = HashMap::with_capacity(listing.len());
    for (name, id) in listing {
        map.entry(name).or_insert(id);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_required_names() {
        let directory = GuildDirectory::new(42, "CS Hall")
            .with_channel("general", 100)
            .with_channel("lab-help", 101)
            .with_role("TA", 200);

        let snapshot = GuildSnapshot::build(directory, &required(&["general"]), &required(&["TA"]));

        assert!(snapshot.is_valid());
        assert_eq!(snapshot.channel("general"), Some(100));
        assert_eq!(snapshot.channel("lab-help"), Some(101));
        assert_eq!(snapshot.role("TA"), Some(200));
        assert_eq!(snapshot.channel("missing"), None);
    }

    #[test]
    fn missing_requirements_become_issue_lines() {
        let directory = GuildDirectory::new(42, "CS Hall").with_channel("random", 100);

        let snapshot = GuildSnapshot::build(
            directory,
            &required(&["general"]),
            &required(&["Instructor"]),
        );

        assert!(!snapshot.is_valid());
        assert_eq!(
            snapshot.issues(),
            &[
                "- Channel Error: `#general` not found.".to_string(),
                "- Role Error: 'Instructor' does not exist.".to_string(),
            ]
        );
    }

    #[test]
    fn duplicate_names_resolve_to_lowest_id() {
        let directory = GuildDirectory::new(42, "CS Hall")
            .with_channel("general", 300)
            .with_channel("general", 100);

        let snapshot = GuildSnapshot::build(directory, &required(&["general"]), &[]);
        assert_eq!(snapshot.channel("general"), Some(100));
    }
}
