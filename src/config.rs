//! Bot configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub guild: GuildConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Display name used in presence and replies
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Command prefix, e.g. "!"
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Invite link appended to the help listing (optional)
    #[serde(default)]
    pub invite_link: Option<String>,
}

/// Who may run admin-gated commands
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Discord user ids with admin rights
    #[serde(default)]
    pub admins: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildConfig {
    /// Channel names every guild is expected to have
    #[serde(default = "default_required_channels")]
    pub required_channels: Vec<String>,

    /// Role names every guild is expected to have
    #[serde(default)]
    pub required_roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between catalog reconciliation passes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Drop and recreate the course table on startup
    #[serde(default)]
    pub reset_on_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MessagesConfig {
    /// Path to a JSON message catalog overriding the built-in templates
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Embed color palette, 0xRRGGBB
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_color_default")]
    pub default: u32,

    #[serde(default = "default_color_success")]
    pub success: u32,

    #[serde(default = "default_color_failure")]
    pub failure: u32,
}

// Defaults
fn default_bot_name() -> String { "Registrar".to_string() }
fn default_prefix() -> String { "!".to_string() }
fn default_required_channels() -> Vec<String> {
    vec!["general".to_string()]
}
fn default_refresh_interval() -> u64 { 3600 }
fn default_db_path() -> PathBuf { PathBuf::from("registrar.db") }
fn default_color_default() -> u32 { 0x5865F2 }
fn default_color_success() -> u32 { 0x57F287 }
fn default_color_failure() -> u32 { 0xED4245 }

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            prefix: default_prefix(),
            invite_link: None,
        }
    }
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            required_channels: default_required_channels(),
            required_roles: vec![],
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            reset_on_start: false,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            default: default_color_default(),
            success: default_color_success(),
            failure: default_color_failure(),
        }
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.bot.name.trim().is_empty() {
            return Err("bot.name must not be empty".to_string());
        }

        if self.bot.prefix.is_empty() {
            return Err("bot.prefix must not be empty".to_string());
        }

        if self.bot.prefix.chars().any(|c| c.is_whitespace()) {
            return Err("bot.prefix must not contain whitespace".to_string());
        }

        if self.sync.refresh_interval_secs == 0 {
            return Err("sync.refresh_interval_secs must be at least 1".to_string());
        }

        if self.guild.required_channels.iter().any(|c| c.is_empty()) {
            return Err("guild.required_channels must not contain empty names".to_string());
        }

        Ok(())
    }
}
