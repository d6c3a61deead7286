//! Error types for the registrar bot

/// Main error type for registrar operations
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Guild {0} has not been cached yet")]
    GuildNotCached(u64),

    #[error("Channel '{name}' not found in guild {guild_id}")]
    ChannelNotFound { guild_id: u64, name: String },

    #[error("Role '{name}' not found in guild {guild_id}")]
    RoleNotFound { guild_id: u64, name: String },

    #[error("Reply has no destination: {0}")]
    NoDestination(String),
}

// Implement From conversions for common error types

impl From<std::io::Error> for BotError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {}", err))
    }
}

impl From<rusqlite::Error> for BotError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<serenity::Error> for BotError {
    fn from(err: serenity::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type alias for registrar operations
pub type Result<T> = std::result::Result<T, BotError>;
