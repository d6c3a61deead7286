//! Command definitions and the trigger registry.

use std::collections::HashMap;

/// The commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Friendly liveness check
    Hello,
    /// List the available commands
    Help,
    /// Force a catalog reconciliation pass
    Update,
}

impl Command {
    /// The keyword typed after the prefix.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Help => "help",
            Self::Update => "update",
        }
    }

    /// One-line description shown in the help listing.
    pub fn help_text(&self) -> &'static str {
        match self {
            Self::Hello => "Test me to say hello!",
            Self::Help => "List of commands.",
            Self::Update => "Force-updates the course database.",
        }
    }

    /// Whether only configured admins may run this command.
    pub fn admin_only(&self) -> bool {
        matches!(self, Self::Update)
    }

    /// All commands, in help-listing order.
    pub fn all() -> Vec<Self> {
        vec![Self::Hello, Self::Help, Self::Update]
    }
}

/// Maps typed triggers to commands.
///
/// A trigger is the configured prefix plus a keyword, compared
/// case-insensitively. Built once at startup, immutable afterwards.
pub struct CommandRegistry {
    prefix: String,
    triggers: HashMap<String, Command>,
}

impl CommandRegistry {
    /// Build the registry for a prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let triggers = Command::all()
            .into_iter()
            .map(|command| {
                let trigger = format!("{}{}", prefix, command.keyword()).to_lowercase();
                (trigger, command)
            })
            .collect();
        Self { prefix, triggers }
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Look up the command for a typed token, ignoring case.
    pub fn lookup(&self, token: &str) -> Option<Command> {
        self.triggers.get(&token.to_lowercase()).copied()
    }

    /// The full trigger string for a command.
    pub fn trigger(&self, command: Command) -> String {
        format!("{}{}", self.prefix, command.keyword())
    }
}
