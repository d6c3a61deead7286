//! Command dispatch.
//!
//! Evaluation order is fixed: readiness, then trigger lookup, then
//! authorization, then the handler. Once a step short-circuits with a
//! reply, later steps never run.

use std::sync::Arc;

use tracing::{debug, warn};

use super::command::{Command, CommandRegistry};
use crate::config::Config;
use crate::error::Result;
use crate::messages::{MessageCatalog, Reply};
use crate::session::SessionState;
use crate::sync::{ReconcileOutcome, SyncEngine};

/// A guild text message, stripped of transport types.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub content: String,
    pub author_id: u64,
    /// None for direct messages
    pub guild_id: Option<u64>,
    pub channel_id: u64,
}

impl InboundMessage {
    /// Discord mention string for the author.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.author_id)
    }
}

/// Dispatcher settings lifted out of the full bot config.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub bot_name: String,
    pub prefix: String,
    pub admins: Vec<u64>,
    pub invite_link: Option<String>,
}

impl DispatcherConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bot_name: config.bot.name.clone(),
            prefix: config.bot.prefix.clone(),
            admins: config.auth.admins.clone(),
            invite_link: config.bot.invite_link.clone(),
        }
    }
}

/// Routes inbound messages to command handlers.
pub struct Dispatcher {
    config: DispatcherConfig,
    registry: CommandRegistry,
    session: Arc<SessionState>,
    engine: Arc<SyncEngine>,
    catalog: Arc<MessageCatalog>,
}

impl Dispatcher {
    pub fn new(
        config: DispatcherConfig,
        session: Arc<SessionState>,
        engine: Arc<SyncEngine>,
        catalog: Arc<MessageCatalog>,
    ) -> Self {
        let registry = CommandRegistry::new(config.prefix.clone());
        Self {
            config,
            registry,
            session,
            engine,
            catalog,
        }
    }

    /// Resolve a message to its reply.
    ///
    /// Always produces a reply descriptor; an `Err` here means the template
    /// catalog itself could not render, which is an operator problem.
    pub async fn dispatch(&self, msg: &InboundMessage) -> Result<Reply> {
        if !self.session.is_ready().await {
            debug!(author_id = msg.author_id, "Session not ready, refusing command");
            return self
                .catalog
                .render("bot-not-ready", &[("mention", msg.mention())]);
        }

        let token = msg.content.split_whitespace().next().unwrap_or("");
        let Some(command) = self.registry.lookup(token) else {
            debug!(token, "No matching trigger");
            return self.catalog.render(
                "invalid-command",
                &[("prefix", self.config.prefix.clone())],
            );
        };

        if command.admin_only() && !self.is_admin(msg.author_id) {
            warn!(
                author_id = msg.author_id,
                command = command.keyword(),
                "Unauthorized command refused"
            );
            return self
                .catalog
                .render("unauthorized-user", &[("mention", msg.mention())]);
        }

        debug!(
            author_id = msg.author_id,
            command = command.keyword(),
            "Dispatching command"
        );
        match command {
            Command::Hello => self.hello(msg),
            Command::Help => self.help(msg),
            Command::Update => self.update().await,
        }
    }

    fn is_admin(&self, author_id: u64) -> bool {
        self.config.admins.contains(&author_id)
    }

    fn hello(&self, msg: &InboundMessage) -> Result<Reply> {
        self.catalog.render(
            "hello",
            &[
                ("mention", msg.mention()),
                ("name", self.config.bot_name.clone()),
                ("prefix", self.config.prefix.clone()),
            ],
        )
    }

    fn help(&self, msg: &InboundMessage) -> Result<Reply> {
        let is_admin = self.is_admin(msg.author_id);

        let mut desc = format!(
            "Hi, thanks for using {}! Try out the list of commands below:\n\n",
            self.config.bot_name
        );
        for command in Command::all() {
            if command.admin_only() && !is_admin {
                continue;
            }
            desc.push_str(&format!(
                "**{}**: {}\n",
                self.registry.trigger(command),
                command.help_text()
            ));
        }
        if let Some(ref link) = self.config.invite_link {
            desc.push_str(&format!("\nInvite me to your server: {}", link));
        }

        self.catalog.render("help", &[("desc", desc)])
    }

    async fn update(&self) -> Result<Reply> {
        let report = self.engine.refresh().await;
        match report.outcome {
            ReconcileOutcome::Completed => self.catalog.render(
                "update-success",
                &[
                    ("inserted", report.inserted.to_string()),
                    ("updated", report.updated.to_string()),
                    ("courses", report.courses.to_string()),
                ],
            ),
            ReconcileOutcome::Failed(reason) => {
                self.catalog.render("update-failure", &[("reason", reason)])
            }
            ReconcileOutcome::Skipped => self.catalog.render(
                "update-failure",
                &[(
                    "reason",
                    "another update pass is already in progress".to_string(),
                )],
            ),
        }
    }
}
