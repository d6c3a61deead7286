//! Discord gateway adapter.
//!
//! Owns the serenity event handler: presence and the refresh loop on
//! ready, guild snapshot bootstrap on guild_create, and message-to-reply
//! plumbing for everything else.

use std::sync::Arc;

use serenity::all::{ActivityData, ChannelType, Guild, Message, Ready};
use serenity::async_trait;
use serenity::prelude::{Context, EventHandler};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::commands::{Dispatcher, InboundMessage};
use crate::guild::{GuildCache, GuildDirectory};
use crate::messages::Reply;
use crate::sync::SyncCoordinator;

use super::delivery::{deliver, ColorMap};

/// Serenity event handler wiring gateway events into the bot's modules.
pub struct Gateway {
    dispatcher: Arc<Dispatcher>,
    cache: Arc<GuildCache>,
    colors: ColorMap,
    bot_name: String,
    prefix: String,
    // Consumed by the first ready event; reconnects must not spawn twice.
    coordinator: Mutex<Option<SyncCoordinator>>,
}

impl Gateway {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        cache: Arc<GuildCache>,
        colors: ColorMap,
        bot_name: String,
        prefix: String,
        coordinator: SyncCoordinator,
    ) -> Self {
        Self {
            dispatcher,
            cache,
            colors,
            bot_name,
            prefix,
            coordinator: Mutex::new(Some(coordinator)),
        }
    }
}

/// Flatten a gateway guild payload into name/id listings.
///
/// Only text channels are addressable reply destinations; voice and
/// category channels are left out of the snapshot.
fn directory_from_guild(guild: &Guild) -> GuildDirectory {
    let mut directory = GuildDirectory::new(guild.id.get(), guild.name.clone());
    for channel in guild.channels.values() {
        if channel.kind == ChannelType::Text {
            directory
                .channels
                .push((channel.name.clone(), channel.id.get()));
        }
    }
    for role in guild.roles.values() {
        directory.roles.push((role.name.clone(), role.id.get()));
    }
    directory
}

#[async_trait]
impl EventHandler for Gateway {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let presence = format!("Hi, I'm {}! Try {}help", self.bot_name, self.prefix);
        ctx.set_activity(Some(ActivityData::playing(presence)));

        if let Some(coordinator) = self.coordinator.lock().await.take() {
            tokio::spawn(coordinator.run());
        }

        info!(user = %ready.user.name, "Connected to the gateway");
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: Option<bool>) {
        let snapshot = self.cache.insert(directory_from_guild(&guild));
        if snapshot.is_valid() {
            info!(
                guild_id = snapshot.guild_id,
                name = %snapshot.name,
                "Guild snapshot cached"
            );
        } else {
            warn!(
                guild_id = snapshot.guild_id,
                name = %snapshot.name,
                issues = %snapshot.issues().join(" "),
                "Guild snapshot cached with unresolved requirements"
            );
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || !msg.attachments.is_empty() {
            return;
        }
        if !msg.content.starts_with(&self.prefix) {
            return;
        }

        let inbound = InboundMessage {
            content: msg.content.clone(),
            author_id: msg.author.id.get(),
            guild_id: msg.guild_id.map(|id| id.get()),
            channel_id: msg.channel_id.get(),
        };

        let reply = match self.dispatcher.dispatch(&inbound).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Dispatch failed, answering with a fallback");
                Reply::misconfiguration(e.to_string())
            }
        };

        if let Err(e) = deliver(
            &ctx.http,
            &self.cache,
            &self.colors,
            &reply,
            inbound.guild_id,
            inbound.channel_id,
        )
        .await
        {
            warn!(title = %reply.title, error = %e, "Failed to deliver reply");
        }
    }
}
