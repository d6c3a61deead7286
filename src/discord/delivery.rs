//! Outbound reply delivery.
//!
//! Maps transport-free replies onto Discord embeds and resolves their
//! destination channel through the guild cache.

use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::http::Http;
use serenity::model::id::ChannelId;
use serenity::model::Timestamp;
use tracing::debug;

use crate::config::ColorConfig;
use crate::error::{BotError, Result};
use crate::guild::GuildCache;
use crate::messages::{ColorClass, Reply};

/// Concrete palette resolving reply color classes to embed colors.
#[derive(Debug, Clone, Copy)]
pub struct ColorMap {
    default: u32,
    success: u32,
    failure: u32,
}

impl ColorMap {
    pub fn from_config(colors: &ColorConfig) -> Self {
        Self {
            default: colors.default,
            success: colors.success,
            failure: colors.failure,
        }
    }

    pub fn resolve(&self, class: ColorClass) -> u32 {
        match class {
            ColorClass::Default => self.default,
            ColorClass::Success => self.success,
            ColorClass::Failure => self.failure,
        }
    }
}

/// Convert a reply into a serenity embed.
pub fn build_embed(reply: &Reply, colors: &ColorMap) -> CreateEmbed {
    CreateEmbed::new()
        .title(&reply.title)
        .description(&reply.body)
        .color(colors.resolve(reply.color))
        .timestamp(Timestamp::now())
}

/// Resolve the channel id a reply should be sent to.
///
/// Guild messages resolve through the guild's snapshot; the empty channel
/// name routes back to the originating channel. Direct messages have no
/// snapshot, so only the originating channel is addressable.
pub fn resolve_destination(
    cache: &GuildCache,
    reply: &Reply,
    guild_id: Option<u64>,
    origin_channel: u64,
) -> Result<u64> {
    match guild_id {
        Some(guild_id) => cache.channel_for(guild_id, &reply.channel_name, Some(origin_channel)),
        None if reply.wants_contextual_channel() => Ok(origin_channel),
        None => Err(BotError::NoDestination(format!(
            "channel '{}' is not addressable from a direct message",
            reply.channel_name
        ))),
    }
}

/// Send a reply to its resolved destination as a single embed.
pub async fn deliver(
    http: &Http,
    cache: &GuildCache,
    colors: &ColorMap,
    reply: &Reply,
    guild_id: Option<u64>,
    origin_channel: u64,
) -> Result<()> {
    let destination = resolve_destination(cache, reply, guild_id, origin_channel)?;
    let embed = build_embed(reply, colors);

    ChannelId::new(destination)
        .send_message(http, CreateMessage::new().embed(embed))
        .await?;

    debug!(channel_id = destination, title = %reply.title, "Delivered reply");
    Ok(())
}
