//! End-to-end command pipeline integration tests
//!
//! Wires the dispatcher, sync engine, and guild cache together over a real
//! SQLite store, covering:
//! - Reply routing to named and contextual channels
//! - Readiness gating before the first reconciliation pass
//! - Direct message handling
//! - Routing failures when a required channel is missing

use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};

use registrar::commands::{Dispatcher, DispatcherConfig, InboundMessage};
use registrar::discord::resolve_destination;
use registrar::guild::{GuildCache, GuildDirectory};
use registrar::messages::MessageCatalog;
use registrar::session::SessionState;
use registrar::store::SqliteStore;
use registrar::sync::SyncEngine;

const ADMIN: u64 = 1;
const GUILD: u64 = 42;
const GENERAL: u64 = 100;

// =============================================================================
// Helpers
// =============================================================================

fn pipeline() -> (
    Arc<Dispatcher>,
    Arc<SyncEngine>,
    Arc<SessionState>,
    Arc<GuildCache>,
) {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let session = Arc::new(SessionState::new());
    let engine = Arc::new(SyncEngine::new(store, session.clone()));
    let config = DispatcherConfig {
        bot_name: "Registrar".to_string(),
        prefix: "!".to_string(),
        admins: vec![ADMIN],
        invite_link: Some("https://discord.com/oauth2/authorize?client_id=1234".to_string()),
    };
    let dispatcher = Arc::new(Dispatcher::new(
        config,
        session.clone(),
        engine.clone(),
        Arc::new(MessageCatalog::built_in()),
    ));

    let cache = Arc::new(GuildCache::new(vec!["general".to_string()], vec![]));
    cache.insert(
        GuildDirectory::new(GUILD, "Campus")
            .with_channel("general", GENERAL)
            .with_channel("course-help", 101),
    );

    (dispatcher, engine, session, cache)
}

fn guild_message(content: &str, author_id: u64, channel_id: u64) -> InboundMessage {
    InboundMessage {
        content: content.to_string(),
        author_id,
        guild_id: Some(GUILD),
        channel_id,
    }
}

fn direct_message(content: &str, author_id: u64, channel_id: u64) -> InboundMessage {
    InboundMessage {
        content: content.to_string(),
        author_id,
        guild_id: None,
        channel_id,
    }
}

// =============================================================================
// Reply Routing
// =============================================================================

#[tokio::test]
async fn admin_update_routes_its_report_to_general() {
    let (dispatcher, _engine, session, cache) = pipeline();
    session.mark_ready().await;

    let msg = guild_message("!update", ADMIN, 555);
    let reply = dispatcher.dispatch(&msg).await.expect("Should dispatch");

    assert_eq!(reply.title, "Catalog Updated");
    assert!(reply.body.contains("Inserted 6 course(s)"));

    // The report goes to #general, not the channel the command came from
    let destination = assert_ok!(resolve_destination(
        &cache,
        &reply,
        msg.guild_id,
        msg.channel_id
    ));
    assert_eq!(destination, GENERAL);
}

#[tokio::test]
async fn hello_routes_back_to_the_originating_channel() {
    let (dispatcher, _engine, session, cache) = pipeline();
    session.mark_ready().await;

    let msg = guild_message("!hello", 7, 555);
    let reply = dispatcher.dispatch(&msg).await.expect("Should dispatch");

    assert_eq!(reply.title, "Hello!");
    let destination = assert_ok!(resolve_destination(
        &cache,
        &reply,
        msg.guild_id,
        msg.channel_id
    ));
    assert_eq!(destination, 555);
}

// =============================================================================
// Readiness Gating
// =============================================================================

#[tokio::test]
async fn commands_wait_for_the_first_reconcile_pass() {
    let (dispatcher, engine, _session, _cache) = pipeline();

    let early = dispatcher
        .dispatch(&guild_message("!hello", 7, 555))
        .await
        .expect("Should dispatch");
    assert_eq!(early.title, "Hold On");

    engine.refresh().await;

    let late = dispatcher
        .dispatch(&guild_message("!hello", 7, 555))
        .await
        .expect("Should dispatch");
    assert_eq!(late.title, "Hello!");
}

// =============================================================================
// Direct Messages
// =============================================================================

#[tokio::test]
async fn direct_messages_answer_in_place_but_cannot_reach_named_channels() {
    let (dispatcher, _engine, session, cache) = pipeline();
    session.mark_ready().await;

    // A DM greeting answers on the DM channel itself
    let hello = direct_message("!hello", 7, 900);
    let reply = dispatcher.dispatch(&hello).await.expect("Should dispatch");
    let destination = assert_ok!(resolve_destination(
        &cache,
        &reply,
        hello.guild_id,
        hello.channel_id
    ));
    assert_eq!(destination, 900);

    // The update report names #general, which no DM can reach
    let update = direct_message("!update", ADMIN, 900);
    let reply = dispatcher.dispatch(&update).await.expect("Should dispatch");
    assert_eq!(reply.channel_name, "general");

    let err = assert_err!(resolve_destination(
        &cache,
        &reply,
        update.guild_id,
        update.channel_id
    ));
    assert!(err.to_string().contains("direct message"));
}

// =============================================================================
// Missing Required Channel
// =============================================================================

#[tokio::test]
async fn update_report_fails_routing_when_general_is_missing() {
    let (dispatcher, _engine, session, _cache) = pipeline();
    session.mark_ready().await;

    // This guild never set up #general; the snapshot is cached anyway
    let cache = GuildCache::new(vec!["general".to_string()], vec![]);
    let snapshot = cache.insert(GuildDirectory::new(GUILD, "Campus").with_channel("lobby", 300));
    assert!(!snapshot.is_valid());

    let msg = guild_message("!update", ADMIN, 300);
    let reply = dispatcher.dispatch(&msg).await.expect("Should dispatch");
    assert_eq!(reply.title, "Catalog Updated");

    let err = assert_err!(resolve_destination(
        &cache,
        &reply,
        msg.guild_id,
        msg.channel_id
    ));
    assert!(err.to_string().contains("'general'"));
}
