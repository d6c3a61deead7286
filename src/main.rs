//! Registrar - Discord course assistant bot

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serenity::all::GatewayIntents;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use registrar::{
    commands::{Dispatcher, DispatcherConfig},
    config::Config,
    discord::{ColorMap, Gateway},
    guild::GuildCache,
    messages::{MessageCatalog, RENDERED_KEYS},
    session::SessionState,
    store::SqliteStore,
    sync::{SyncCoordinator, SyncEngine},
};

#[derive(Parser)]
#[command(name = "registrar")]
#[command(about = "Discord course assistant bot")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "registrar.toml")]
    config: String,

    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: String,

    /// Log level for the registrar target
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// SQLite database path (overrides config file)
    #[arg(long, env = "REGISTRAR_DB_PATH")]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("registrar={},info", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load or fall back to the default config
    let mut config = if std::path::Path::new(&cli.config).exists() {
        let content = std::fs::read_to_string(&cli.config)?;
        toml::from_str::<Config>(&content)?
    } else {
        info!("Config file not found, using defaults");
        Config::default()
    };

    // Apply CLI overrides
    if let Some(db_path) = cli.db_path {
        config.storage.db_path = db_path;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  Registrar - course assistant bot");
    info!("======================================");
    info!("Bot name: {}", config.bot.name);
    info!("Prefix: {}", config.bot.prefix);
    info!("Admins: {}", config.auth.admins.len());
    info!("Database: {}", config.storage.db_path.display());
    info!("Refresh interval: {}s", config.sync.refresh_interval_secs);
    info!("======================================");

    // Load the reply catalog
    let catalog = match &config.messages.path {
        Some(path) => match MessageCatalog::from_path(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Message catalog error: {}", e);
                std::process::exit(1);
            }
        },
        None => MessageCatalog::built_in(),
    };
    if let Err(e) = catalog.validate(&RENDERED_KEYS) {
        error!("Message catalog error: {}", e);
        std::process::exit(1);
    }

    // Open the course store
    let store = match SqliteStore::open(&config.storage.db_path, config.storage.reset_on_start) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Store error: {}", e);
            std::process::exit(1);
        }
    };

    // Wire the sync layer
    let session = Arc::new(SessionState::new());
    let engine = Arc::new(SyncEngine::new(store, session.clone()));
    let coordinator = SyncCoordinator::new(engine.clone(), config.sync.refresh_interval_secs);

    // Wire dispatch, reply routing, and the gateway handler
    let cache = Arc::new(GuildCache::new(
        config.guild.required_channels.clone(),
        config.guild.required_roles.clone(),
    ));
    let dispatcher = Arc::new(Dispatcher::new(
        DispatcherConfig::from_config(&config),
        session,
        engine,
        Arc::new(catalog),
    ));
    let gateway = Gateway::new(
        dispatcher,
        cache,
        ColorMap::from_config(&config.colors),
        config.bot.name.clone(),
        config.bot.prefix.clone(),
        coordinator,
    );

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::Client::builder(&cli.token, intents)
        .event_handler(gateway)
        .await
        .with_context(|| "failed to build Discord gateway client")?;

    client
        .start()
        .await
        .with_context(|| "Discord gateway client stopped unexpectedly")
}
