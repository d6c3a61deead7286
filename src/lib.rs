//! Registrar - Discord course assistant bot
//!
//! A prefix-command bot that keeps a SQLite course store reconciled
//! against a canonical catalog and routes embed replies through validated
//! per-guild channel snapshots.
//!
//! ## Modules
//!
//! - **commands**: Command registry and dispatch with permission gating
//! - **discord**: serenity gateway adapter and embed delivery
//! - **guild**: Per-guild channel/role snapshots for reply routing
//! - **messages**: Templated reply catalog
//! - **session**: Readiness flag gating dispatch
//! - **store**: Course records behind a storage trait (SQLite-backed)
//! - **sync**: Catalog reconciliation engine and refresh loop

pub mod commands;
pub mod config;
pub mod discord;
pub mod error;
pub mod guild;
pub mod messages;
pub mod session;
pub mod store;
pub mod sync;

pub use config::Config;
pub use error::{BotError, Result};
