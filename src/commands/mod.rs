//! Command routing.
//!
//! Handles:
//! - The closed command set with help text and admin gating
//! - Trigger registration (prefix + keyword, case-insensitive)
//! - Dispatch with the readiness / trigger / authorization ordering

pub mod command;
pub mod dispatcher;

// Re-exports
pub use command::{Command, CommandRegistry};
pub use dispatcher::{Dispatcher, DispatcherConfig, InboundMessage};
