//! Reply templating.
//!
//! Handles:
//! - The template catalog (JSON file or built-in defaults)
//! - Placeholder substitution
//! - Transport-free reply descriptors

pub mod catalog;
pub mod reply;

// Re-exports
pub use catalog::{MessageCatalog, MessageTemplate, RENDERED_KEYS};
pub use reply::{ColorClass, Reply};
