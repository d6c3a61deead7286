//! Catalog synchronization.
//!
//! Handles:
//! - The canonical course listing and standing corrections
//! - Insert-missing / update-differing reconciliation passes
//! - The periodic refresh loop

pub mod catalog;
pub mod coordinator;
pub mod engine;

// Re-exports
pub use coordinator::SyncCoordinator;
pub use engine::{CatalogUpdates, ReconcileOutcome, ReconcileReport, SyncEngine};
