//! Session readiness tracking.
//!
//! Commands are refused until the first catalog reconciliation finishes, and
//! again whenever a later pass fails outright.

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Default)]
struct Inner {
    ready: bool,
    last_refresh_at: Option<DateTime<Utc>>,
}

/// Shared readiness flag consulted before any command is dispatched.
#[derive(Debug, Default)]
pub struct SessionState {
    inner: RwLock<Inner>,
}

impl SessionState {
    /// Create a session that is not yet ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether commands may currently be dispatched.
    pub async fn is_ready(&self) -> bool {
        self.inner.read().await.ready
    }

    /// When the last successful catalog refresh finished.
    pub async fn last_refresh_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_refresh_at
    }

    /// Record a successful refresh and open the session for commands.
    pub async fn mark_ready(&self) {
        let mut inner = self.inner.write().await;
        if !inner.ready {
            info!("Session ready, accepting commands");
        }
        inner.ready = true;
        inner.last_refresh_at = Some(Utc::now());
    }

    /// Close the session; commands are refused until the next good refresh.
    pub async fn mark_not_ready(&self) {
        let mut inner = self.inner.write().await;
        if inner.ready {
            warn!("Session no longer ready, refusing commands");
        }
        inner.ready = false;
    }
}
