//! Periodic reconciliation driver.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::engine::{ReconcileOutcome, SyncEngine};

/// Reruns the reconciliation pass on a fixed interval.
///
/// The first pass runs as soon as the coordinator starts, so the session
/// opens without waiting a full interval.
pub struct SyncCoordinator {
    engine: Arc<SyncEngine>,
    refresh_interval: Duration,
}

impl SyncCoordinator {
    pub fn new(engine: Arc<SyncEngine>, refresh_interval_secs: u64) -> Self {
        Self {
            engine,
            refresh_interval: Duration::from_secs(refresh_interval_secs),
        }
    }

    /// Run the refresh loop. Never returns.
    pub async fn run(self) {
        info!(
            interval_secs = self.refresh_interval.as_secs(),
            "Catalog refresh loop started"
        );
        let mut timer = tokio::time::interval(self.refresh_interval);

        loop {
            timer.tick().await;
            let report = self.engine.refresh().await;
            match report.outcome {
                ReconcileOutcome::Completed => {
                    debug!(
                        inserted = report.inserted,
                        updated = report.updated,
                        "Scheduled refresh complete"
                    );
                }
                ReconcileOutcome::Failed(reason) => {
                    warn!(%reason, "Scheduled refresh failed, will retry next interval");
                }
                ReconcileOutcome::Skipped => {
                    debug!("Scheduled refresh skipped, another pass in flight");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use crate::store::MockStore;

    #[tokio::test]
    async fn first_tick_runs_immediately() {
        let session = Arc::new(SessionState::new());
        let engine = Arc::new(SyncEngine::new(
            Arc::new(MockStore::new()),
            session.clone(),
        ));
        let coordinator = SyncCoordinator::new(engine, 3600);

        let handle = tokio::spawn(coordinator.run());
        // The interval's first tick fires at once; poll until the session opens.
        for _ in 0..50 {
            if session.is_ready().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(session.is_ready().await);
        handle.abort();
    }
}
