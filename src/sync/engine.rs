//! Catalog reconciliation engine.
//!
//! A pass walks the canonical listing, inserts every course the store is
//! missing, then applies the standing corrections to records whose fields
//! drifted. Passes never throw: the outcome, good or bad, is folded into a
//! `ReconcileReport` and the session flag is flipped accordingly.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::session::SessionState;
use crate::store::{Course, CourseFilter, FieldUpdates, RecordStore};

use super::catalog;

/// Standing corrections, keyed by course id.
pub type CatalogUpdates = BTreeMap<i64, FieldUpdates>;

/// How a reconciliation pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The pass ran to completion.
    Completed,
    /// The pass aborted; the store may be partially reconciled.
    Failed(String),
    /// Another pass was already in flight; nothing was touched.
    Skipped,
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub outcome: ReconcileOutcome,
    /// Canonical courses newly written to the store
    pub inserted: usize,
    /// Records whose fields were corrected
    pub updated: usize,
    /// Canonical courses already present and left alone
    pub unchanged: usize,
    /// Total records on hand after the pass
    pub courses: usize,
    pub finished_at: DateTime<Utc>,
}

impl ReconcileReport {
    fn completed(inserted: usize, updated: usize, unchanged: usize, courses: usize) -> Self {
        Self {
            outcome: ReconcileOutcome::Completed,
            inserted,
            updated,
            unchanged,
            courses,
            finished_at: Utc::now(),
        }
    }

    fn failed(reason: String) -> Self {
        Self {
            outcome: ReconcileOutcome::Failed(reason),
            inserted: 0,
            updated: 0,
            unchanged: 0,
            courses: 0,
            finished_at: Utc::now(),
        }
    }

    fn skipped() -> Self {
        Self {
            outcome: ReconcileOutcome::Skipped,
            inserted: 0,
            updated: 0,
            unchanged: 0,
            courses: 0,
            finished_at: Utc::now(),
        }
    }
}

/// Reconciles the record store against the canonical catalog.
pub struct SyncEngine {
    store: Arc<dyn RecordStore>,
    session: Arc<SessionState>,
    canonical: Vec<Course>,
    updates: CatalogUpdates,
    pass_guard: Mutex<()>,
}

impl SyncEngine {
    /// Create an engine over the built-in catalog.
    pub fn new(store: Arc<dyn RecordStore>, session: Arc<SessionState>) -> Self {
        Self {
            store,
            session,
            canonical: catalog::courses(),
            updates: catalog::standing_updates(),
            pass_guard: Mutex::new(()),
        }
    }

    /// Swap in a different catalog.
    pub fn with_catalog(mut self, canonical: Vec<Course>, updates: CatalogUpdates) -> Self {
        self.canonical = canonical;
        self.updates = updates;
        self
    }

    /// Run a pass against the configured catalog.
    pub async fn refresh(&self) -> ReconcileReport {
        self.reconcile(&self.canonical, &self.updates).await
    }

    /// Run a pass against the given catalog.
    ///
    /// At most one pass runs at a time; a pass that finds another in
    /// flight reports `Skipped` and leaves the session flag alone. A
    /// completed pass opens the session, a failed one closes it.
    pub async fn reconcile(
        &self,
        canonical: &[Course],
        updates: &CatalogUpdates,
    ) -> ReconcileReport {
        let Ok(_guard) = self.pass_guard.try_lock() else {
            debug!("Reconciliation already in flight, skipping this pass");
            return ReconcileReport::skipped();
        };

        match self.run_pass(canonical, updates).await {
            Ok(report) => {
                info!(
                    inserted = report.inserted,
                    updated = report.updated,
                    unchanged = report.unchanged,
                    courses = report.courses,
                    "Catalog reconciled"
                );
                self.session.mark_ready().await;
                report
            }
            Err(e) => {
                error!(error = %e, "Reconciliation pass failed");
                self.session.mark_not_ready().await;
                ReconcileReport::failed(e.to_string())
            }
        }
    }

    /// Whether applying `updates` to the record would change any field.
    ///
    /// A record that is not on hand never needs an update; inserting it is
    /// the listing walk's job.
    pub async fn needs_update(&self, id: i64, updates: &FieldUpdates) -> Result<bool> {
        let records = self.store.retrieve(Some(&CourseFilter::by_id(id))).await?;
        let Some(record) = records.first() else {
            return Ok(false);
        };
        Ok(updates
            .iter()
            .any(|(field, value)| record.field(*field) != Some(value.as_str())))
    }

    async fn run_pass(
        &self,
        canonical: &[Course],
        updates: &CatalogUpdates,
    ) -> Result<ReconcileReport> {
        let mut inserted = 0;
        let mut unchanged = 0;
        for course in canonical {
            if self.store.insert(course).await? {
                inserted += 1;
            } else {
                unchanged += 1;
            }
        }

        let mut updated = 0;
        for (id, fields) in updates {
            if self.needs_update(*id, fields).await? {
                self.store.update(*id, fields).await?;
                updated += 1;
            }
        }

        let courses = self.store.count().await?;
        Ok(ReconcileReport::completed(inserted, updated, unchanged, courses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CourseField, MockStore};

    fn engine_with(store: MockStore) -> (SyncEngine, Arc<SessionState>) {
        let session = Arc::new(SessionState::new());
        let engine = SyncEngine::new(Arc::new(store), session.clone());
        (engine, session)
    }

    fn rename(id: i64, name: &str) -> CatalogUpdates {
        let mut fields = FieldUpdates::new();
        fields.insert(CourseField::Name, name.to_string());
        let mut updates = CatalogUpdates::new();
        updates.insert(id, fields);
        updates
    }

    #[tokio::test]
    async fn needs_update_is_false_for_absent_record() {
        let (engine, _) = engine_with(MockStore::new());
        let mut fields = FieldUpdates::new();
        fields.insert(CourseField::Name, "CS126 - Combo Class".to_string());
        assert!(!engine.needs_update(1001, &fields).await.unwrap());
    }

    #[tokio::test]
    async fn needs_update_is_false_when_fields_match() {
        let store = MockStore::new().with_records(vec![Course::new(1001, "CS126")]);
        let (engine, _) = engine_with(store);

        let mut fields = FieldUpdates::new();
        fields.insert(CourseField::Name, "CS126".to_string());
        assert!(!engine.needs_update(1001, &fields).await.unwrap());
    }

    #[tokio::test]
    async fn needs_update_is_true_when_any_field_differs() {
        let store = MockStore::new()
            .with_records(vec![Course::new(1002, "CS126L").with_section("001")]);
        let (engine, _) = engine_with(store);

        // name matches, section differs
        let mut fields = FieldUpdates::new();
        fields.insert(CourseField::Name, "CS126L".to_string());
        fields.insert(CourseField::Section, "002".to_string());
        assert!(engine.needs_update(1002, &fields).await.unwrap());
    }

    #[tokio::test]
    async fn needs_update_treats_missing_section_as_different() {
        let store = MockStore::new().with_records(vec![Course::new(1001, "CS126")]);
        let (engine, _) = engine_with(store);

        let mut fields = FieldUpdates::new();
        fields.insert(CourseField::Section, "001".to_string());
        assert!(engine.needs_update(1001, &fields).await.unwrap());
    }

    #[tokio::test]
    async fn completed_pass_opens_session() {
        let (engine, session) = engine_with(MockStore::new());
        assert!(!session.is_ready().await);

        let report = engine.refresh().await;
        assert_eq!(report.outcome, ReconcileOutcome::Completed);
        assert_eq!(report.inserted, 6);
        assert_eq!(report.courses, 6);
        assert!(session.is_ready().await);
    }

    #[tokio::test]
    async fn failed_pass_closes_session_and_reports_reason() {
        let (engine, session) = engine_with(MockStore::new().with_failure(true));

        let report = engine.refresh().await;
        let ReconcileOutcome::Failed(reason) = report.outcome else {
            panic!("expected a failed pass, got {:?}", report.outcome);
        };
        assert!(reason.contains("mock store failure"));
        assert!(!session.is_ready().await);
    }

    #[tokio::test]
    async fn reconcile_applies_standing_updates_once() {
        let (engine, _) = engine_with(MockStore::new());
        let canonical = vec![Course::new(1001, "CS126")];
        let updates = rename(1001, "CS126 - Combo Class");

        let first = engine.reconcile(&canonical, &updates).await;
        assert_eq!(first.inserted, 1);
        assert_eq!(first.updated, 1);

        let second = engine.reconcile(&canonical, &updates).await;
        assert_eq!(second.inserted, 0);
        assert_eq!(second.updated, 0);
        assert_eq!(second.unchanged, 1);
    }

    #[tokio::test]
    async fn overlapping_pass_is_skipped() {
        let store = MockStore::new().with_latency(std::time::Duration::from_millis(50));
        let (engine, session) = engine_with(store);

        let (first, second) = tokio::join!(engine.refresh(), engine.refresh());

        let outcomes = [first.outcome.clone(), second.outcome.clone()];
        assert!(outcomes.contains(&ReconcileOutcome::Completed));
        assert!(outcomes.contains(&ReconcileOutcome::Skipped));
        assert!(session.is_ready().await);
    }
}
