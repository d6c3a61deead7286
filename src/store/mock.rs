//! Mock record store for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Course, CourseFilter, FieldUpdates, RecordStore};
use crate::error::{BotError, Result};

/// In-memory record store for tests.
///
/// Supports failure injection, artificial latency, and write counters so
/// tests can assert that a code path did (or did not) touch storage.
pub struct MockStore {
    records: Mutex<BTreeMap<i64, Course>>,
    fail: AtomicBool,
    latency: Option<Duration>,
    insert_calls: AtomicU32,
    update_calls: AtomicU32,
}

impl MockStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
            fail: AtomicBool::new(false),
            latency: None,
            insert_calls: AtomicU32::new(0),
            update_calls: AtomicU32::new(0),
        }
    }

    /// Seed the store with records.
    pub fn with_records(mut self, courses: Vec<Course>) -> Self {
        let records = self.records.get_mut();
        for course in courses {
            records.insert(course.id, course);
        }
        self
    }

    /// Make every operation fail.
    pub fn with_failure(self, fail: bool) -> Self {
        self.fail.store(fail, Ordering::SeqCst);
        self
    }

    /// Delay every operation, for exercising overlapping passes.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of times insert was called.
    pub fn insert_count(&self) -> u32 {
        self.insert_calls.load(Ordering::SeqCst)
    }

    /// Number of times update was called.
    pub fn update_count(&self) -> u32 {
        self.update_calls.load(Ordering::SeqCst)
    }

    async fn simulate(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(BotError::Store("mock store failure".to_string()));
        }
        Ok(())
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn exists(&self, filter: &CourseFilter) -> Result<bool> {
        self.simulate().await?;
        let records = self.records.lock().await;
        Ok(records.values().any(|course| filter.matches(course)))
    }

    async fn insert(&self, course: &Course) -> Result<bool> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;

        let mut records = self.records.lock().await;
        if records.contains_key(&course.id) {
            return Ok(false);
        }
        records.insert(course.id, course.clone());
        Ok(true)
    }

    async fn update(&self, id: i64, updates: &FieldUpdates) -> Result<bool> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;

        if updates.is_empty() {
            return Ok(false);
        }

        let mut records = self.records.lock().await;
        let Some(course) = records.get_mut(&id) else {
            return Ok(false);
        };
        for (field, value) in updates {
            match field {
                super::CourseField::Name => course.name = value.clone(),
                super::CourseField::Section => course.section = Some(value.clone()),
            }
        }
        Ok(true)
    }

    async fn remove(&self, id: i64) -> Result<bool> {
        self.simulate().await?;
        let mut records = self.records.lock().await;
        Ok(records.remove(&id).is_some())
    }

    async fn retrieve(&self, filter: Option<&CourseFilter>) -> Result<Vec<Course>> {
        self.simulate().await?;
        let records = self.records.lock().await;
        Ok(records
            .values()
            .filter(|course| filter.map_or(true, |f| f.matches(course)))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        self.simulate().await?;
        let records = self.records.lock().await;
        Ok(records.len())
    }
}
