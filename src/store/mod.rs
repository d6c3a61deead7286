//! Course record storage.
//!
//! This module defines the `RecordStore` trait - the seam between the
//! reconciliation engine and whatever holds the course records. Two
//! implementations ship with the bot:
//! - `SqliteStore`: the production store backed by SQLite
//! - `MockStore`: an in-memory double for tests with failure injection

pub mod mock;
pub mod sqlite;

pub use mock::MockStore;
pub use sqlite::SqliteStore;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;

/// A course record as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Catalog id, the primary key
    pub id: i64,
    /// Course name, e.g. "CS126L"
    pub name: String,
    /// Section number, e.g. "001"; lecture-only courses have none
    pub section: Option<String>,
}

impl Course {
    /// Create a course without a section.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            section: None,
        }
    }

    /// Set the section number.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Current value of one mutable field.
    pub fn field(&self, field: CourseField) -> Option<&str> {
        match field {
            CourseField::Name => Some(&self.name),
            CourseField::Section => self.section.as_deref(),
        }
    }
}

/// The mutable fields of a course record.
///
/// Updates may only name fields from this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CourseField {
    Name,
    Section,
}

impl CourseField {
    /// Column name in the courses table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Section => "section",
        }
    }
}

/// Field-to-value assignments applied by an update.
pub type FieldUpdates = BTreeMap<CourseField, String>;

/// Match conditions for lookups. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub section: Option<String>,
}

impl CourseFilter {
    /// Match a single record by id.
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Also require an exact name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Also require an exact section.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Whether a record satisfies every set condition.
    pub fn matches(&self, course: &Course) -> bool {
        if let Some(id) = self.id {
            if course.id != id {
                return false;
            }
        }
        if let Some(ref name) = self.name {
            if &course.name != name {
                return false;
            }
        }
        if let Some(ref section) = self.section {
            if course.section.as_deref() != Some(section.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Storage seam for course records.
///
/// All operations are non-destructive by default: `insert` refuses to
/// overwrite an existing record and `update` touches only the named fields.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether any record matches the filter.
    async fn exists(&self, filter: &CourseFilter) -> Result<bool>;

    /// Insert a record unless its id is already present.
    ///
    /// Returns `true` when a row was written, `false` when the id existed.
    async fn insert(&self, course: &Course) -> Result<bool>;

    /// Overwrite the named fields of one record.
    ///
    /// Returns `true` when the record existed, `false` otherwise. Fields
    /// not named in `updates` keep their current values.
    async fn update(&self, id: i64, updates: &FieldUpdates) -> Result<bool>;

    /// Delete one record by id. Returns `true` when a row was removed.
    async fn remove(&self, id: i64) -> Result<bool>;

    /// Fetch records matching the filter, ordered by id. `None` fetches all.
    async fn retrieve(&self, filter: Option<&CourseFilter>) -> Result<Vec<Course>>;

    /// Total number of records on hand.
    async fn count(&self) -> Result<usize>;
}
