//! SQLite-backed course store.
//!
//! Records live in a single `courses` table. Inserts go through
//! `INSERT OR IGNORE` so an existing record is never overwritten, and
//! updates rewrite only the named columns.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection, ToSql};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{Course, CourseFilter, FieldUpdates, RecordStore};
use crate::error::Result;

/// Production record store backed by SQLite.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path`.
    ///
    /// With `reset_on_start` the course table is dropped and rebuilt, which
    /// discards any operator edits.
    pub fn open(path: &Path, reset_on_start: bool) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;

        // Enable WAL mode for concurrent read access
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        if reset_on_start {
            conn.execute_batch("DROP TABLE IF EXISTS courses;")?;
            info!("Course table reset");
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS courses (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                section TEXT
            );",
        )?;

        info!(path = %path.display(), "Course store opened");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS courses (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                section TEXT
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// WHERE clause and parameters for a filter. Empty filter yields no clause.
fn where_clause(filter: &CourseFilter) -> (String, Vec<Box<dyn ToSql>>) {
    let mut conditions: Vec<&'static str> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(id) = filter.id {
        conditions.push("id = ?");
        params.push(Box::new(id));
    }
    if let Some(ref name) = filter.name {
        conditions.push("name = ?");
        params.push(Box::new(name.clone()));
    }
    if let Some(ref section) = filter.section {
        conditions.push("section = ?");
        params.push(Box::new(section.clone()));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };
    (clause, params)
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn exists(&self, filter: &CourseFilter) -> Result<bool> {
        let conn = self.conn.lock().await;
        let (clause, params) = where_clause(filter);
        let sql = format!("SELECT 1 FROM courses{} LIMIT 1", clause);
        let mut stmt = conn.prepare_cached(&sql)?;

        let result = stmt.query_row(
            params_from_iter(params.iter().map(|p| p.as_ref())),
            |_row| Ok(()),
        );

        match result {
            Ok(()) => Ok(true),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert(&self, course: &Course) -> Result<bool> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(
            "INSERT OR IGNORE INTO courses (id, name, section) VALUES (?1, ?2, ?3)",
        )?;
        let changed = stmt.execute(rusqlite::params![
            course.id,
            course.name,
            course.section
        ])?;

        if changed > 0 {
            debug!(id = course.id, name = %course.name, "Inserted course");
        }
        Ok(changed > 0)
    }

    async fn update(&self, id: i64, updates: &FieldUpdates) -> Result<bool> {
        if updates.is_empty() {
            return Ok(false);
        }

        let conn = self.conn.lock().await;
        let assignments: Vec<String> = updates
            .keys()
            .map(|field| format!("{} = ?", field.column()))
            .collect();
        let sql = format!(
            "UPDATE courses SET {} WHERE id = ?",
            assignments.join(", ")
        );

        let mut params: Vec<Box<dyn ToSql>> = updates
            .values()
            .map(|value| Box::new(value.clone()) as Box<dyn ToSql>)
            .collect();
        params.push(Box::new(id));

        let mut stmt = conn.prepare_cached(&sql)?;
        let changed = stmt.execute(params_from_iter(params.iter().map(|p| p.as_ref())))?;

        if changed > 0 {
            debug!(id, fields = updates.len(), "Updated course");
        }
        Ok(changed > 0)
    }

    async fn remove(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached("DELETE FROM courses WHERE id = ?1")?;
        let changed = stmt.execute(rusqlite::params![id])?;

        if changed > 0 {
            debug!(id, "Removed course");
        }
        Ok(changed > 0)
    }

    async fn retrieve(&self, filter: Option<&CourseFilter>) -> Result<Vec<Course>> {
        let conn = self.conn.lock().await;
        let (clause, params) = match filter {
            Some(filter) => where_clause(filter),
            None => (String::new(), Vec::new()),
        };
        let sql = format!("SELECT id, name, section FROM courses{} ORDER BY id", clause);
        let mut stmt = conn.prepare_cached(&sql)?;

        let rows = stmt.query_map(
            params_from_iter(params.iter().map(|p| p.as_ref())),
            |row| {
                Ok(Course {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    section: row.get(2)?,
                })
            },
        )?;

        let mut courses = Vec::new();
        for row in rows {
            courses.push(row?);
        }
        Ok(courses)
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
