//! Canonical course catalog.
//!
//! The listing below is the source of truth the store is reconciled
//! against. Standing corrections are applied after the listing, so a
//! record can be seeded under its registrar name and then renamed for
//! display without losing its identity.

use crate::store::{Course, CourseField, FieldUpdates};

use super::engine::CatalogUpdates;

/// The canonical course listing for the current term.
pub fn courses() -> Vec<Course> {
    vec![
        Course::new(1001, "CS126"),
        Course::new(1002, "CS126L").with_section("001"),
        Course::new(1003, "CS126L").with_section("002"),
        Course::new(1004, "CS126L").with_section("003"),
        Course::new(5005, "CS249").with_section("001"),
        Course::new(5006, "CS249").with_section("002"),
    ]
}

/// Standing corrections applied on every reconciliation pass.
pub fn standing_updates() -> CatalogUpdates {
    let mut updates = CatalogUpdates::new();

    // The CS126 lecture and lab are listed together this term
    let mut combo = FieldUpdates::new();
    combo.insert(CourseField::Name, "CS126 - Combo Class".to_string());
    updates.insert(1001, combo);

    updates
}
