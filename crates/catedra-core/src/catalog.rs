//! The read-only levels of the catalog tree: subjects, courses, assignments.
//!
//! These rows are created out-of-band (the bulk seed load); the HTTP surface
//! only ever reads them.

use serde::{Deserialize, Serialize};

/// A subject offering for a given term and year. Top of the catalog tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
  pub id:   i64,
  pub name: String,
  /// Term number within the year: 1 or 2.
  pub term: i64,
  pub year: i64,
}

/// A teaching section belonging to a subject.
///
/// The subject link is nullable in storage, but every nested lookup treats it
/// as required: a course with no owning subject resolves as missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
  pub id:         i64,
  pub name:       String,
  pub subject_id: Option<i64>,
}

/// A unit of work belonging to a course, with a Markdown description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
  pub id:          i64,
  pub name:        String,
  pub description: String,
  pub course_id:   Option<i64>,
}
