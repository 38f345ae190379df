//! JSON seed-catalog loader.
//!
//! Subjects, courses and assignments are read-only over HTTP; deployments
//! load them from a catalog file at startup. Nesting in the file mirrors the
//! catalog tree, so foreign keys never appear in the input.

use std::path::Path;

use catedra_core::catalog::{Assignment, Course, Subject};
use catedra_store_sqlite::SqliteStore;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SeedCatalog {
  #[serde(default)]
  subjects: Vec<SeedSubject>,
}

#[derive(Debug, Deserialize)]
struct SeedSubject {
  id:   i64,
  name: String,
  term: i64,
  year: i64,
  #[serde(default)]
  courses: Vec<SeedCourse>,
}

#[derive(Debug, Deserialize)]
struct SeedCourse {
  id:   i64,
  name: String,
  #[serde(default)]
  assignments: Vec<SeedAssignment>,
}

#[derive(Debug, Deserialize)]
struct SeedAssignment {
  id:          i64,
  name:        String,
  description: String,
}

/// Row counts inserted by [`load`].
pub struct Loaded {
  pub subjects:    usize,
  pub courses:     usize,
  pub assignments: usize,
}

pub async fn load(store: &SqliteStore, path: &Path) -> anyhow::Result<Loaded> {
  let text = std::fs::read_to_string(path)?;
  let catalog: SeedCatalog = serde_json::from_str(&text)?;

  let mut loaded = Loaded { subjects: 0, courses: 0, assignments: 0 };

  for subject in catalog.subjects {
    let SeedSubject { id, name, term, year, courses } = subject;
    store
      .insert_subject(Subject { id, name, term, year })
      .await?;
    loaded.subjects += 1;

    for course in courses {
      let SeedCourse { id: course_id, name, assignments } = course;
      store
        .insert_course(Course {
          id:         course_id,
          name,
          subject_id: Some(id),
        })
        .await?;
      loaded.courses += 1;

      for assignment in assignments {
        store
          .insert_assignment(Assignment {
            id:          assignment.id,
            name:        assignment.name,
            description: assignment.description,
            course_id:   Some(course_id),
          })
          .await?;
        loaded.assignments += 1;
      }
    }
  }

  Ok(loaded)
}
