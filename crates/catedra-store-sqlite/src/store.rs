//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use catedra_core::{
  catalog::{Assignment, Course, Subject},
  repository::{NewRepository, Repository, RepositoryReplacement},
  store::{AssignmentDetail, CatalogStore, CourseDetail, SubjectDetail},
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{RawRepository, encode_dt},
  schema::SCHEMA,
};

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn subject_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subject> {
  Ok(Subject {
    id:   row.get(0)?,
    name: row.get(1)?,
    term: row.get(2)?,
    year: row.get(3)?,
  })
}

fn course_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Course> {
  Ok(Course {
    id:         row.get(0)?,
    name:       row.get(1)?,
    subject_id: row.get(2)?,
  })
}

fn assignment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Assignment> {
  Ok(Assignment {
    id:          row.get(0)?,
    name:        row.get(1)?,
    description: row.get(2)?,
    course_id:   row.get(3)?,
  })
}

fn repository_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRepository> {
  Ok(RawRepository {
    id:             row.get(0)?,
    titulo:         row.get(1)?,
    full_name:      row.get(2)?,
    descripcion:    row.get(3)?,
    calificacion:   row.get(4)?,
    id_usuario:     row.get(5)?,
    fecha_creacion: row.get(6)?,
    id_tp:          row.get(7)?,
  })
}

const REPOSITORY_COLUMNS: &str =
  "id, titulo, full_name, descripcion, calificacion, id_usuario, fecha_creacion, id_tp";

/// `LIMIT -1` disables the cap in SQLite.
fn limit_value(limit: Option<usize>) -> i64 { limit.map_or(-1, |n| n as i64) }

/// Map a primary-key violation on `repositorios` to `DuplicateRepository`.
/// The in-transaction pre-check is only a fast path; the constraint is the
/// authoritative guard.
fn duplicate_or_db(id: i64, e: tokio_rusqlite::Error) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _)) = &e
    && f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
  {
    return Error::DuplicateRepository(id);
  }
  Error::Database(e)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A catedra catalog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Catalog seeding ───────────────────────────────────────────────────
  // Subjects, courses and assignments are read-only over HTTP; these
  // inserts back the out-of-band bulk load and the test fixtures.

  pub async fn insert_subject(&self, subject: Subject) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO materias (id, nombre, cuatrimestre, anio) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![subject.id, subject.name, subject.term, subject.year],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  pub async fn insert_course(&self, course: Course) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO cursos (id, nombre, id_materia) VALUES (?1, ?2, ?3)",
          rusqlite::params![course.id, course.name, course.subject_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  pub async fn insert_assignment(&self, assignment: Assignment) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO tps (id, nombre, descripcion, id_curso) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![
            assignment.id,
            assignment.name,
            assignment.description,
            assignment.course_id,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Catalog reads ─────────────────────────────────────────────────────

  async fn list_subjects(&self, limit: Option<usize>) -> Result<Vec<Subject>> {
    let limit_val = limit_value(limit);

    let subjects = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, nombre, cuatrimestre, anio FROM materias ORDER BY id LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], subject_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(subjects)
  }

  async fn subject_with_courses(&self, id: i64) -> Result<Option<SubjectDetail>> {
    let detail = self
      .conn
      .call(move |conn| {
        let subject = conn
          .query_row(
            "SELECT id, nombre, cuatrimestre, anio FROM materias WHERE id = ?1",
            rusqlite::params![id],
            subject_from_row,
          )
          .optional()?;
        let Some(subject) = subject else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(
          "SELECT id, nombre, id_materia FROM cursos WHERE id_materia = ?1 ORDER BY id",
        )?;
        let courses = stmt
          .query_map(rusqlite::params![id], course_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(SubjectDetail { subject, courses }))
      })
      .await?;

    Ok(detail)
  }

  async fn course_with_relations(&self, id: i64) -> Result<Option<CourseDetail>> {
    let detail = self
      .conn
      .call(move |conn| {
        let course = conn
          .query_row(
            "SELECT id, nombre, id_materia FROM cursos WHERE id = ?1",
            rusqlite::params![id],
            course_from_row,
          )
          .optional()?;
        let Some(course) = course else {
          return Ok(None);
        };

        // The owning subject is required for the nested view; a NULL or
        // dangling link makes the whole lookup miss.
        let Some(subject_id) = course.subject_id else {
          return Ok(None);
        };
        let subject = conn
          .query_row(
            "SELECT id, nombre, cuatrimestre, anio FROM materias WHERE id = ?1",
            rusqlite::params![subject_id],
            subject_from_row,
          )
          .optional()?;
        let Some(subject) = subject else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(
          "SELECT id, nombre, descripcion, id_curso FROM tps WHERE id_curso = ?1 ORDER BY id",
        )?;
        let assignments = stmt
          .query_map(rusqlite::params![id], assignment_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(CourseDetail { course, assignments, subject }))
      })
      .await?;

    Ok(detail)
  }

  async fn assignment_with_relations(&self, id: i64) -> Result<Option<AssignmentDetail>> {
    let detail = self
      .conn
      .call(move |conn| {
        let assignment = conn
          .query_row(
            "SELECT id, nombre, descripcion, id_curso FROM tps WHERE id = ?1",
            rusqlite::params![id],
            assignment_from_row,
          )
          .optional()?;
        let Some(assignment) = assignment else {
          return Ok(None);
        };

        let Some(course_id) = assignment.course_id else {
          return Ok(None);
        };
        let course = conn
          .query_row(
            "SELECT id, nombre, id_materia FROM cursos WHERE id = ?1",
            rusqlite::params![course_id],
            course_from_row,
          )
          .optional()?;
        let Some(course) = course else {
          return Ok(None);
        };

        let Some(subject_id) = course.subject_id else {
          return Ok(None);
        };
        let subject = conn
          .query_row(
            "SELECT id, nombre, cuatrimestre, anio FROM materias WHERE id = ?1",
            rusqlite::params![subject_id],
            subject_from_row,
          )
          .optional()?;
        let Some(subject) = subject else {
          return Ok(None);
        };

        Ok(Some(AssignmentDetail { assignment, course, subject }))
      })
      .await?;

    Ok(detail)
  }

  async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>> {
    let assignment = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, nombre, descripcion, id_curso FROM tps WHERE id = ?1",
              rusqlite::params![id],
              assignment_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(assignment)
  }

  // ── Repositories ──────────────────────────────────────────────────────

  async fn list_repositories(
    &self,
    assignment_id: i64,
    limit: Option<usize>,
  ) -> Result<Vec<Repository>> {
    let limit_val = limit_value(limit);

    let raws: Vec<RawRepository> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REPOSITORY_COLUMNS} FROM repositorios
           WHERE id_tp = ?1 ORDER BY id LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![assignment_id, limit_val], repository_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRepository::into_repository).collect()
  }

  async fn get_repository(&self, assignment_id: i64, id: i64) -> Result<Option<Repository>> {
    let raw: Option<RawRepository> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {REPOSITORY_COLUMNS} FROM repositorios
                 WHERE id = ?1 AND id_tp = ?2"
              ),
              rusqlite::params![id, assignment_id],
              repository_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRepository::into_repository).transpose()
  }

  async fn repository_exists(&self, id: i64) -> Result<bool> {
    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM repositorios WHERE id = ?1",
              rusqlite::params![id],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn create_repository(&self, input: NewRepository) -> Result<Repository> {
    let repo = Repository {
      id:            input.id,
      title:         input.title,
      full_name:     input.full_name,
      description:   input.description,
      rating:        input.rating,
      owner:         input.owner,
      created_at:    Utc::now(),
      assignment_id: input.assignment_id,
    };

    let id           = repo.id;
    let titulo       = repo.title.clone();
    let full_name    = repo.full_name.clone();
    let descripcion  = repo.description.clone();
    let calificacion = repo.rating;
    let id_usuario   = repo.owner.clone();
    let fecha_str    = encode_dt(repo.created_at);
    let id_tp        = repo.assignment_id;

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken = tx
          .query_row(
            "SELECT 1 FROM repositorios WHERE id = ?1",
            rusqlite::params![id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }

        tx.execute(
          "INSERT INTO repositorios (
             id, titulo, full_name, descripcion,
             calificacion, id_usuario, fecha_creacion, id_tp
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id,
            titulo,
            full_name,
            descripcion,
            calificacion,
            id_usuario,
            fecha_str,
            id_tp,
          ],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await
      .map_err(|e| duplicate_or_db(id, e))?;

    if !inserted {
      return Err(Error::DuplicateRepository(id));
    }

    Ok(repo)
  }

  async fn replace_repository(
    &self,
    assignment_id: i64,
    id: i64,
    changes: RepositoryReplacement,
  ) -> Result<Repository> {
    let titulo      = changes.title;
    let descripcion = changes.description;

    let affected = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = tx.execute(
          "UPDATE repositorios SET titulo = ?1, descripcion = ?2
           WHERE id = ?3 AND id_tp = ?4",
          rusqlite::params![titulo, descripcion, id, assignment_id],
        )?;
        tx.commit()?;
        Ok(n)
      })
      .await?;

    if affected == 0 {
      return Err(Error::RepositoryNotFound(id));
    }

    self
      .get_repository(assignment_id, id)
      .await?
      .ok_or(Error::RepositoryNotFound(id))
  }

  async fn rate_repository(
    &self,
    assignment_id: i64,
    id: i64,
    rating: i64,
  ) -> Result<Repository> {
    let affected = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = tx.execute(
          "UPDATE repositorios SET calificacion = ?1 WHERE id = ?2 AND id_tp = ?3",
          rusqlite::params![rating, id, assignment_id],
        )?;
        tx.commit()?;
        Ok(n)
      })
      .await?;

    if affected == 0 {
      return Err(Error::RepositoryNotFound(id));
    }

    self
      .get_repository(assignment_id, id)
      .await?
      .ok_or(Error::RepositoryNotFound(id))
  }

  async fn delete_repository(&self, assignment_id: i64, id: i64) -> Result<()> {
    let affected = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = tx.execute(
          "DELETE FROM repositorios WHERE id = ?1 AND id_tp = ?2",
          rusqlite::params![id, assignment_id],
        )?;
        tx.commit()?;
        Ok(n)
      })
      .await?;

    if affected == 0 {
      return Err(Error::RepositoryNotFound(id));
    }

    Ok(())
  }
}
