//! Handlers for `/materias` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/materias` | Optional `?limit=<n>` row cap |
//! | `GET`  | `/materias/{id}` | Subject + its courses; 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use catedra_core::{
  catalog::{Course, Subject},
  store::CatalogStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Wire shapes ──────────────────────────────────────────────────────────────

/// Wire representation of a subject (original Spanish keys).
#[derive(Debug, Serialize)]
pub struct SubjectBody {
  pub id:           i64,
  pub nombre:       String,
  pub cuatrimestre: i64,
  pub anio:         i64,
}

impl From<Subject> for SubjectBody {
  fn from(s: Subject) -> Self {
    SubjectBody {
      id:           s.id,
      nombre:       s.name,
      cuatrimestre: s.term,
      anio:         s.year,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct SubjectsResponse {
  pub materias: Vec<SubjectBody>,
}

#[derive(Debug, Serialize)]
pub struct CourseRef {
  pub id:     i64,
  pub nombre: String,
}

impl From<Course> for CourseRef {
  fn from(c: Course) -> Self {
    CourseRef { id: c.id, nombre: c.name }
  }
}

#[derive(Debug, Serialize)]
pub struct SubjectDetailBody {
  pub id:           i64,
  pub nombre:       String,
  pub cuatrimestre: i64,
  pub anio:         i64,
  pub cursos:       Vec<CourseRef>,
}

#[derive(Debug, Serialize)]
pub struct SubjectDetailResponse {
  pub materia: SubjectDetailBody,
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /materias[?limit=<n>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<SubjectsResponse>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let subjects = state
    .store
    .list_subjects(params.limit)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(SubjectsResponse {
    materias: subjects.into_iter().map(SubjectBody::from).collect(),
  }))
}

// ─── Detail ───────────────────────────────────────────────────────────────────

/// `GET /materias/{id}` — subject plus its courses.
pub async fn detail<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<SubjectDetailResponse>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let detail = state
    .store
    .subject_with_courses(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("subject {id} not found")))?;

  Ok(Json(SubjectDetailResponse {
    materia: SubjectDetailBody {
      id:           detail.subject.id,
      nombre:       detail.subject.name,
      cuatrimestre: detail.subject.term,
      anio:         detail.subject.year,
      cursos:       detail.courses.into_iter().map(CourseRef::from).collect(),
    },
  }))
}
