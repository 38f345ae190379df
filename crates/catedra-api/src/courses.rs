//! Handler for `/cursos/{id}`.
//!
//! The course detail view needs the whole parent chain: its assignments and
//! its owning subject. A course whose subject link is missing is a 404, never
//! a partial response.

use axum::{
  Json,
  extract::{Path, State},
};
use catedra_core::{catalog::Assignment, store::CatalogStore};
use serde::Serialize;

use crate::{AppState, error::ApiError, subjects::SubjectBody};

// ─── Wire shapes ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AssignmentRef {
  pub id:          i64,
  pub nombre:      String,
  pub descripcion: String,
}

impl From<Assignment> for AssignmentRef {
  fn from(a: Assignment) -> Self {
    AssignmentRef {
      id:          a.id,
      nombre:      a.name,
      descripcion: a.description,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct CourseDetailBody {
  pub id:      i64,
  pub nombre:  String,
  pub tps:     Vec<AssignmentRef>,
  pub materia: SubjectBody,
}

#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
  pub curso: CourseDetailBody,
}

// ─── Detail ───────────────────────────────────────────────────────────────────

/// `GET /cursos/{id}` — course plus its assignments and owning subject.
pub async fn detail<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<CourseDetailResponse>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let detail = state
    .store
    .course_with_relations(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("course {id} not found")))?;

  Ok(Json(CourseDetailResponse {
    curso: CourseDetailBody {
      id:      detail.course.id,
      nombre:  detail.course.name,
      tps:     detail.assignments.into_iter().map(AssignmentRef::from).collect(),
      materia: SubjectBody::from(detail.subject),
    },
  }))
}
