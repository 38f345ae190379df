//! Handlers for `/tps` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/tps/{id}` | Assignment + course + subject refs |
//! | `GET`  | `/tps/{id}/descripcion_html` | Markdown description rendered to HTML |
//!
//! The detail response is a bare object with no wrapper key, a historical
//! wire shape kept for compatibility with existing clients.

use axum::{
  Json,
  extract::{Path, State},
  response::Html,
};
use catedra_core::store::CatalogStore;
use serde::Serialize;

use crate::{AppState, error::ApiError};

// ─── Wire shapes ──────────────────────────────────────────────────────────────

/// Minimal `{id, nombre}` reference used for the parent links.
#[derive(Debug, Serialize)]
pub struct NameRef {
  pub id:     i64,
  pub nombre: String,
}

#[derive(Debug, Serialize)]
pub struct AssignmentDetailBody {
  pub id:      i64,
  pub nombre:  String,
  pub curso:   NameRef,
  pub materia: NameRef,
}

// ─── Detail ───────────────────────────────────────────────────────────────────

/// `GET /tps/{id}` — assignment plus references to its course and subject.
pub async fn detail<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<AssignmentDetailBody>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let detail = state
    .store
    .assignment_with_relations(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("assignment {id} not found")))?;

  Ok(Json(AssignmentDetailBody {
    id:      detail.assignment.id,
    nombre:  detail.assignment.name,
    curso:   NameRef {
      id:     detail.course.id,
      nombre: detail.course.name,
    },
    materia: NameRef {
      id:     detail.subject.id,
      nombre: detail.subject.name,
    },
  }))
}

// ─── Rendered description ─────────────────────────────────────────────────────

/// `GET /tps/{id}/descripcion_html` — the assignment's Markdown description
/// rendered to HTML, returned as a raw `text/html` body.
pub async fn description_html<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Html<String>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let assignment = state
    .store
    .get_assignment(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("assignment {id} not found")))?;

  let parser = pulldown_cmark::Parser::new(&assignment.description);
  let mut html = String::new();
  pulldown_cmark::html::push_html(&mut html, parser);

  Ok(Html(html))
}
