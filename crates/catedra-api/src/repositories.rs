//! Handlers for `/tps/{id}/repositorios` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/tps/{id}/repositorios` | Optional `?limit=<n>` row cap |
//! | `POST`   | `/tps/{id}/repositorios` | Form-encoded; 201 + created row |
//! | `GET`    | `/tps/{id}/repositorios/{rid}` | Single row |
//! | `PUT`    | `/tps/{id}/repositorios/{rid}` | Full replace: `titulo` + `descripcion` |
//! | `PATCH`  | `/tps/{id}/repositorios/{rid}` | Rating only: exactly `calificacion` |
//! | `DELETE` | `/tps/{id}/repositorios/{rid}` | 200 + confirmation message |
//!
//! Payloads are `application/x-www-form-urlencoded` and parsed by hand so
//! every rejection surfaces through the uniform `{"error": ...}` envelope.
//! Every handler checks the owning assignment first and fails fast on a
//! missing parent before touching repository rows.

use std::collections::HashMap;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use catedra_core::{
  repository::{NewRepository, Repository, RepositoryReplacement},
  store::CatalogStore,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{AppState, error::ApiError};

// ─── Wire shapes ──────────────────────────────────────────────────────────────

/// List-entry representation (original Spanish keys, no `id_tp`).
#[derive(Debug, Serialize)]
pub struct RepositoryEntry {
  pub id:             i64,
  pub titulo:         String,
  pub full_name:      String,
  pub descripcion:    String,
  pub calificacion:   i64,
  pub id_usuario:     String,
  pub fecha_creacion: DateTime<Utc>,
}

impl From<Repository> for RepositoryEntry {
  fn from(r: Repository) -> Self {
    RepositoryEntry {
      id:             r.id,
      titulo:         r.title,
      full_name:      r.full_name,
      descripcion:    r.description,
      calificacion:   r.rating,
      id_usuario:     r.owner,
      fecha_creacion: r.created_at,
    }
  }
}

/// Single-row representation: the list entry keys plus the owning `id_tp`.
#[derive(Debug, Serialize)]
pub struct RepositoryBody {
  pub id:             i64,
  pub titulo:         String,
  pub full_name:      String,
  pub descripcion:    String,
  pub calificacion:   i64,
  pub id_usuario:     String,
  pub fecha_creacion: DateTime<Utc>,
  pub id_tp:          i64,
}

impl From<Repository> for RepositoryBody {
  fn from(r: Repository) -> Self {
    RepositoryBody {
      id:             r.id,
      titulo:         r.title,
      full_name:      r.full_name,
      descripcion:    r.description,
      calificacion:   r.rating,
      id_usuario:     r.owner,
      fecha_creacion: r.created_at,
      id_tp:          r.assignment_id,
    }
  }
}

// ─── Form parsing ─────────────────────────────────────────────────────────────

/// Decode a form-encoded body into a key/value map.
///
/// The map form (rather than a typed struct) keeps the field-presence
/// validation explicit: create names its first missing field, and the
/// partial update must see exactly one key.
fn parse_form(body: &Bytes) -> Result<HashMap<String, String>, ApiError> {
  if body.is_empty() {
    return Err(ApiError::BadRequest("missing payload".to_owned()));
  }
  serde_urlencoded::from_bytes(body)
    .map_err(|_| ApiError::BadRequest("malformed form payload".to_owned()))
}

fn require<'a>(form: &'a HashMap<String, String>, field: &str) -> Result<&'a str, ApiError> {
  form
    .get(field)
    .map(String::as_str)
    .ok_or_else(|| ApiError::BadRequest(format!("missing field: {field}")))
}

fn parse_int(field: &str, value: &str) -> Result<i64, ApiError> {
  value
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("invalid integer for field: {field}")))
}

/// 404 unless the assignment exists. Runs before any repository work.
async fn ensure_assignment<S>(state: &AppState<S>, assignment_id: i64) -> Result<(), ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_assignment(assignment_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("assignment {assignment_id} not found")))?;
  Ok(())
}

/// 404 unless the repository exists under the assignment.
async fn ensure_repository<S>(
  state: &AppState<S>,
  assignment_id: i64,
  id: i64,
) -> Result<(), ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_repository(assignment_id, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("repository {id} not found")))?;
  Ok(())
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit: Option<usize>,
}

/// `GET /tps/{id}/repositorios[?limit=<n>]` — bare array, no wrapper key.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path(assignment_id): Path<i64>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<RepositoryEntry>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  ensure_assignment(&state, assignment_id).await?;

  let repos = state
    .store
    .list_repositories(assignment_id, params.limit)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(repos.into_iter().map(RepositoryEntry::from).collect()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /tps/{id}/repositorios` — form fields: `id`, `titulo`, `full_name`,
/// `id_usuario`; optional `descripcion` (default empty) and `calificacion`
/// (default 0).
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(assignment_id): Path<i64>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  ensure_assignment(&state, assignment_id).await?;

  let form = parse_form(&body)?;
  let id = parse_int("id", require(&form, "id")?)?;
  let titulo = require(&form, "titulo")?.to_owned();
  let full_name = require(&form, "full_name")?.to_owned();
  let id_usuario = require(&form, "id_usuario")?.to_owned();
  let descripcion = form.get("descripcion").cloned().unwrap_or_default();
  let calificacion = match form.get("calificacion") {
    Some(v) => parse_int("calificacion", v)?,
    None => 0,
  };

  // Fast-path duplicate check; the store's primary key stays authoritative.
  let taken = state
    .store
    .repository_exists(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if taken {
    return Err(ApiError::BadRequest(format!("repository {id} already exists")));
  }

  let repo = state
    .store
    .create_repository(NewRepository {
      id,
      title: titulo,
      full_name,
      description: descripcion,
      rating: calificacion,
      owner: id_usuario,
      assignment_id,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(RepositoryBody::from(repo))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /tps/{id}/repositorios/{rid}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path((assignment_id, id)): Path<(i64, i64)>,
) -> Result<Json<RepositoryBody>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  ensure_assignment(&state, assignment_id).await?;

  let repo = state
    .store
    .get_repository(assignment_id, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("repository {id} not found")))?;

  Ok(Json(RepositoryBody::from(repo)))
}

// ─── Replace ──────────────────────────────────────────────────────────────────

/// `PUT /tps/{id}/repositorios/{rid}` — form fields `titulo` and
/// `descripcion`, both required. Rating, owner, creation timestamp and the
/// owning assignment are untouched.
pub async fn replace<S>(
  State(state): State<AppState<S>>,
  Path((assignment_id, id)): Path<(i64, i64)>,
  body: Bytes,
) -> Result<Json<RepositoryBody>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  ensure_assignment(&state, assignment_id).await?;
  ensure_repository(&state, assignment_id, id).await?;

  let form = parse_form(&body)?;
  let titulo = require(&form, "titulo")?.to_owned();
  let descripcion = require(&form, "descripcion")?.to_owned();

  let repo = state
    .store
    .replace_repository(assignment_id, id, RepositoryReplacement {
      title:       titulo,
      description: descripcion,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(RepositoryBody::from(repo)))
}

// ─── Rate ─────────────────────────────────────────────────────────────────────

/// `PATCH /tps/{id}/repositorios/{rid}` — the payload must contain exactly
/// the `calificacion` field; anything else is rejected.
pub async fn rate<S>(
  State(state): State<AppState<S>>,
  Path((assignment_id, id)): Path<(i64, i64)>,
  body: Bytes,
) -> Result<Json<RepositoryBody>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  ensure_assignment(&state, assignment_id).await?;
  ensure_repository(&state, assignment_id, id).await?;

  let form = parse_form(&body)?;
  if form.len() != 1 || !form.contains_key("calificacion") {
    return Err(ApiError::BadRequest(
      "partial update accepts only the calificacion field".to_owned(),
    ));
  }
  let rating = parse_int("calificacion", &form["calificacion"])?;

  let repo = state
    .store
    .rate_repository(assignment_id, id, rating)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(RepositoryBody::from(repo)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /tps/{id}/repositorios/{rid}` — 200 with a confirmation message,
/// not the deleted row.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path((assignment_id, id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  ensure_assignment(&state, assignment_id).await?;
  ensure_repository(&state, assignment_id, id).await?;

  state
    .store
    .delete_repository(assignment_id, id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(json!({ "mensaje": format!("repositorio {id} eliminado") })))
}
