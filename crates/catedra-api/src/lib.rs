//! JSON REST API for the catedra catalog, plus the OAuth code→token
//! exchange proxy.
//!
//! Exposes an axum [`Router`] backed by any
//! [`catedra_core::store::CatalogStore`]. The wire format keeps the original
//! Spanish route and field names; the per-endpoint response shapes live as
//! DTO structs next to their handlers.

pub mod assignments;
pub mod courses;
pub mod error;
pub mod exchange;
pub mod repositories;
pub mod subjects;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use catedra_core::store::CatalogStore;
use serde::Deserialize;

pub use error::ApiError;
use exchange::OAuthClient;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised once at startup from
/// `config.toml` overlaid with `CATEDRA_*` environment variables.
///
/// Required fields missing from both sources fail startup fast.
#[derive(Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// Path of the SQLite catalog database.
  pub store_path:          PathBuf,
  /// Process-wide secret, required at startup for deployment parity.
  pub secret_key:          String,
  pub oauth_client_id:     String,
  pub oauth_client_secret: String,
  #[serde(default = "default_token_url")]
  pub oauth_token_url:     String,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 5000 }

fn default_token_url() -> String {
  "https://github.com/login/oauth/access_token".to_owned()
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CatalogStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub oauth:  OAuthClient,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CatalogStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(home))
    .route("/exchange-code", post(exchange::handler::<S>))
    // Catalog reads
    .route("/materias", get(subjects::list::<S>))
    .route("/materias/{id}", get(subjects::detail::<S>))
    .route("/cursos/{id}", get(courses::detail::<S>))
    .route("/tps/{id}", get(assignments::detail::<S>))
    .route("/tps/{id}/descripcion_html", get(assignments::description_html::<S>))
    // Repositories
    .route(
      "/tps/{id}/repositorios",
      get(repositories::list::<S>).post(repositories::create::<S>),
    )
    .route(
      "/tps/{id}/repositorios/{rid}",
      get(repositories::get_one::<S>)
        .put(repositories::replace::<S>)
        .patch(repositories::rate::<S>)
        .delete(repositories::delete::<S>),
    )
    .with_state(state)
}

/// `GET /` — liveness text.
async fn home() -> &'static str { "Hello World" }
