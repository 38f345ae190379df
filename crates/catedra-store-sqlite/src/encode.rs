//! Encoding and decoding helpers between the Rust domain types and the
//! Spanish-named plain-text columns in SQLite.
//!
//! All timestamps are stored as RFC 3339 strings.

use catedra_core::repository::Repository;
use chrono::{DateTime, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns of a `repositorios` row; the timestamp decodes fallibly, so
/// rows cross the connection thread in this form and decode outside.
pub struct RawRepository {
  pub id:             i64,
  pub titulo:         String,
  pub full_name:      String,
  pub descripcion:    Option<String>,
  pub calificacion:   i64,
  pub id_usuario:     String,
  pub fecha_creacion: String,
  pub id_tp:          i64,
}

impl RawRepository {
  pub fn into_repository(self) -> Result<Repository> {
    Ok(Repository {
      id:            self.id,
      title:         self.titulo,
      full_name:     self.full_name,
      // Legacy bulk-loaded rows may hold NULL; the API reads that as empty.
      description:   self.descripcion.unwrap_or_default(),
      rating:        self.calificacion,
      owner:         self.id_usuario,
      created_at:    decode_dt(&self.fecha_creacion)?,
      assignment_id: self.id_tp,
    })
  }
}
