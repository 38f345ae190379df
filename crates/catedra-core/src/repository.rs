//! Repository: a student-submitted external code repository reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored repository row. The only entity with mutations exposed over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
  pub id:            i64,
  pub title:         String,
  /// Full external name, e.g. `owner/repo` on the hosting provider.
  pub full_name:     String,
  pub description:   String,
  pub rating:        i64,
  /// Identifier of the submitting user on the hosting provider.
  pub owner:         String,
  pub created_at:    DateTime<Utc>,
  pub assignment_id: i64,
}

/// Input for creating a repository.
///
/// The id is caller-supplied, never auto-generated; the creation timestamp is
/// assigned by the store at insert time.
#[derive(Debug, Clone)]
pub struct NewRepository {
  pub id:            i64,
  pub title:         String,
  pub full_name:     String,
  pub description:   String,
  pub rating:        i64,
  pub owner:         String,
  pub assignment_id: i64,
}

/// Field set for the full-replace update. Everything else on the row
/// (rating, owner, creation timestamp, owning assignment) is preserved.
#[derive(Debug, Clone)]
pub struct RepositoryReplacement {
  pub title:       String,
  pub description: String,
}
