//! Error type for `catedra-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to update or delete a repository that was not found under
  /// the given assignment.
  #[error("repository not found: {0}")]
  RepositoryNotFound(i64),

  #[error("repository {0} already exists")]
  DuplicateRepository(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
