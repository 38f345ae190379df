//! The `CatalogStore` trait and the eager-loaded detail views.
//!
//! The trait is implemented by storage backends (e.g. `catedra-store-sqlite`).
//! Each read method names exactly the relations its endpoint needs, loaded
//! eagerly in one pass; there is no lazy relationship traversal, so query
//! fan-out stays visible and testable.

use std::future::Future;

use crate::{
  catalog::{Assignment, Course, Subject},
  repository::{NewRepository, Repository, RepositoryReplacement},
};

// ─── Detail views ────────────────────────────────────────────────────────────

/// A subject together with all of its courses.
#[derive(Debug, Clone)]
pub struct SubjectDetail {
  pub subject: Subject,
  pub courses: Vec<Course>,
}

/// A course together with its assignments and its owning subject.
///
/// Only materialised when the whole parent chain resolves; a course whose
/// subject link is missing yields no detail view at all.
#[derive(Debug, Clone)]
pub struct CourseDetail {
  pub course:      Course,
  pub assignments: Vec<Assignment>,
  pub subject:     Subject,
}

/// An assignment together with its owning course and subject.
#[derive(Debug, Clone)]
pub struct AssignmentDetail {
  pub assignment: Assignment,
  pub course:     Course,
  pub subject:    Subject,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a catedra catalog store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Catalog reads ─────────────────────────────────────────────────────

  /// List all subjects, optionally capped at `limit` rows.
  fn list_subjects(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  /// A subject and its courses. Returns `None` if the subject is missing.
  fn subject_with_courses(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SubjectDetail>, Self::Error>> + Send + '_;

  /// A course, its assignments, and its owning subject.
  ///
  /// Returns `None` if the course does not exist or its subject link is
  /// missing; partial views are never returned.
  fn course_with_relations(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<CourseDetail>, Self::Error>> + Send + '_;

  /// An assignment and its owning course and subject. Returns `None` if any
  /// link in the parent chain is missing.
  fn assignment_with_relations(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<AssignmentDetail>, Self::Error>> + Send + '_;

  /// Retrieve a bare assignment by id. Returns `None` if not found.
  fn get_assignment(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  // ── Repositories ──────────────────────────────────────────────────────

  /// List the repositories submitted for an assignment, optionally capped
  /// at `limit` rows.
  fn list_repositories(
    &self,
    assignment_id: i64,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<Repository>, Self::Error>> + Send + '_;

  /// Scoped lookup: the repository must belong to `assignment_id`.
  fn get_repository(
    &self,
    assignment_id: i64,
    id: i64,
  ) -> impl Future<Output = Result<Option<Repository>, Self::Error>> + Send + '_;

  /// Whether any repository, under any assignment, already holds `id`.
  /// Repository ids are caller-supplied and globally unique.
  fn repository_exists(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Insert a repository. The creation timestamp is set by the store.
  /// Fails if the caller-supplied id is already taken.
  fn create_repository(
    &self,
    input: NewRepository,
  ) -> impl Future<Output = Result<Repository, Self::Error>> + Send + '_;

  /// Full replace: overwrite title and description, preserving every other
  /// field on the row.
  fn replace_repository(
    &self,
    assignment_id: i64,
    id: i64,
    changes: RepositoryReplacement,
  ) -> impl Future<Output = Result<Repository, Self::Error>> + Send + '_;

  /// Partial update: overwrite the rating only.
  fn rate_repository(
    &self,
    assignment_id: i64,
    id: i64,
    rating: i64,
  ) -> impl Future<Output = Result<Repository, Self::Error>> + Send + '_;

  /// Remove a repository row. No cascade; parents are untouched.
  fn delete_repository(
    &self,
    assignment_id: i64,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
