//! Integration tests for `SqliteStore` against an in-memory database.

use catedra_core::{
  catalog::{Assignment, Course, Subject},
  repository::{NewRepository, RepositoryReplacement},
  store::CatalogStore,
};
use chrono::Utc;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// Insert the subject → course → assignment chain used by most tests:
/// materia 1, curso 2, tp 5.
async fn seed_catalog(s: &SqliteStore) {
  s.insert_subject(Subject {
    id:   1,
    name: "Taller de Programacion".into(),
    term: 2,
    year: 2023,
  })
  .await
  .unwrap();
  s.insert_course(Course {
    id:         2,
    name:       "Curso Veiga".into(),
    subject_id: Some(1),
  })
  .await
  .unwrap();
  s.insert_assignment(Assignment {
    id:          5,
    name:        "TP Individual".into(),
    description: "# Enunciado\n\nResolver el servidor.".into(),
    course_id:   Some(2),
  })
  .await
  .unwrap();
}

fn new_repo(id: i64, assignment_id: i64) -> NewRepository {
  NewRepository {
    id,
    title:         "T".into(),
    full_name:     "user/repo".into(),
    description:   String::new(),
    rating:        0,
    owner:         "u1".into(),
    assignment_id,
  }
}

// ─── Catalog reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn list_subjects_all() {
  let s = store().await;
  seed_catalog(&s).await;
  s.insert_subject(Subject {
    id:   7,
    name: "Algoritmos".into(),
    term: 1,
    year: 2024,
  })
  .await
  .unwrap();

  let all = s.list_subjects(None).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].id, 1);
  assert_eq!(all[1].id, 7);
}

#[tokio::test]
async fn list_subjects_honours_row_cap() {
  let s = store().await;
  seed_catalog(&s).await;
  s.insert_subject(Subject {
    id:   7,
    name: "Algoritmos".into(),
    term: 1,
    year: 2024,
  })
  .await
  .unwrap();

  let capped = s.list_subjects(Some(1)).await.unwrap();
  assert_eq!(capped.len(), 1);
}

#[tokio::test]
async fn subject_with_courses_includes_all_courses() {
  let s = store().await;
  seed_catalog(&s).await;
  s.insert_course(Course {
    id:         3,
    name:       "Curso Paez".into(),
    subject_id: Some(1),
  })
  .await
  .unwrap();

  let detail = s.subject_with_courses(1).await.unwrap().unwrap();
  assert_eq!(detail.subject.name, "Taller de Programacion");
  assert_eq!(detail.courses.len(), 2);
  let ids: Vec<_> = detail.courses.iter().map(|c| c.id).collect();
  assert_eq!(ids, [2, 3]);
}

#[tokio::test]
async fn subject_missing_returns_none() {
  let s = store().await;
  assert!(s.subject_with_courses(99).await.unwrap().is_none());
}

#[tokio::test]
async fn course_with_relations_resolves_full_chain() {
  let s = store().await;
  seed_catalog(&s).await;

  let detail = s.course_with_relations(2).await.unwrap().unwrap();
  assert_eq!(detail.course.id, 2);
  assert_eq!(detail.subject.id, 1);
  assert_eq!(detail.assignments.len(), 1);
  assert_eq!(detail.assignments[0].id, 5);
}

#[tokio::test]
async fn course_missing_returns_none() {
  let s = store().await;
  seed_catalog(&s).await;
  assert!(s.course_with_relations(99).await.unwrap().is_none());
}

#[tokio::test]
async fn course_without_subject_link_returns_none() {
  let s = store().await;
  seed_catalog(&s).await;
  s.insert_course(Course {
    id:         9,
    name:       "Curso huerfano".into(),
    subject_id: None,
  })
  .await
  .unwrap();

  // The parent chain is broken, so no partial view comes back.
  assert!(s.course_with_relations(9).await.unwrap().is_none());
}

#[tokio::test]
async fn assignment_with_relations_resolves_full_chain() {
  let s = store().await;
  seed_catalog(&s).await;

  let detail = s.assignment_with_relations(5).await.unwrap().unwrap();
  assert_eq!(detail.assignment.id, 5);
  assert_eq!(detail.course.id, 2);
  assert_eq!(detail.subject.id, 1);
}

#[tokio::test]
async fn assignment_with_broken_chain_returns_none() {
  let s = store().await;
  seed_catalog(&s).await;
  s.insert_course(Course {
    id:         9,
    name:       "Curso huerfano".into(),
    subject_id: None,
  })
  .await
  .unwrap();
  s.insert_assignment(Assignment {
    id:          6,
    name:        "TP huerfano".into(),
    description: "x".into(),
    course_id:   Some(9),
  })
  .await
  .unwrap();

  assert!(s.assignment_with_relations(6).await.unwrap().is_none());
}

#[tokio::test]
async fn get_assignment_present_and_missing() {
  let s = store().await;
  seed_catalog(&s).await;

  let tp = s.get_assignment(5).await.unwrap().unwrap();
  assert_eq!(tp.name, "TP Individual");
  assert!(s.get_assignment(99).await.unwrap().is_none());
}

// ─── Repository create ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_repository_assigns_timestamp() {
  let s = store().await;
  seed_catalog(&s).await;

  let before = Utc::now();
  let repo = s.create_repository(new_repo(10, 5)).await.unwrap();
  assert_eq!(repo.id, 10);
  assert_eq!(repo.rating, 0);
  assert!(repo.created_at >= before);

  let fetched = s.get_repository(5, 10).await.unwrap().unwrap();
  assert_eq!(fetched.created_at, repo.created_at);
  assert_eq!(fetched.owner, "u1");
}

#[tokio::test]
async fn create_duplicate_id_is_rejected() {
  let s = store().await;
  seed_catalog(&s).await;

  s.create_repository(new_repo(10, 5)).await.unwrap();

  let mut second = new_repo(10, 5);
  second.title = "Usurpador".into();
  let err = s.create_repository(second).await.unwrap_err();
  assert!(matches!(err, crate::Error::DuplicateRepository(10)));

  // The existing row is left unmodified.
  let kept = s.get_repository(5, 10).await.unwrap().unwrap();
  assert_eq!(kept.title, "T");
}

#[tokio::test]
async fn repository_exists_is_global() {
  let s = store().await;
  seed_catalog(&s).await;
  s.insert_assignment(Assignment {
    id:          6,
    name:        "TP Grupal".into(),
    description: "x".into(),
    course_id:   Some(2),
  })
  .await
  .unwrap();

  s.create_repository(new_repo(10, 5)).await.unwrap();

  // The id is taken across all assignments, not per assignment.
  assert!(s.repository_exists(10).await.unwrap());
  assert!(!s.repository_exists(11).await.unwrap());
}

// ─── Repository reads ────────────────────────────────────────────────────────

#[tokio::test]
async fn get_repository_is_scoped_to_assignment() {
  let s = store().await;
  seed_catalog(&s).await;
  s.insert_assignment(Assignment {
    id:          6,
    name:        "TP Grupal".into(),
    description: "x".into(),
    course_id:   Some(2),
  })
  .await
  .unwrap();

  s.create_repository(new_repo(10, 5)).await.unwrap();

  assert!(s.get_repository(5, 10).await.unwrap().is_some());
  assert!(s.get_repository(6, 10).await.unwrap().is_none());
}

#[tokio::test]
async fn list_repositories_scoped_and_capped() {
  let s = store().await;
  seed_catalog(&s).await;
  s.insert_assignment(Assignment {
    id:          6,
    name:        "TP Grupal".into(),
    description: "x".into(),
    course_id:   Some(2),
  })
  .await
  .unwrap();

  s.create_repository(new_repo(10, 5)).await.unwrap();
  s.create_repository(new_repo(11, 5)).await.unwrap();
  s.create_repository(new_repo(12, 6)).await.unwrap();

  let all = s.list_repositories(5, None).await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all.iter().all(|r| r.assignment_id == 5));

  let capped = s.list_repositories(5, Some(1)).await.unwrap();
  assert_eq!(capped.len(), 1);
}

// ─── Repository updates ──────────────────────────────────────────────────────

#[tokio::test]
async fn replace_overwrites_only_title_and_description() {
  let s = store().await;
  seed_catalog(&s).await;

  let mut input = new_repo(10, 5);
  input.rating = 7;
  let created = s.create_repository(input).await.unwrap();

  let updated = s
    .replace_repository(5, 10, RepositoryReplacement {
      title:       "Nuevo titulo".into(),
      description: "Nueva descripcion".into(),
    })
    .await
    .unwrap();

  assert_eq!(updated.title, "Nuevo titulo");
  assert_eq!(updated.description, "Nueva descripcion");
  assert_eq!(updated.rating, 7);
  assert_eq!(updated.owner, "u1");
  assert_eq!(updated.created_at, created.created_at);
  assert_eq!(updated.assignment_id, 5);
}

#[tokio::test]
async fn replace_missing_repository_errors() {
  let s = store().await;
  seed_catalog(&s).await;

  let err = s
    .replace_repository(5, 99, RepositoryReplacement {
      title:       "x".into(),
      description: "y".into(),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::RepositoryNotFound(99)));
}

#[tokio::test]
async fn rate_changes_only_the_rating() {
  let s = store().await;
  seed_catalog(&s).await;
  s.create_repository(new_repo(10, 5)).await.unwrap();

  let updated = s.rate_repository(5, 10, 9).await.unwrap();
  assert_eq!(updated.rating, 9);
  assert_eq!(updated.title, "T");
  assert_eq!(updated.full_name, "user/repo");
}

#[tokio::test]
async fn rate_outside_assignment_scope_errors() {
  let s = store().await;
  seed_catalog(&s).await;
  s.create_repository(new_repo(10, 5)).await.unwrap();

  let err = s.rate_repository(99, 10, 9).await.unwrap_err();
  assert!(matches!(err, crate::Error::RepositoryNotFound(10)));
}

// ─── Repository delete ───────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_only_that_row() {
  let s = store().await;
  seed_catalog(&s).await;
  s.create_repository(new_repo(10, 5)).await.unwrap();
  s.create_repository(new_repo(11, 5)).await.unwrap();

  s.delete_repository(5, 10).await.unwrap();

  assert!(s.get_repository(5, 10).await.unwrap().is_none());
  assert!(s.get_repository(5, 11).await.unwrap().is_some());
  // The parent assignment is untouched.
  assert!(s.get_assignment(5).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_missing_repository_errors() {
  let s = store().await;
  seed_catalog(&s).await;

  let err = s.delete_repository(5, 99).await.unwrap_err();
  assert!(matches!(err, crate::Error::RepositoryNotFound(99)));
}
