//! Unit tests for the in-memory user repository

use crate::domain::entities::user::{User, ROLE_ADMIN};
use crate::repositories::user::{MockUserRepository, UserRepository};

#[tokio::test]
async fn test_insert_and_find() {
    let repo = MockUserRepository::new();
    let user = repo
        .insert(User::new("Reader@Folio.test", "hash").with_authorities(["ROLE_USER", ROLE_ADMIN]))
        .await
        .unwrap();

    let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "Reader@Folio.test");

    let by_email = repo.find_by_email("reader@folio.test").await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);
    assert!(by_email.has_authority(ROLE_ADMIN));
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let repo = MockUserRepository::new();
    repo.insert(User::new("reader@folio.test", "hash")).await.unwrap();

    assert!(repo.insert(User::new("READER@folio.test", "hash")).await.is_err());
}

#[tokio::test]
async fn test_remove() {
    let repo = MockUserRepository::new();
    let user = repo.insert(User::new("reader@folio.test", "hash")).await.unwrap();

    assert!(repo.remove(user.id).await.is_some());
    assert!(repo.find_by_id(user.id).await.unwrap().is_none());
    assert!(repo.find_by_email("reader@folio.test").await.unwrap().is_none());
}
