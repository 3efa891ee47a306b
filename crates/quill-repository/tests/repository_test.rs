//! Integration tests for the PostgreSQL record stores.
//!
//! These tests run against a real PostgreSQL database using testcontainers
//! and need Docker. Run them with `cargo test -- --ignored`.

mod common;

use common::TestDatabase;
use quill_core::{Category, CategoryId, Post, QuillError, RecordRange, Role, User, UserId};
use quill_repository::{
    CategoryRepository, PgCategoryRepository, PgPostRepository, PgUserRepository, PostRepository,
    UserRepository,
};

fn create_test_user(email: &str) -> User {
    User::new(
        "Test User".to_string(),
        email.to_string(),
        "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        Role::User,
    )
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_user_create_find_and_soft_delete() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let created = repo.create(&create_test_user("ana@example.com")).await.unwrap();
    assert!(!created.id.is_zero());

    let by_id = repo.find_by_id(created.id).await.unwrap().expect("User not found");
    assert_eq!(by_id, created);
    let by_email = repo.find_by_email("ana@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(created.id));

    let deleted = repo.delete(created.id).await.unwrap().expect("Nothing deleted");
    assert_eq!(deleted.id, created.id);
    assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    assert!(repo.delete(created.id).await.unwrap().is_none());

    // The soft-deleted row releases its email.
    assert!(repo.create(&create_test_user("ana@example.com")).await.is_ok());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_email_is_conflict() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    repo.create(&create_test_user("dup@example.com")).await.unwrap();
    let err = repo.create(&create_test_user("dup@example.com")).await.unwrap_err();
    assert!(matches!(err, QuillError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_missing_user_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.pool());

    let mut ghost = create_test_user("ghost@example.com");
    ghost.id = UserId::new(9_999);
    assert!(matches!(
        repo.update(&ghost).await,
        Err(QuillError::NotFound { .. })
    ));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_category_range_is_inclusive_and_ordered() {
    let db = TestDatabase::new().await;
    let repo = PgCategoryRepository::new(db.pool());

    for name in ["a", "b", "c", "d"] {
        repo.create(&Category::new(name.to_string(), String::new()))
            .await
            .unwrap();
    }

    let page = repo.find_range(RecordRange::new(1, 2).unwrap()).await.unwrap();
    let names: Vec<_> = page.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["b", "c"]);

    let err = repo
        .create(&Category::new("a".to_string(), "again".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, QuillError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_post_update_and_slug_uniqueness() {
    let db = TestDatabase::new().await;
    let users = PgUserRepository::new(db.pool());
    let categories = PgCategoryRepository::new(db.pool());
    let posts = PgPostRepository::new(db.pool());

    let author = users.create(&create_test_user("author@example.com")).await.unwrap();
    let category = categories
        .create(&Category::new("rust".to_string(), String::new()))
        .await
        .unwrap();

    let post = posts
        .create(&Post::new(category.id, author.id, "Go Lang".into(), "body".into(), false))
        .await
        .unwrap();
    assert_eq!(post.slug, "go-lang");

    let mut changed = post.clone();
    changed.published = true;
    changed.content = "new body".to_string();
    let updated = posts.update(&changed).await.unwrap();
    assert!(updated.published);
    assert_eq!(updated.content, "new body");

    let err = posts
        .create(&Post::new(category.id, author.id, "Go Lang".into(), String::new(), false))
        .await
        .unwrap_err();
    assert!(matches!(err, QuillError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_post_with_unknown_category_is_rejected() {
    let db = TestDatabase::new().await;
    let users = PgUserRepository::new(db.pool());
    let posts = PgPostRepository::new(db.pool());

    let author = users.create(&create_test_user("orphan@example.com")).await.unwrap();
    let err = posts
        .create(&Post::new(CategoryId::new(9_999), author.id, "Orphan".into(), String::new(), false))
        .await
        .unwrap_err();
    assert!(matches!(err, QuillError::Validation(_)));
}
