//! End-to-end router tests over in-memory stores and cache.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use quill_config::ServerConfig;
use quill_core::{Role, User};
use quill_repository::UserRepository;
use quill_rest::{build_router, AppState};
use quill_security::{PasswordHasher, PasswordHasherInterface, TokenProvider};
use quill_service::testing::{
    InMemoryCache, InMemoryCategoryRepository, InMemoryPostRepository, InMemoryUserRepository,
};
use quill_service::{
    AuthServiceComponent, CategoryServiceComponent, PostServiceComponent, UserServiceComponent,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";

struct TestApp {
    router: Router,
    cache: Arc<InMemoryCache>,
}

async fn test_app() -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new());
    let categories = Arc::new(InMemoryCategoryRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());
    let cache = Arc::new(InMemoryCache::new());
    let hasher = Arc::new(PasswordHasher::with_cost(1));
    let tokens = Arc::new(TokenProvider::new(
        "refresh-secret-key-that-is-at-least-32-chars",
        "access-secret-key-that-is-at-least-32-chars!",
        7,
        900,
    ));

    let admin = User::new(
        "Admin".to_string(),
        ADMIN_EMAIL.to_string(),
        hasher.hash(ADMIN_PASSWORD).unwrap(),
        Role::Admin,
    );
    users.create(&admin).await.unwrap();

    let state = AppState::new(
        Arc::new(UserServiceComponent::new(
            users.clone(),
            hasher.clone(),
            cache.clone(),
            Duration::ZERO,
        )),
        Arc::new(CategoryServiceComponent::new(
            categories,
            cache.clone(),
            Duration::ZERO,
        )),
        Arc::new(PostServiceComponent::new(posts, cache.clone(), Duration::ZERO)),
        Arc::new(AuthServiceComponent::new(users, hasher, tokens)),
        cache.clone(),
    );

    TestApp {
        router: build_router(state, &ServerConfig::default()),
        cache,
    }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn login(app: &TestApp, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "email": email, "password": password })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"].clone()
}

async fn admin_token(app: &TestApp) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn register(app: &TestApp, email: &str) -> Value {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/v1/register",
            None,
            Some(json!({ "name": "Reader", "email": email, "password": "reader-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cache"], "up");
}

#[tokio::test]
async fn test_health_reports_unreachable_cache() {
    let app = test_app().await;
    app.cache.fail_reads(true);

    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["cache"], "down");
}

#[tokio::test]
async fn test_register_creates_member_without_password() {
    let app = test_app().await;
    let user = register(&app, "reader@example.com").await;

    assert_eq!(user["email"], "reader@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
    assert!(app.cache.contains(&format!("user:{}", user["id"])));
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/v1/register",
            None,
            Some(json!({ "name": "Reader", "email": "r@example.com", "password": "short" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"][0]["field"], "password");
}

#[tokio::test]
async fn test_login_sets_scoped_cookies() {
    let app = test_app().await;
    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect();

    let refresh = cookies.iter().find(|c| c.starts_with("refresh_token=")).unwrap();
    assert!(refresh.contains("Path=/api/v1/refresh"));
    assert!(refresh.contains("HttpOnly"));

    let access = cookies.iter().find(|c| c.starts_with("access_token=")).unwrap();
    assert!(access.contains("Path=/"));
    assert!(access.contains("Max-Age=900"));
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "email": ADMIN_EMAIL, "password": "not-the-password" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_access_token() {
    let app = test_app().await;
    let tokens = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/v1/refresh",
            None,
            Some(json!({ "refresh_token": tokens["refresh_token"] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let access = body["data"]["access_token"].as_str().unwrap();
    let (status, _) = send(&app, request("GET", "/api/v1/users?start=0&end=9", Some(access), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = test_app().await;
    let tokens = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/v1/refresh",
            None,
            Some(json!({ "refresh_token": tokens["access_token"] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_cannot_list_users() {
    let app = test_app().await;
    register(&app, "reader@example.com").await;
    let token = login(&app, "reader@example.com", "reader-password").await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, _) = send(&app, request("GET", "/api/v1/users?start=0&end=9", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_member_reads_self_but_not_others() {
    let app = test_app().await;
    let reader = register(&app, "reader@example.com").await;
    let token = login(&app, "reader@example.com", "reader-password").await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &app,
        request("GET", &format!("/api/v1/users/{}", reader["id"]), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "reader@example.com");

    let (status, _) = send(&app, request("GET", "/api/v1/users/1", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app().await;
    let (status, _) = send(&app, request("GET", "/api/v1/users/1", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_requires_both_bounds() {
    let app = test_app().await;
    let token = admin_token(&app).await;

    for uri in ["/api/v1/users", "/api/v1/users?start=0", "/api/v1/users?start=a&end=2"] {
        let (status, _) = send(&app, request("GET", uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_admin_publishes_post_readable_by_anyone() {
    let app = test_app().await;
    let token = admin_token(&app).await;

    let (status, category) = send(
        &app,
        request(
            "POST",
            "/api/v1/categories",
            Some(&token),
            Some(json!({ "name": "Rust", "description": "Systems programming" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, post) = send(
        &app,
        request(
            "POST",
            "/api/v1/posts",
            Some(&token),
            Some(json!({
                "category_id": category["data"]["id"],
                "title": "Hello World",
                "content": "First post",
                "published": true
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["data"]["slug"], "hello-world");
    assert_eq!(post["data"]["user_id"], 1);

    let id = &post["data"]["id"];
    let (status, fetched) = send(&app, request("GET", &format!("/api/v1/posts/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["title"], "Hello World");

    let (status, listed) = send(&app, request("GET", "/api/v1/posts?start=0&end=9", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert!(app.cache.contains("posts:0-9"));
}

#[tokio::test]
async fn test_update_post_title_reslugs() {
    let app = test_app().await;
    let token = admin_token(&app).await;

    let (_, category) = send(
        &app,
        request("POST", "/api/v1/categories", Some(&token), Some(json!({ "name": "News" }))),
    )
    .await;
    let (_, post) = send(
        &app,
        request(
            "POST",
            "/api/v1/posts",
            Some(&token),
            Some(json!({
                "category_id": category["data"]["id"],
                "title": "Draft",
                "content": "Body"
            })),
        ),
    )
    .await;
    let id = &post["data"]["id"];

    let (status, updated) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/posts/{id}"),
            Some(&token),
            Some(json!({ "title": "Final Title", "content": "" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["slug"], "final-title");
    assert_eq!(updated["data"]["content"], "Body");
}

#[tokio::test]
async fn test_member_cannot_create_category() {
    let app = test_app().await;
    register(&app, "reader@example.com").await;
    let token = login(&app, "reader@example.com", "reader-password").await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, _) = send(
        &app,
        request("POST", "/api/v1/categories", Some(&token), Some(json!({ "name": "Spam" }))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let app = test_app().await;

    let (status, body) = send(&app, request("GET", "/api/v1/posts/999", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = send(&app, request("GET", "/api/v1/categories/abc", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_returns_deleted_record() {
    let app = test_app().await;
    let token = admin_token(&app).await;

    let (_, category) = send(
        &app,
        request("POST", "/api/v1/categories", Some(&token), Some(json!({ "name": "Old" }))),
    )
    .await;
    let id = &category["data"]["id"];

    let (status, deleted) = send(
        &app,
        request("DELETE", &format!("/api/v1/categories/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["data"]["name"], "Old");

    let (status, _) = send(&app, request("GET", &format!("/api/v1/categories/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cache_write_failure_is_internal_error() {
    let app = test_app().await;
    let token = admin_token(&app).await;
    app.cache.fail_writes(true);

    let (status, body) = send(
        &app,
        request("POST", "/api/v1/categories", Some(&token), Some(json!({ "name": "Flaky" }))),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "internal server error");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app().await;
    let (status, body) = send(&app, request("GET", "/api-docs/openapi.json", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/posts"].is_object());
}
