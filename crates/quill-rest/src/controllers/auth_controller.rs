//! Registration and token controller.
//!
//! Login sets both tokens as HttpOnly cookies: the refresh cookie is scoped
//! to the refresh endpoint, the access cookie to the whole site.

use crate::{
    extractors::ValidatedJson,
    middleware::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use quill_core::QuillError;
use quill_service::{
    AccessTokenResponse, CreateUserRequest, LoginRequest, LoginResponse, MessageResponse,
    RefreshTokenRequest, UserResponse,
};
use tracing::debug;

/// Path the refresh cookie is scoped to.
pub const REFRESH_COOKIE_PATH: &str = "/api/v1/refresh";

/// Creates the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}

fn token_cookie(name: &'static str, value: String, path: &'static str, max_age: i64) -> Cookie<'static> {
    Cookie::build((name, value))
        .path(path)
        .http_only(true)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    debug!("Registration request for: {}", request.email);

    let response = state.user_service.create_user(request).await?;
    Ok(created(response))
}

/// Login with email and password.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), AppError> {
    debug!("Login request for: {}", request.email);

    let response = state.auth_service.login(request).await?;

    let jar = jar
        .add(token_cookie(
            REFRESH_TOKEN_COOKIE,
            response.refresh_token.clone(),
            REFRESH_COOKIE_PATH,
            state.auth_service.refresh_token_max_age(),
        ))
        .add(token_cookie(
            ACCESS_TOKEN_COOKIE,
            response.access_token.clone(),
            "/",
            state.auth_service.access_token_max_age(),
        ));

    Ok((jar, Json(ApiResponse::success(response))))
}

/// Exchange a refresh token for a new access token.
///
/// The token is read from the refresh cookie, or from the JSON body when
/// the cookie is absent.
#[utoipa::path(
    post,
    path = "/refresh",
    tag = "auth",
    request_body(content = RefreshTokenRequest, description = "Used when the refresh cookie is absent"),
    responses(
        (status = 201, description = "Access token issued", body = AccessTokenResponse),
        (status = 401, description = "Missing, invalid or expired refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> Result<(StatusCode, CookieJar, Json<ApiResponse<AccessTokenResponse>>), AppError> {
    let refresh_token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| body.map(|Json(request)| request.refresh_token))
        .ok_or_else(|| QuillError::unauthorized("missing refresh token"))?;

    let access_token = state.auth_service.refresh(&refresh_token).await?;

    let jar = jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        access_token.clone(),
        "/",
        state.auth_service.access_token_max_age(),
    ));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiResponse::success(AccessTokenResponse { access_token })),
    ))
}

/// Clear both token cookies.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Cookies cleared", body = MessageResponse)
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiResult<MessageResponse>) {
    let jar = jar
        .remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path(REFRESH_COOKIE_PATH));

    (jar, ok(MessageResponse::new("user logged out")))
}
