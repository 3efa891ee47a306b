//! JWT token provider for issuing and validating tokens.

use super::{Claims, TokenType};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use quill_config::SecurityConfig;
use quill_core::{Interface, QuillError, QuillResult, User};
use serde::Serialize;
use shaku::Component;
use tracing::{debug, warn};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Refresh and access tokens issued together at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token (short-lived).
    pub access_token: String,
}

/// Interface for token issuance and validation.
pub trait TokenProviderInterface: Interface + Send + Sync {
    /// Issues a refresh token signed with the refresh secret.
    fn generate_refresh_token(&self, user: &User) -> QuillResult<String>;

    /// Issues an access token signed with the access secret.
    fn generate_access_token(&self, user: &User) -> QuillResult<String>;

    /// Issues a refresh token and an access token for the user.
    fn generate_token_pair(&self, user: &User) -> QuillResult<TokenPair> {
        Ok(TokenPair {
            refresh_token: self.generate_refresh_token(user)?,
            access_token: self.generate_access_token(user)?,
        })
    }

    /// Validates a refresh token. Any failure is `Unauthorized`.
    fn validate_refresh_token(&self, token: &str) -> QuillResult<Claims>;

    /// Validates an access token. Any failure is `Unauthorized`.
    fn validate_access_token(&self, token: &str) -> QuillResult<Claims>;

    /// Refresh token lifetime in seconds.
    fn refresh_token_ttl_secs(&self) -> i64;

    /// Access token lifetime in seconds.
    fn access_token_ttl_secs(&self) -> i64;
}

/// HS256 token provider with separate refresh and access secrets.
///
/// Refresh lifetimes are configured in days, access lifetimes in seconds.
/// Validation allows no clock leeway.
#[derive(Component, Clone)]
#[shaku(interface = TokenProviderInterface)]
pub struct TokenProvider {
    refresh_secret: String,
    access_secret: String,
    refresh_duration_days: u64,
    access_duration_secs: u64,
}

impl TokenProvider {
    /// Creates a new token provider.
    #[must_use]
    pub fn new(
        refresh_secret: impl Into<String>,
        access_secret: impl Into<String>,
        refresh_duration_days: u64,
        access_duration_secs: u64,
    ) -> Self {
        Self {
            refresh_secret: refresh_secret.into(),
            access_secret: access_secret.into(),
            refresh_duration_days,
            access_duration_secs,
        }
    }

    /// Creates a token provider from security configuration.
    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.refresh_token_secret.clone(),
            config.access_token_secret.clone(),
            config.refresh_token_duration_days,
            config.access_token_duration_secs,
        )
    }

    /// Builds the component parameters for DI registration.
    #[must_use]
    pub fn parameters(config: &SecurityConfig) -> TokenProviderParameters {
        TokenProviderParameters {
            refresh_secret: config.refresh_token_secret.clone(),
            access_secret: config.access_token_secret.clone(),
            refresh_duration_days: config.refresh_token_duration_days,
            access_duration_secs: config.access_token_duration_secs,
        }
    }

    fn secret_for(&self, token_type: TokenType) -> &[u8] {
        match token_type {
            TokenType::Refresh => self.refresh_secret.as_bytes(),
            TokenType::Access => self.access_secret.as_bytes(),
        }
    }

    fn ttl_for(&self, token_type: TokenType) -> i64 {
        match token_type {
            TokenType::Refresh => self.refresh_token_ttl_secs(),
            TokenType::Access => self.access_token_ttl_secs(),
        }
    }

    fn issue(&self, user: &User, token_type: TokenType) -> QuillResult<String> {
        let expires_at = Duration::try_seconds(self.ttl_for(token_type))
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                QuillError::Internal(format!("{token_type} token lifetime is out of range"))
            })?;
        let claims = Claims::for_user(user, token_type, expires_at);

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_for(token_type)),
        )
        .map_err(|e| QuillError::Internal(format!("Failed to generate {token_type} token: {e}")))?;

        debug!("Generated {} token for user {}", token_type, user.id);
        Ok(token)
    }

    fn validate(&self, token: &str, expected: TokenType) -> QuillResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_for(expected)),
            &validation,
        )
        .map_err(|e| {
            warn!("Token validation failed: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    QuillError::unauthorized("token expired")
                }
                _ => QuillError::unauthorized("invalid token"),
            }
        })?;

        if token_data.claims.token_type != expected {
            warn!(
                "Token type mismatch: expected {}, got {}",
                expected, token_data.claims.token_type
            );
            return Err(QuillError::unauthorized("invalid token"));
        }

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("refresh_duration_days", &self.refresh_duration_days)
            .field("access_duration_secs", &self.access_duration_secs)
            .finish_non_exhaustive()
    }
}

impl TokenProviderInterface for TokenProvider {
    fn generate_refresh_token(&self, user: &User) -> QuillResult<String> {
        self.issue(user, TokenType::Refresh)
    }

    fn generate_access_token(&self, user: &User) -> QuillResult<String> {
        self.issue(user, TokenType::Access)
    }

    fn validate_refresh_token(&self, token: &str) -> QuillResult<Claims> {
        self.validate(token, TokenType::Refresh)
    }

    fn validate_access_token(&self, token: &str) -> QuillResult<Claims> {
        self.validate(token, TokenType::Access)
    }

    fn refresh_token_ttl_secs(&self) -> i64 {
        self.refresh_duration_days
            .checked_mul(SECS_PER_DAY)
            .and_then(|secs| i64::try_from(secs).ok())
            .unwrap_or(i64::MAX)
    }

    fn access_token_ttl_secs(&self) -> i64 {
        i64::try_from(self.access_duration_secs).unwrap_or(i64::MAX)
    }
}
