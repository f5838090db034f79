//! Shared-secret authentication for the file endpoints.

use super::error::ApiError;
use super::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Dedicated header carrying the shared secret.
pub const SECRET_HEADER: &str = "x-gpt-secret";

#[derive(Clone)]
pub struct AuthManager {
    secret: String,
}

impl AuthManager {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn is_authorised(&self, provided: Option<&str>) -> bool {
        match provided {
            Some(value) => bool::from(value.as_bytes().ct_eq(self.secret.as_bytes())),
            None => false,
        }
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager").finish_non_exhaustive()
    }
}

/// Extracts the credential from `X-GPT-Secret` or, failing that, from
/// `Authorization: Bearer <secret>`.
pub fn provided_secret(headers: &HeaderMap) -> Option<String> {
    if let Some(secret) = headers
        .get(SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return Some(secret.to_string());
    }

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?
        .trim();
    let (scheme, token) = authorization.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Rejects the request with 403 before any handler runs unless it carries the secret.
pub async fn require_secret(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let provided = provided_secret(request.headers());
    if state.auth.is_authorised(provided.as_deref()) {
        return next.run(request).await;
    }

    if provided.is_some() {
        tracing::warn!(
            "Auth failed for {} {} - secret mismatch",
            request.method(),
            request.uri().path()
        );
    } else {
        tracing::warn!(
            "Auth failed for {} {} - no secret provided",
            request.method(),
            request.uri().path()
        );
    }
    ApiError::Forbidden.into_response()
}
