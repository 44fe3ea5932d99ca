//! Authentication primitives.
//!
//! Callers authenticate with HTTP Basic against the users listed in
//! `auth.users`. The authenticated user name becomes the identity every
//! contact search is scoped to.

use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::{request_context::RequestContext, state::AppState, Config};

/// Identity attached to requests when authentication is disabled.
pub const ANONYMOUS_PRINCIPAL: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
}

#[derive(Debug, Clone)]
pub enum AuthError {
    MissingCredentials,
    MalformedHeader(String),
    InvalidCredentials,
}

impl AuthError {
    fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn diagnostics(&self) -> String {
        match self {
            Self::MissingCredentials => "Full authentication is required".to_string(),
            Self::MalformedHeader(msg) => format!("Malformed Authorization header: {msg}"),
            Self::InvalidCredentials => "Bad credentials".to_string(),
        }
    }

    pub fn into_response_with_realm(self, realm: &str) -> Response {
        let status = self.status();
        let body = axum::Json(json!({
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Unauthorized"),
            "message": self.diagnostics()
        }));

        let mut response = (status, body).into_response();
        if let Ok(v) = HeaderValue::from_str(&format!("Basic realm=\"{realm}\"")) {
            response.headers_mut().insert(header::WWW_AUTHENTICATE, v);
        }
        response
    }
}

#[derive(Clone)]
pub struct AuthManager {
    config: Arc<Config>,
}

impl AuthManager {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn enabled(&self) -> bool {
        self.config.auth.enabled
    }

    pub fn realm(&self) -> &str {
        &self.config.auth.realm
    }

    pub fn is_public_path(&self, path: &str) -> bool {
        self.config.auth.public_paths.iter().any(|p| p == path)
    }

    /// Resolve the caller from the `Authorization` header.
    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        if !self.enabled() {
            return Ok(Principal {
                name: ANONYMOUS_PRINCIPAL.to_string(),
            });
        }

        let authz = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?;
        let authz = authz.to_str().map_err(|_| {
            AuthError::MalformedHeader("Authorization header is not valid UTF-8".to_string())
        })?;

        let (name, password) = decode_basic(authz)?;
        self.verify(&name, &password)?;
        Ok(Principal { name })
    }

    fn verify(&self, name: &str, password: &str) -> Result<(), AuthError> {
        let user = self
            .config
            .auth
            .users
            .iter()
            .find(|u| u.name == name)
            .ok_or(AuthError::InvalidCredentials)?;

        if bool::from(user.password.as_bytes().ct_eq(password.as_bytes())) {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Split `Basic <base64(name:password)>` into its parts.
fn decode_basic(authz: &str) -> Result<(String, String), AuthError> {
    let encoded = authz
        .strip_prefix("Basic ")
        .or_else(|| authz.strip_prefix("basic "))
        .ok_or_else(|| {
            AuthError::MalformedHeader("Authorization header must be 'Basic <credentials>'".to_string())
        })?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AuthError::MalformedHeader(format!("invalid base64: {e}")))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AuthError::MalformedHeader("credentials are not valid UTF-8".to_string()))?;

    let (name, password) = decoded
        .split_once(':')
        .ok_or_else(|| AuthError::MalformedHeader("credentials must be 'name:password'".to_string()))?;
    Ok((name.to_string(), password.to_string()))
}

/// Extractor for the authenticated principal attached by middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

#[async_trait::async_trait]
impl FromRequestParts<AppState> for AuthenticatedPrincipal {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthenticatedPrincipal)
            .ok_or_else(|| {
                AuthError::MissingCredentials.into_response_with_realm(state.auth.realm())
            })
    }
}

/// Middleware attaching a `Principal` to requests, or rejecting them with 401.
/// Public paths and CORS preflight pass through untouched.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let path = req.uri().path();
    if state.auth.is_public_path(path) || req.method() == axum::http::Method::OPTIONS {
        return next.run(req).await;
    }

    match state.auth.authenticate_headers(req.headers()) {
        Ok(principal) => {
            tracing::debug!(principal = %principal.name, "Request authenticated");
            req.extensions_mut().insert::<Principal>(principal);
            next.run(req).await
        }
        Err(err) => {
            let request_id = req
                .extensions()
                .get::<RequestContext>()
                .map(|c| c.request_id.clone())
                .unwrap_or_default();
            tracing::info!(
                path = %req.uri().path(),
                request_id = %request_id,
                reason = %err.diagnostics(),
                "Authentication failed"
            );
            crate::metrics::AUTH_FAILURES_TOTAL.inc();
            err.into_response_with_realm(state.auth.realm())
        }
    }
}
