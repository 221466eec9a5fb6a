//! Authentication middleware for Axum
//!
//! Accepts `Authorization: Basic <base64 user:pass>` or
//! `Authorization: Bearer <jwt>`. Either way the user is reloaded from the
//! database, so role changes and deletions take effect immediately.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::application::UserService;
use crate::domain::{DomainError, DomainResult, User};
use crate::interfaces::http::common::ApiError;

/// Authentication state
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<UserService>,
}

/// The authenticated caller, stored in request extensions
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Credentials carried by the `Authorization` header
#[derive(Debug, PartialEq, Eq)]
enum Credentials {
    Basic { username: String, password: String },
    Bearer(String),
}

fn parse_authorization(value: &str) -> Option<Credentials> {
    let (scheme, rest) = value.trim().split_once(' ')?;
    let rest = rest.trim();

    if scheme.eq_ignore_ascii_case("bearer") {
        return Some(Credentials::Bearer(rest.to_string()));
    }
    if scheme.eq_ignore_ascii_case("basic") {
        let decoded = STANDARD.decode(rest).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        return Some(Credentials::Basic {
            username: username.to_string(),
            password: password.to_string(),
        });
    }
    None
}

async fn authenticate(users: &UserService, header_value: Option<String>) -> DomainResult<User> {
    let header_value =
        header_value.ok_or_else(|| DomainError::Unauthorized("Missing credentials".into()))?;

    match parse_authorization(&header_value) {
        Some(Credentials::Bearer(token)) => users.authenticate_token(&token).await,
        Some(Credentials::Basic { username, password }) => {
            users.authenticate_basic(&username, &password).await
        }
        None => Err(DomainError::Unauthorized(
            "Malformed Authorization header".into(),
        )),
    }
}

/// Rejects unauthenticated requests with 401 and a Basic challenge
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);

    match authenticate(&auth_state.users, header_value).await {
        Ok(user) => {
            tracing::Span::current().record("user_id", user.id);
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Admin gate. Must run after `auth_middleware`.
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<CurrentUser>()
        .is_some_and(|CurrentUser(user)| user.is_admin());

    if !is_admin {
        return ApiError::from(DomainError::Forbidden("Access denied".into())).into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_credentials() {
        let encoded = STANDARD.encode("alice:pa:ss");
        assert_eq!(
            parse_authorization(&format!("Basic {}", encoded)),
            Some(Credentials::Basic {
                username: "alice".into(),
                password: "pa:ss".into(),
            })
        );
    }

    #[test]
    fn parses_bearer_token() {
        assert_eq!(
            parse_authorization("Bearer abc.def.ghi"),
            Some(Credentials::Bearer("abc.def.ghi".into()))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_authorization("Basic !!!"), None);
        assert_eq!(parse_authorization("Digest abc"), None);
        assert_eq!(parse_authorization("token"), None);
        let no_colon = STANDARD.encode("alice");
        assert_eq!(parse_authorization(&format!("Basic {}", no_colon)), None);
    }
}
