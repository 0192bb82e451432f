use std::sync::Arc;

use axum::extract::{Extension, Request};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;

use super::claims::Claims;
use super::error::AuthError;
use super::verifier::TokenVerifier;

/// Middleware that authenticates every request before any handler runs.
///
/// Extracts the bearer token, verifies it and attaches the decoded [`Claims`]
/// as a request extension for the authorization layer and the handlers.
pub async fn authenticate(
    Extension(verifier): Extension<Arc<TokenVerifier>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers)?;
    let claims = verifier.verify(token).await.map_err(|err| {
        tracing::debug!("rejected bearer token: {}", err);
        ApiError::from(err)
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Route layer that requires one scope from the authenticated claims.
///
/// Runs after [`authenticate`], so missing claims mean the middleware stack
/// is wired in the wrong order. That is a server bug, not a client error, and
/// is reported as 500 rather than 403.
pub async fn authorize(
    scope: &'static str,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = request.extensions().get::<Claims>().ok_or_else(|| {
        tracing::error!("authorize ran without authenticated claims; check middleware order");
        ApiError::internal("authorization ran before authentication")
    })?;

    if !claims.has_scope(scope) {
        tracing::warn!("subject '{}' lacks required scope '{}'", claims.sub, scope);
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}

/// The token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get("authorization")
        .ok_or(AuthError::MissingHeader)?;
    let value = header.to_str().map_err(|_| AuthError::NotBearer)?;

    // Scheme matching is case-insensitive per RFC 7235.
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::NotBearer)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::NotBearer);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }

    Ok(token)
}
