use thiserror::Error;

/// Reasons a request fails authentication. Every variant maps to a 401; the
/// message is surfaced in the response body to help callers fix their client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("authorization header is not a bearer token")]
    NotBearer,

    #[error("empty bearer token")]
    EmptyToken,

    #[error("token header names no key id")]
    MissingKeyId,

    #[error("no key '{0}' in the issuer's key set")]
    UnknownKeyId(String),

    #[error("failed to retrieve the issuer's key set: {0}")]
    KeySetFetch(#[from] reqwest::Error),

    #[error("token rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
