//! Bearer-token authentication and scope authorization.
//!
//! Flow:
//! 1. The client sends `Authorization: Bearer <JWT>` minted by the configured
//!    OIDC provider.
//! 2. [`middleware::authenticate`] verifies the token signature against the
//!    provider's published key set (fetched and cached by [`JwksCache`]) and
//!    checks the audience and issuer claims; failures end the request with
//!    401 before any handler runs.
//! 3. The verified [`Claims`] ride along as a request extension;
//!    [`middleware::authorize`] then requires the route's scope and ends the
//!    request with an empty 403 when it is missing.

pub mod claims;
pub mod error;
pub mod jwks;
pub mod middleware;
pub mod scopes;
pub mod verifier;

pub use claims::Claims;
pub use error::AuthError;
pub use jwks::JwksCache;
pub use middleware::{authenticate, authorize};
pub use verifier::TokenVerifier;
