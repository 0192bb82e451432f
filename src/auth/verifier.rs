use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use crate::config::AuthConfig;

use super::claims::Claims;
use super::error::AuthError;
use super::jwks::JwksCache;

/// Verifies bearer tokens against the issuer's published signing keys.
///
/// Only RS256 signatures are accepted, and the `aud` and `iss` claims must
/// be present and match the configured audience and issuer exactly. Expiry
/// is enforced by the decoder with its default leeway.
pub struct TokenVerifier {
    keys: JwksCache,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_key_cache(config, JwksCache::new(&config.jwks_uri))
    }

    /// Build around an explicitly configured key cache. Tests tighten the
    /// cache's refresh bounds; production uses the defaults.
    pub fn with_key_cache(config: &AuthConfig, keys: JwksCache) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&config.audience]);
        validation.set_issuer(&[&config.issuer]);
        // set_audience/set_issuer only check a claim that is present; these
        // claims must also exist for the token to be accepted at all.
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        Self { keys, validation }
    }

    /// Verify `token` and return its claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self.keys.decoding_key(&kid).await?;

        let data = decode::<Claims>(token, &key, &self.validation)?;
        Ok(data.claims)
    }
}
