use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;

use super::error::AuthError;

/// How long a fetched key set stays fresh before a lookup may refetch it.
pub const DEFAULT_KEY_TTL: Duration = Duration::from_secs(600);

/// Upper bound on key set requests, expressed as the gap enforced between
/// consecutive fetch attempts (five requests per minute).
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(12);

/// Cap on a single key set request against the issuer.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote JSON Web Key Set with TTL caching and a bounded refresh rate.
///
/// Keys are fetched from the issuer's `jwks.json` endpoint, decoded once and
/// looked up by `kid`. A stale cache triggers a refetch on the next lookup,
/// but never more often than the refresh interval allows, so a flood of
/// requests bearing unknown key ids cannot hammer the issuer. When a refresh
/// fails, previously fetched keys keep being served.
pub struct JwksCache {
    jwks_uri: String,
    http: reqwest::Client,
    ttl: Duration,
    min_refresh_interval: Duration,
    state: RwLock<CacheState>,
}

#[derive(Default)]
struct CacheState {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
    last_attempt: Option<Instant>,
}

impl CacheState {
    fn fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.is_some_and(|at| at.elapsed() < ttl)
    }

    fn refresh_allowed(&self, min_interval: Duration) -> bool {
        self.last_attempt.map_or(true, |at| at.elapsed() >= min_interval)
    }
}

impl JwksCache {
    pub fn new(jwks_uri: impl Into<String>) -> Self {
        Self {
            jwks_uri: jwks_uri.into(),
            http: reqwest::Client::new(),
            ttl: DEFAULT_KEY_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            state: RwLock::new(CacheState::default()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// The decoding key published under `kid`, refetching the key set first
    /// when the cache is stale and the refresh bound allows it.
    ///
    /// The fetch runs with no lock held, so a slow issuer only stalls the
    /// requests that actually need new keys; fresh cached lookups keep going
    /// through the read lock.
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        // Fast path: a fresh cache holding the key, taken under the read lock.
        {
            let state = self.state.read().await;
            if state.fresh(self.ttl) {
                if let Some(key) = state.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        // Claim the refresh slot under a brief write lock.
        let refresh = {
            let mut state = self.state.write().await;

            // Another request may have refreshed while we waited for the lock.
            if state.fresh(self.ttl) {
                if let Some(key) = state.keys.get(kid) {
                    return Ok(key.clone());
                }
            }

            if state.refresh_allowed(self.min_refresh_interval) {
                state.last_attempt = Some(Instant::now());
                true
            } else {
                false
            }
        };

        if refresh {
            match self.fetch_keys().await {
                Ok(keys) => {
                    tracing::debug!("refreshed signing key set: {} keys", keys.len());
                    let mut state = self.state.write().await;
                    state.keys = keys;
                    state.fetched_at = Some(Instant::now());
                }
                Err(err) => {
                    if self.state.read().await.keys.is_empty() {
                        return Err(err);
                    }
                    // The issuer being briefly unreachable must not
                    // invalidate known-good keys.
                    tracing::warn!("key set refresh failed, serving cached keys: {}", err);
                }
            }
        }

        let state = self.state.read().await;
        state
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::UnknownKeyId(kid.to_string()))
    }

    async fn fetch_keys(&self) -> Result<HashMap<String, DecodingKey>, AuthError> {
        let jwks: JwkSet = self
            .http
            .get(&self.jwks_uri)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut keys = HashMap::new();
        for jwk in &jwks.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(kid, key);
                }
                Err(err) => tracing::debug!("skipping unusable key '{}': {}", kid, err),
            }
        }

        Ok(keys)
    }
}
