use std::env;

use thiserror::Error;
use url::Url;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid OIDC provider '{0}': not a valid host or URL")]
    InvalidProvider(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
}

/// Identity of the trusted token issuer and the audience this API accepts.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Expected `iss` claim, e.g. `https://tenant.auth0.com/`.
    pub issuer: String,
    /// Expected `aud` claim (the API identifier registered with the issuer).
    pub audience: String,
    /// Where the issuer publishes its signing keys.
    pub jwks_uri: String,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection target. When unset the in-memory store is used.
    pub url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            auth: AuthConfig::from_env()?,
            http: HttpConfig::from_env(),
            database: DatabaseConfig::from_env(),
        })
    }
}

impl AuthConfig {
    /// Build the trust anchors from `OIDC_PROVIDER` and `API_IDENTIFIER`.
    ///
    /// `OIDC_PROVIDER` is normally a bare host (`tenant.auth0.com`); a full
    /// `http(s)://` URL is also accepted so local issuers can be pointed at
    /// directly.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider =
            env::var("OIDC_PROVIDER").map_err(|_| ConfigError::Missing("OIDC_PROVIDER"))?;
        let audience =
            env::var("API_IDENTIFIER").map_err(|_| ConfigError::Missing("API_IDENTIFIER"))?;
        Self::for_provider(&provider, audience)
    }

    pub fn for_provider(provider: &str, audience: String) -> Result<Self, ConfigError> {
        let base = provider_base_url(provider)?;
        let jwks_uri = base
            .join(".well-known/jwks.json")
            .map_err(|_| ConfigError::InvalidProvider(provider.to_string()))?;

        Ok(Self {
            // The base always ends in "/", matching the issuer format tokens
            // are minted with.
            issuer: base.to_string(),
            audience,
            jwks_uri: jwks_uri.to_string(),
        })
    }
}

fn provider_base_url(provider: &str) -> Result<Url, ConfigError> {
    let raw = if provider.contains("://") {
        provider.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", provider)
    };

    let mut base =
        Url::parse(&raw).map_err(|_| ConfigError::InvalidProvider(provider.to_string()))?;

    // A trailing slash makes the whole path the directory jwks.json is
    // joined under; without it Url::join drops the last path segment.
    if !base.path().ends_with('/') {
        let directory = format!("{}/", base.path());
        base.set_path(&directory);
    }

    Ok(base)
}

impl HttpConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3001);

        Self { port }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self { url: env::var("DATABASE_URL").ok() }
    }
}
