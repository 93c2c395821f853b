//! OIDC adapter for JWT validation.
//!
//! Implements the `SessionValidator` port against any OpenID Connect issuer
//! that publishes a JWKS. Signature, `iss`, `aud` and `exp` are all checked
//! by `jsonwebtoken::Validation`; the `sub` claim becomes the caller's
//! `UserId` and is the conversation owner for every store operation.
//!
//! Keys are fetched lazily and cached for `jwks_cache_duration`. A token
//! whose `kid` is missing from the cached set forces one refetch, so issuer
//! key rotation is picked up without waiting for the cache to expire.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{JwkSet, KeyAlgorithm};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Settings for the OIDC validator.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Expected `iss` claim; also the base for JWKS discovery.
    pub issuer_url: String,

    pub audience: String,

    /// Defaults to `{issuer}/.well-known/jwks.json`.
    pub jwks_url: Option<String>,

    pub jwks_cache_duration: Duration,
}

impl OidcConfig {
    pub fn new(issuer_url: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            audience: audience.into(),
            jwks_url: None,
            jwks_cache_duration: Duration::from_secs(3600),
        }
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.jwks_url = Some(url.into());
        self
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = duration;
        self
    }

    fn jwks_url(&self) -> String {
        self.jwks_url.clone().unwrap_or_else(|| {
            format!("{}/.well-known/jwks.json", self.issuer_url.trim_end_matches('/'))
        })
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.issuer_url]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}

impl From<&AuthConfig> for OidcConfig {
    fn from(config: &AuthConfig) -> Self {
        let oidc = OidcConfig::new(&config.issuer, &config.audience)
            .with_cache_duration(Duration::from_secs(config.jwks_cache_ttl_secs));
        match &config.jwks_url {
            Some(url) => oidc.with_jwks_url(url),
            None => oidc,
        }
    }
}

/// The only claim the store needs once `Validation` has passed.
#[derive(Debug, Deserialize)]
struct SubjectClaim {
    sub: String,
}

/// Production `SessionValidator`.
pub struct OidcSessionValidator {
    config: OidcConfig,
    http_client: reqwest::Client,
    keys: RwLock<Option<(JwkSet, Instant)>>,
}

impl OidcSessionValidator {
    /// # Errors
    ///
    /// Returns `ServiceUnavailable` if the HTTP client cannot be built.
    pub fn new(config: OidcConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            keys: RwLock::new(None),
        })
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let url = self.config.jwks_url();
        tracing::debug!(url = %url, "Fetching JWKS");

        let unavailable = |e: reqwest::Error| {
            tracing::error!(url = %url, error = %e, "JWKS fetch failed");
            AuthError::service_unavailable(format!("JWKS: {}", e))
        };

        let jwks: JwkSet = self
            .http_client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)?;

        *self.keys.write().await = Some((jwks.clone(), Instant::now()));
        Ok(jwks)
    }

    /// Cached keys while fresh, otherwise a new fetch.
    async fn keys(&self) -> Result<JwkSet, AuthError> {
        if let Some((jwks, fetched_at)) = self.keys.read().await.as_ref() {
            if fetched_at.elapsed() <= self.config.jwks_cache_duration {
                return Ok(jwks.clone());
            }
        }
        self.fetch_keys().await
    }

    async fn decoding_key(&self, kid: &str) -> Result<(DecodingKey, Algorithm), AuthError> {
        let cached = self.keys().await?;
        if let Some(found) = key_for(&cached, kid) {
            return found;
        }

        let refreshed = self.fetch_keys().await?;
        key_for(&refreshed, kid).unwrap_or_else(|| {
            tracing::warn!(kid = %kid, "No matching key in JWKS");
            Err(AuthError::InvalidToken)
        })
    }
}

/// Looks up `kid`; `None` when the set does not carry it.
fn key_for(jwks: &JwkSet, kid: &str) -> Option<Result<(DecodingKey, Algorithm), AuthError>> {
    let jwk = jwks.find(kid)?;

    let algorithm = match jwk.common.key_algorithm {
        Some(KeyAlgorithm::RS256) | None => Algorithm::RS256,
        Some(KeyAlgorithm::RS384) => Algorithm::RS384,
        Some(KeyAlgorithm::RS512) => Algorithm::RS512,
        Some(KeyAlgorithm::ES256) => Algorithm::ES256,
        Some(KeyAlgorithm::ES384) => Algorithm::ES384,
        Some(other) => {
            tracing::warn!(algorithm = ?other, "Unsupported JWK algorithm");
            return Some(Err(AuthError::InvalidToken));
        }
    };

    Some(
        DecodingKey::from_jwk(jwk)
            .map(|key| (key, algorithm))
            .map_err(|e| {
                tracing::warn!(error = %e, "Unusable JWK");
                AuthError::InvalidToken
            }),
    )
}

#[async_trait]
impl SessionValidator for OidcSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let kid = decode_header(token)
            .ok()
            .and_then(|header| header.kid)
            .ok_or(AuthError::InvalidToken)?;

        let (key, algorithm) = self.decoding_key(&kid).await?;

        let claims = decode::<SubjectClaim>(token, &key, &self.config.validation(algorithm))
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::warn!(error = %e, "Token validation failed");
                    AuthError::InvalidToken
                }
            })?
            .claims;

        let id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id))
    }
}

impl std::fmt::Debug for OidcSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcSessionValidator")
            .field("issuer_url", &self.config.issuer_url)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}
