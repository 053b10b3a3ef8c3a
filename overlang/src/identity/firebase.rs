//! Firebase ID token verification.
//!
//! Tokens are RS256 JWTs signed with Google's rotating secure-token keys.
//! The public key set is fetched over HTTPS and cached for as long as the
//! response's `Cache-Control: max-age` allows.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use parking_lot::RwLock;
use reqwest::header::{CACHE_CONTROL, HeaderMap};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{IdentityError, IdentityVerifier, VerifiedIdentity};
use crate::{Error, Result};

/// Google's JWK endpoint for Firebase secure-token signing keys.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Used when the key endpoint omits `max-age`.
const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);

const MIN_KEY_TTL: Duration = Duration::from_secs(60);

/// Firebase configuration.
#[derive(Debug, Clone, Default)]
pub struct FirebaseConfig {
    /// Path to the service-account JSON. `None` disables verification.
    pub service_account_path: Option<String>,
}

impl FirebaseConfig {
    /// Load from `FIREBASE_SERVICE_ACCOUNT_PATH`. Blank values count as unset.
    pub fn from_env() -> Self {
        let service_account_path = std::env::var("FIREBASE_SERVICE_ACCOUNT_PATH")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Self {
            service_account_path,
        }
    }

    /// Resolve the configured path, accepting an optional `file:` prefix.
    pub fn resolve_path(&self) -> Option<PathBuf> {
        let raw = self.service_account_path.as_deref()?.trim();
        let raw = raw.strip_prefix("file:").unwrap_or(raw);
        if raw.is_empty() {
            return None;
        }
        Some(PathBuf::from(raw))
    }

    /// Read the service-account file and return its `project_id`.
    pub fn load_project_id(&self) -> Result<String> {
        let path = self
            .resolve_path()
            .ok_or_else(|| Error::config("Firebase service account path is not set"))?;

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            Error::config(format!(
                "Failed to read Firebase service account '{}': {}",
                path.display(),
                e
            ))
        })?;

        let account: ServiceAccount = serde_json::from_str(&contents)?;
        account
            .project_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "Firebase service account '{}' has no project_id",
                    path.display()
                ))
            })
    }
}

#[derive(Debug, Deserialize)]
struct ServiceAccount {
    project_id: Option<String>,
}

/// Claims carried by a Firebase ID token that we care about.
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

struct CachedKeys {
    keys: JwkSet,
    expires_at: Instant,
}

/// Verifies Firebase ID tokens for a single project.
pub struct FirebaseTokenVerifier {
    project_id: String,
    jwks_url: String,
    http: reqwest::Client,
    validation: Validation,
    keys: RwLock<Option<CachedKeys>>,
}

impl FirebaseTokenVerifier {
    pub fn new(project_id: impl Into<String>, http: reqwest::Client) -> Self {
        let project_id = project_id.into();
        let validation = Self::build_validation(&project_id);
        Self {
            project_id,
            jwks_url: FIREBASE_JWKS_URL.to_string(),
            http,
            validation,
            keys: RwLock::new(None),
        }
    }

    /// Create a verifier with a fixed key set that is never refetched.
    pub fn with_static_keys(
        project_id: impl Into<String>,
        http: reqwest::Client,
        keys: JwkSet,
    ) -> Self {
        let verifier = Self::new(project_id, http);
        *verifier.keys.write() = Some(CachedKeys {
            keys,
            expires_at: Instant::now() + Duration::from_secs(365 * 24 * 3600),
        });
        verifier
    }

    fn build_validation(project_id: &str) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[format!("{}{}", ISSUER_PREFIX, project_id)]);
        validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);
        validation
    }

    /// Look up `kid` in the cached key set if the cache is still fresh.
    ///
    /// `Ok(None)` means the cache is missing or stale.
    fn cached_key(&self, kid: &str) -> std::result::Result<Option<DecodingKey>, IdentityError> {
        let guard = self.keys.read();
        let Some(cached) = guard.as_ref() else {
            return Ok(None);
        };
        if cached.expires_at <= Instant::now() {
            return Ok(None);
        }

        let jwk = cached
            .keys
            .find(kid)
            .ok_or_else(|| IdentityError::InvalidToken(format!("unknown key id '{}'", kid)))?;

        DecodingKey::from_jwk(jwk)
            .map(Some)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))
    }

    async fn refresh_keys(&self) -> std::result::Result<(), IdentityError> {
        debug!(url = %self.jwks_url, "Fetching identity provider signing keys");

        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| IdentityError::KeyFetch(e.to_string()))?;

        let ttl = cache_max_age(response.headers())
            .unwrap_or(DEFAULT_KEY_TTL)
            .max(MIN_KEY_TTL);
        let keys: JwkSet = response
            .json()
            .await
            .map_err(|e| IdentityError::KeyFetch(e.to_string()))?;

        debug!(count = keys.keys.len(), ttl_secs = ttl.as_secs(), "Signing keys cached");

        *self.keys.write() = Some(CachedKeys {
            keys,
            expires_at: Instant::now() + ttl,
        });
        Ok(())
    }

    async fn decoding_key(&self, kid: &str) -> std::result::Result<DecodingKey, IdentityError> {
        if let Some(key) = self.cached_key(kid)? {
            return Ok(key);
        }

        self.refresh_keys().await?;

        self.cached_key(kid)?
            .ok_or_else(|| IdentityError::KeyFetch("signing key cache is empty".to_string()))
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> std::result::Result<VerifiedIdentity, IdentityError> {
        let result = self.verify_inner(token).await;
        if let Err(e) = &result {
            warn!(error = %e, "Firebase verify failed");
        }
        result
    }
}

impl FirebaseTokenVerifier {
    async fn verify_inner(&self, token: &str) -> std::result::Result<VerifiedIdentity, IdentityError> {
        let header =
            decode_header(token).map_err(|e| IdentityError::InvalidToken(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(IdentityError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| IdentityError::InvalidToken("missing key id".to_string()))?;

        let key = self.decoding_key(&kid).await?;

        let data =
            decode::<FirebaseClaims>(token, &key, &self.validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => IdentityError::TokenExpired,
                _ => IdentityError::InvalidToken(e.to_string()),
            })?;

        let claims = data.claims;
        if claims.sub.trim().is_empty() {
            return Err(IdentityError::InvalidToken("empty subject".to_string()));
        }

        info!(
            external_id = %claims.sub,
            project_id = %self.project_id,
            "Firebase verify success"
        );

        Ok(VerifiedIdentity::new(claims.sub, claims.email, claims.name))
    }
}

/// Parse `max-age` out of a `Cache-Control` header.
fn cache_max_age(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(CACHE_CONTROL)?.to_str().ok()?;
    value
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
