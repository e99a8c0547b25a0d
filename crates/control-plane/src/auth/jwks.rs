// RS256 verification against a published JWKS
// Decision: Keys are cached for a fixed TTL; an unknown `kid` forces one
//           refresh before the token is refused (handles key rotation)
// Decision: Unknown-kid refreshes are rate limited by a minimum interval, so
//           unauthenticated callers cannot drive fetches against the IdP
// Decision: Only RS256 is accepted; the header algorithm is never trusted

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::jwt::build_validation;
use super::verifier::{IdTokenClaims, IdentityVerifier, RevocationList, VerifiedIdentity, VerifyError};

/// Default minimum time between two JWKS fetches triggered by unknown key ids.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

struct CachedJwks {
    jwks: JwkSet,
    fetched_at: Instant,
    expires_at: Instant,
}

pub struct JwksVerifier {
    client: reqwest::Client,
    jwks_url: String,
    validation: Validation,
    ttl: Duration,
    min_refresh_interval: Duration,
    cache: RwLock<Option<CachedJwks>>,
    revocations: Arc<RevocationList>,
}

impl JwksVerifier {
    pub fn new(
        jwks_url: impl Into<String>,
        issuer: Option<&str>,
        audience: Option<&str>,
        ttl: Duration,
        revocations: Arc<RevocationList>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            jwks_url: jwks_url.into(),
            validation: build_validation(Algorithm::RS256, issuer, audience),
            ttl,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            cache: RwLock::new(None),
            revocations,
        }
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// True when the cached set is older than the minimum refresh interval.
    fn refresh_allowed(&self) -> bool {
        self.cache
            .read()
            .as_ref()
            .map_or(true, |entry| entry.fetched_at.elapsed() >= self.min_refresh_interval)
    }

    async fn get_jwks(&self) -> Result<JwkSet, VerifyError> {
        let cached = self
            .cache
            .read()
            .as_ref()
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.jwks.clone());

        match cached {
            Some(jwks) => Ok(jwks),
            None => self.refresh_jwks().await,
        }
    }

    async fn refresh_jwks(&self) -> Result<JwkSet, VerifyError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| VerifyError::Transport(e.to_string()))?;

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| VerifyError::Transport(format!("invalid JWKS document: {e}")))?;

        tracing::debug!(url = %self.jwks_url, keys = jwks.keys.len(), "refreshed JWKS");

        let now = Instant::now();
        *self.cache.write() = Some(CachedJwks {
            jwks: jwks.clone(),
            fetched_at: now,
            expires_at: now + self.ttl,
        });
        Ok(jwks)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, VerifyError> {
        let mut jwks = self.get_jwks().await?;
        if jwks.find(kid).is_none() {
            if self.refresh_allowed() {
                jwks = self.refresh_jwks().await?;
            } else {
                tracing::debug!(kid = %kid, "unknown key id, JWKS refresh throttled");
            }
        }
        let jwk = jwks
            .find(kid)
            .ok_or_else(|| VerifyError::Invalid(format!("unknown key id: {kid}")))?;
        DecodingKey::from_jwk(jwk).map_err(|e| VerifyError::Invalid(format!("unusable key: {e}")))
    }
}

#[async_trait]
impl IdentityVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
        let header = decode_header(token).map_err(|_| VerifyError::Malformed)?;
        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::Invalid(format!(
                "algorithm not allowed: {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| VerifyError::Invalid("missing key id".to_string()))?;

        let key = self.decoding_key(&kid).await?;
        let data = decode::<IdTokenClaims>(token, &key, &self.validation)?;
        data.claims.into_identity(&self.revocations)
    }

    fn kind(&self) -> &'static str {
        "jwks"
    }
}
