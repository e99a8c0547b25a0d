// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: A verifier without key material is a startup error, never a
//           silent "accept everything" mode

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::jwks::{JwksVerifier, DEFAULT_MIN_REFRESH_INTERVAL};
use super::jwt::JwtVerifier;
use super::verifier::{IdentityVerifier, RevocationList};

/// Which identity verifier to build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VerifierKind {
    /// HS256 with a shared secret
    #[default]
    Jwt,
    /// RS256 with keys from a JWKS endpoint
    Jwks,
}

impl VerifierKind {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "jwks" => VerifierKind::Jwks,
            _ => VerifierKind::Jwt,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthConfigError {
    #[error("AUTH_JWT_SECRET is required when AUTH_VERIFIER=jwt")]
    MissingSecret,
    #[error("AUTH_JWKS_URL is required when AUTH_VERIFIER=jwks")]
    MissingJwksUrl,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub verifier: VerifierKind,
    pub jwt_secret: Option<String>,
    pub jwks_url: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// How long fetched JWKS keys are trusted before a refresh
    pub jwks_ttl: Duration,
    /// Minimum time between JWKS fetches caused by unknown key ids
    pub jwks_min_refresh: Duration,
    /// Upper bound on a single token verification
    pub verify_timeout: Duration,
    /// Subjects whose existing tokens are refused from startup on
    pub revoked_subjects: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            verifier: VerifierKind::Jwt,
            jwt_secret: None,
            jwks_url: None,
            issuer: None,
            audience: None,
            jwks_ttl: Duration::from_secs(3600),
            jwks_min_refresh: DEFAULT_MIN_REFRESH_INTERVAL,
            verify_timeout: Duration::from_millis(5000),
            revoked_subjects: Vec::new(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, test map, ...)
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            verifier: non_empty("AUTH_VERIFIER")
                .map(|s| VerifierKind::from_str(&s))
                .unwrap_or_default(),
            jwt_secret: non_empty("AUTH_JWT_SECRET"),
            jwks_url: non_empty("AUTH_JWKS_URL"),
            issuer: non_empty("AUTH_ISSUER"),
            audience: non_empty("AUTH_AUDIENCE"),
            jwks_ttl: non_empty("AUTH_JWKS_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.jwks_ttl),
            jwks_min_refresh: non_empty("AUTH_JWKS_MIN_REFRESH_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.jwks_min_refresh),
            verify_timeout: non_empty("AUTH_VERIFY_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.verify_timeout),
            revoked_subjects: non_empty("AUTH_REVOKED_SUBJECTS")
                .map(|s| {
                    s.split(',')
                        .map(|part| part.trim().to_string())
                        .filter(|part| !part.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Revocation list seeded with the configured subjects, cut off at startup.
    pub fn revocations(&self) -> Arc<RevocationList> {
        let list = RevocationList::new();
        let now = Utc::now();
        for subject in &self.revoked_subjects {
            list.revoke(subject.clone(), now);
        }
        Arc::new(list)
    }

    pub fn build_verifier(
        &self,
        revocations: Arc<RevocationList>,
    ) -> Result<Arc<dyn IdentityVerifier>, AuthConfigError> {
        let issuer = self.issuer.as_deref();
        let audience = self.audience.as_deref();

        match self.verifier {
            VerifierKind::Jwt => {
                let secret = self
                    .jwt_secret
                    .as_deref()
                    .ok_or(AuthConfigError::MissingSecret)?;
                Ok(Arc::new(JwtVerifier::new(
                    secret,
                    issuer,
                    audience,
                    revocations,
                )))
            }
            VerifierKind::Jwks => {
                let url = self
                    .jwks_url
                    .as_deref()
                    .ok_or(AuthConfigError::MissingJwksUrl)?;
                Ok(Arc::new(
                    JwksVerifier::new(url, issuer, audience, self.jwks_ttl, revocations)
                        .with_min_refresh_interval(self.jwks_min_refresh),
                ))
            }
        }
    }
}
