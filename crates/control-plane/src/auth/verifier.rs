// Identity verification
// Decision: The gate only sees the IdentityVerifier trait; HS256 shared-secret
//           and RS256/JWKS verification are interchangeable implementations
// Decision: Verification failures are classified so logs can say why a token
//           was refused, but every class maps to the same 401 on the wire
// Decision: Revocation is by subject with a cutoff time: tokens issued at or
//           before the cutoff are refused

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Identity established from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token has been revoked")]
    Revoked,

    #[error("token rejected: {0}")]
    Invalid(String),

    /// The verifier could not reach its key source or did not answer in time.
    #[error("verifier unavailable: {0}")]
    Transport(String),
}

impl VerifyError {
    /// Stable label for the `auth.reason` log field.
    pub fn reason(&self) -> &'static str {
        match self {
            VerifyError::Malformed => "malformed",
            VerifyError::InvalidSignature => "invalid_signature",
            VerifyError::Expired => "expired",
            VerifyError::Revoked => "revoked",
            VerifyError::Invalid(_) => "invalid",
            VerifyError::Transport(_) => "transport",
        }
    }
}

impl From<JwtError> for VerifyError {
    fn from(err: JwtError) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => VerifyError::Malformed,
            ErrorKind::InvalidIssuer => VerifyError::Invalid("issuer mismatch".to_string()),
            ErrorKind::InvalidAudience => VerifyError::Invalid("audience mismatch".to_string()),
            ErrorKind::ImmatureSignature => VerifyError::Invalid("token not yet valid".to_string()),
            ErrorKind::InvalidAlgorithm => VerifyError::Invalid("algorithm not allowed".to_string()),
            ErrorKind::MissingRequiredClaim(claim) => {
                VerifyError::Invalid(format!("missing claim: {claim}"))
            }
            _ => VerifyError::Invalid(err.to_string()),
        }
    }
}

/// Verifies a bearer token and returns the identity it carries.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError>;

    /// Short label for startup logs.
    fn kind(&self) -> &'static str;
}

/// Claims read from ID tokens. Anything else in the payload is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct IdTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl IdTokenClaims {
    pub(crate) fn into_identity(
        self,
        revocations: &RevocationList,
    ) -> Result<VerifiedIdentity, VerifyError> {
        if self.sub.is_empty() {
            return Err(VerifyError::Invalid("empty subject".to_string()));
        }
        revocations.check(&self.sub, self.iat)?;
        Ok(VerifiedIdentity {
            subject_id: self.sub,
            email: self.email,
        })
    }
}

// ============================================================================
// Revocation
// ============================================================================

/// Subjects whose tokens issued up to a cutoff are no longer accepted.
#[derive(Debug, Default)]
pub struct RevocationList {
    cutoffs: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke every token for `subject_id` issued at or before `at`.
    pub fn revoke(&self, subject_id: impl Into<String>, at: DateTime<Utc>) {
        self.cutoffs.write().insert(subject_id.into(), at);
    }

    pub fn is_empty(&self) -> bool {
        self.cutoffs.read().is_empty()
    }

    /// Tokens without an `iat` claim for a revoked subject are refused.
    pub fn check(&self, subject_id: &str, issued_at: Option<i64>) -> Result<(), VerifyError> {
        let cutoffs = self.cutoffs.read();
        let Some(cutoff) = cutoffs.get(subject_id) else {
            return Ok(());
        };
        match issued_at {
            Some(iat) if iat > cutoff.timestamp() => Ok(()),
            _ => Err(VerifyError::Revoked),
        }
    }
}
