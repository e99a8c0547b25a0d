// Auth gate: bearer token -> verified identity -> directory profile -> UserContext
// Decision: Verification runs before any directory lookup; a request that
//           fails verification never touches the directory
// Decision: Every refusal is logged here with a reason; the HTTP layer only
//           maps the error class to a status code
// Decision: Verifier calls are bounded by a timeout and a timeout counts as a
//           transport failure (401), not a server error

use std::sync::Arc;
use std::time::Duration;
use tenantry_core::{format_roles, Role, UserContext};
use thiserror::Error;

use super::verifier::{IdentityVerifier, VerifyError};
use crate::storage::{StoreError, UserDirectory};

const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing or not a bearer token")]
    MissingCredentials,

    #[error(transparent)]
    InvalidToken(#[from] VerifyError),

    /// Token is valid but the subject has no usable directory record.
    #[error("identity not provisioned: {0}")]
    NotProvisioned(&'static str),

    #[error("role {role} not in [{allowed}]")]
    RoleDenied { role: Role, allowed: String },

    #[error("user directory unavailable")]
    DirectoryUnavailable(#[source] StoreError),
}

/// Coarse outcome used for status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorClass {
    Unauthenticated,
    Forbidden,
    StoreUnavailable,
}

impl AuthError {
    pub fn class(&self) -> AuthErrorClass {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidToken(_) => {
                AuthErrorClass::Unauthenticated
            }
            AuthError::NotProvisioned(_) | AuthError::RoleDenied { .. } => {
                AuthErrorClass::Forbidden
            }
            AuthError::DirectoryUnavailable(_) => AuthErrorClass::StoreUnavailable,
        }
    }
}

/// Extract the token from `Bearer <token>`. Scheme match is exact.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub struct AuthGate {
    verifier: Arc<dyn IdentityVerifier>,
    directory: Arc<dyn UserDirectory>,
    verify_timeout: Duration,
}

impl AuthGate {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            verifier,
            directory,
            verify_timeout: DEFAULT_VERIFY_TIMEOUT,
        }
    }

    pub fn with_verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = timeout;
        self
    }

    /// Authenticate the caller and load their role and tenant.
    pub async fn resolve_current_user(
        &self,
        authorization: Option<&str>,
    ) -> Result<UserContext, AuthError> {
        let Some(token) = bearer_token(authorization) else {
            tracing::warn!(auth.reason = "missing_bearer", "request refused");
            return Err(AuthError::MissingCredentials);
        };

        let verified = tokio::time::timeout(self.verify_timeout, self.verifier.verify(token))
            .await
            .unwrap_or_else(|_| Err(VerifyError::Transport("verification timed out".to_string())));

        let identity = verified.map_err(|e| {
            tracing::warn!(
                auth.reason = e.reason(),
                error = %e,
                "token verification failed"
            );
            AuthError::InvalidToken(e)
        })?;

        let profile = self
            .directory
            .fetch(&identity.subject_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    auth.subject = %identity.subject_id,
                    error = %e,
                    "user directory lookup failed"
                );
                AuthError::DirectoryUnavailable(e)
            })?;

        let Some(profile) = profile else {
            tracing::warn!(
                auth.subject = %identity.subject_id,
                auth.reason = "no_profile",
                "identity not provisioned"
            );
            return Err(AuthError::NotProvisioned("no directory record"));
        };

        let (role, tenant) = profile.authorize_fields().map_err(|defect| {
            tracing::warn!(
                auth.subject = %identity.subject_id,
                auth.reason = defect.reason(),
                "identity not provisioned"
            );
            AuthError::NotProvisioned(defect.reason())
        })?;

        tracing::info!(
            auth.subject = %identity.subject_id,
            auth.role = %role,
            tenant.key = %tenant,
            "authenticated"
        );

        Ok(UserContext {
            subject_id: identity.subject_id,
            email: identity.email,
            role,
            tenant_key: tenant.to_string(),
        })
    }

    /// Authenticate, then require the caller's role to be in `allowed`.
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        allowed: &[Role],
    ) -> Result<UserContext, AuthError> {
        let user = self.resolve_current_user(authorization).await?;
        require_role(user, allowed)
    }
}

/// Check an already-resolved caller against an allowed role set.
pub fn require_role(user: UserContext, allowed: &[Role]) -> Result<UserContext, AuthError> {
    if user.role.is_one_of(allowed) {
        return Ok(user);
    }

    let allowed = format_roles(allowed);
    tracing::warn!(
        auth.subject = %user.subject_id,
        auth.role = %user.role,
        auth.allowed = %allowed,
        "role denied"
    );
    Err(AuthError::RoleDenied {
        role: user.role,
        allowed,
    })
}
