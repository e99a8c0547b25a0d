// Authentication and authorization
//
// - verifier: IdentityVerifier trait, VerifyError, revocation list
// - jwt / jwks: HS256 shared-secret and RS256 JWKS verifiers
// - gate: bearer token -> UserContext, role checks
// - middleware: axum extractors (CurrentUser, RequireRole<P>)
// - config: AUTH_* environment configuration

pub mod config;
pub mod gate;
pub mod jwks;
pub mod jwt;
pub mod middleware;
pub mod verifier;

pub use config::{AuthConfig, AuthConfigError, VerifierKind};
pub use gate::{require_role, AuthError, AuthErrorClass, AuthGate};
pub use jwks::JwksVerifier;
pub use jwt::JwtVerifier;
pub use middleware::{CurrentUser, RequireRole, RolePolicy, TenantManagers, UserAdmins};
pub use verifier::{IdentityVerifier, RevocationList, VerifiedIdentity, VerifyError};
