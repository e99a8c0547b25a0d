// Shared-secret JWT verification
// Decision: Use HS256 algorithm for simplicity (symmetric key)
// Decision: Issuer and audience are only checked when configured

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;

use super::verifier::{IdTokenClaims, IdentityVerifier, RevocationList, VerifiedIdentity, VerifyError};

/// Verifies HS256 tokens signed with a shared secret.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    revocations: Arc<RevocationList>,
}

impl JwtVerifier {
    pub fn new(
        secret: &str,
        issuer: Option<&str>,
        audience: Option<&str>,
        revocations: Arc<RevocationList>,
    ) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: build_validation(Algorithm::HS256, issuer, audience),
            revocations,
        }
    }
}

/// Validation rules shared by the HS256 and RS256 verifiers.
pub(crate) fn build_validation(
    algorithm: Algorithm,
    issuer: Option<&str>,
    audience: Option<&str>,
) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    validation.leeway = 30;
    validation.set_required_spec_claims(&["exp", "sub"]);

    if let Some(issuer) = issuer {
        validation.set_issuer(&[issuer]);
    }
    match audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }
    validation
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
        let data = decode::<IdTokenClaims>(token, &self.decoding_key, &self.validation)?;
        data.claims.into_identity(&self.revocations)
    }

    fn kind(&self) -> &'static str {
        "jwt"
    }
}
