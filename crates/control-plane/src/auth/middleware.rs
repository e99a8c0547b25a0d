// Authentication extractors
// Decision: Header-based bearer auth only; there is no cookie or anonymous mode
// Decision: Role requirements are types (RequireRole<TenantManagers>) so each
//           handler's signature states who may call it

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::marker::PhantomData;
use std::sync::Arc;
use tenantry_core::{Role, UserContext};

use super::gate::AuthGate;
use crate::api::error::ApiError;

fn authorization_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Any authenticated and provisioned caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<AuthGate>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = Arc::<AuthGate>::from_ref(state);
        let user = gate
            .resolve_current_user(authorization_header(parts))
            .await?;
        Ok(CurrentUser(user))
    }
}

/// Allowed role set for a route.
pub trait RolePolicy: Send + Sync + 'static {
    const ALLOWED: &'static [Role];
}

/// Admin and HR.
pub struct TenantManagers;

impl RolePolicy for TenantManagers {
    const ALLOWED: &'static [Role] = Role::TENANT_MANAGERS;
}

/// Admin only.
pub struct UserAdmins;

impl RolePolicy for UserAdmins {
    const ALLOWED: &'static [Role] = Role::USER_ADMINS;
}

/// Authenticated caller whose role is in `P::ALLOWED`.
pub struct RequireRole<P: RolePolicy>(pub UserContext, PhantomData<P>);

impl<P: RolePolicy> RequireRole<P> {
    pub fn user(&self) -> &UserContext {
        &self.0
    }

    pub fn into_inner(self) -> UserContext {
        self.0
    }
}

#[axum::async_trait]
impl<S, P> FromRequestParts<S> for RequireRole<P>
where
    S: Send + Sync,
    P: RolePolicy,
    Arc<AuthGate>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = Arc::<AuthGate>::from_ref(state);
        let user = gate
            .authorize(authorization_header(parts), P::ALLOWED)
            .await?;
        Ok(RequireRole(user, PhantomData))
    }
}
