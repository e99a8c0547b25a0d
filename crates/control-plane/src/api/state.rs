// Shared application state
// Decision: One state for every route; extractors pull the piece they need
//           through FromRef (Arc<AuthGate> for the auth extractors)

use axum::extract::FromRef;
use std::sync::Arc;

use super::tenants::PublicLinks;
use crate::auth::AuthGate;
use crate::services::{TenantService, UserService};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
    pub tenants: Arc<TenantService>,
    pub users: Arc<UserService>,
    pub links: PublicLinks,
}
