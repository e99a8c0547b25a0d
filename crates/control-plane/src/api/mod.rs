// HTTP API routes
//
// This module contains all HTTP route handlers for the public API.
// Every route shares AppState; auth is applied per handler via extractors.

pub mod auth;
pub mod common;
pub mod error;
pub mod health;
pub mod state;
pub mod tenants;

// Re-export common types
pub use common::{ErrorResponse, MessageResponse};
pub use error::ApiError;
pub use state::AppState;
pub use tenants::PublicLinks;
