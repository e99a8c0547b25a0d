// Tenantry Core
//
// Domain types shared by the control-plane and any future workers or CLIs.
//
// Key design decisions:
// - No storage or HTTP dependencies; this crate only knows the data model
// - Roles are a closed enum parsed from raw directory strings (fail closed)
// - Tenant defaults are an explicit value, handed to whoever creates tenants
// - The two tenant update paths (patch vs. feature merge) live next to the type

pub mod role;
pub mod tenant;
pub mod user;

// Logging setup
pub mod telemetry;

pub use role::{format_roles, Role, UnknownRole};
pub use tenant::{
    FeatureFlags, Layout, NewTenant, TenantConfig, TenantDefaults, TenantPatch, UnknownLayout,
};
pub use user::{ProfileDefect, UserContext, UserProfile};
