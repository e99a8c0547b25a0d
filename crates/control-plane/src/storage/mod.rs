// Storage layer for the Tenantry control-plane
// Decision: User directory supports PostgreSQL (production) and in-memory (dev mode)
// Decision: Tenant configuration is a single JSON document (file or memory)
//
// - UserDirectory: subject id -> {role, tenant}
// - TenantDocumentBackend: load/save of the whole tenant document
// - TenantStore: serialized mutations on top of a document backend

pub mod documents;
pub mod error;
pub mod postgres;
pub mod tenants;
pub mod users;

pub use documents::{
    InMemoryDocumentBackend, JsonFileBackend, TenantDocument, TenantDocumentBackend,
};
pub use error::StoreError;
pub use postgres::PgUserDirectory;
pub use tenants::TenantStore;
pub use users::{InMemoryUserDirectory, UserDirectory};
