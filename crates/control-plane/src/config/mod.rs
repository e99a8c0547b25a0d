// Configuration loading and parsing
//
// Server settings (bind address, routing, storage locations, tenant defaults).
// Auth settings live in auth::config.

pub mod server;

pub use server::{ConfigError, ServerConfig};
