// Tenantry Control Plane Library
// Decision: Shared library for binaries (API server, OpenAPI export) and router tests

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Router assembly
pub mod app;

// Authentication and role gating
pub mod auth;

// Environment configuration
pub mod config;

// Services layer
pub mod services;
pub use services::{TenantService, UserService};

// Storage layer
pub mod storage;

// OpenAPI spec generation
pub mod openapi;
