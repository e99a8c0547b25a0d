// Tenantry API server
// Decision: Users live in Postgres when DATABASE_URL is set, in memory otherwise
// Decision: Auth key material is mandatory; the server refuses to start without it

use anyhow::{Context, Result};
use std::sync::Arc;
use tenantry_control_plane::api::{AppState, PublicLinks};
use tenantry_control_plane::app::{build_router, RouterOptions};
use tenantry_control_plane::auth::{AuthConfig, AuthGate};
use tenantry_control_plane::config::ServerConfig;
use tenantry_control_plane::services::{TenantService, UserService};
use tenantry_control_plane::storage::{
    InMemoryUserDirectory, JsonFileBackend, PgUserDirectory, TenantStore, UserDirectory,
};
use tenantry_core::telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Configure via environment variables:
    // - RUST_LOG: Log filter (default: "tenantry_control_plane=debug,tower_http=debug")
    // - LOG_FORMAT: "text" or "json"
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == "tenantry" {
        telemetry_config.service_name = "tenantry-control-plane".to_string();
    }
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter =
            Some("tenantry_control_plane=debug,tower_http=debug".to_string());
    }
    telemetry_config.service_version = Some(env!("CARGO_PKG_VERSION").to_string());
    init_telemetry(&telemetry_config).context("Failed to initialize logging")?;

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let auth_config = AuthConfig::from_env();

    let revocations = auth_config.revocations();
    let verifier = auth_config
        .build_verifier(revocations)
        .context("Invalid authentication configuration")?;
    tracing::info!(
        verifier = verifier.kind(),
        issuer = auth_config.issuer.as_deref().unwrap_or("-"),
        audience = auth_config.audience.as_deref().unwrap_or("-"),
        revoked = auth_config.revoked_subjects.len(),
        "Authentication configured"
    );

    let directory = user_directory(&config).await?;
    tracing::info!(backend = directory.backend_name(), "User directory ready");

    let backend = Arc::new(JsonFileBackend::new(config.tenants_file.clone()));
    let store = Arc::new(TenantStore::new(backend, config.tenant_defaults.clone()));
    tracing::info!(path = %config.tenants_file.display(), "Tenant store ready");

    let gate = AuthGate::new(verifier, directory.clone())
        .with_verify_timeout(auth_config.verify_timeout);

    let state = AppState {
        gate: Arc::new(gate),
        tenants: Arc::new(TenantService::new(store)),
        users: Arc::new(UserService::new(directory)),
        links: PublicLinks::new(config.public_base_url.clone()),
    };

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    if config.cors_allowed_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?config.cors_allowed_origins, "CORS origins configured");
    }

    let options = RouterOptions {
        api_prefix: config.api_prefix.clone(),
        cors_allowed_origins: config.cors_allowed_origins.clone(),
        assets_dir: config.assets_dir.clone(),
    };
    let app = build_router(state, &options);

    let addr = config.bind_addr().context("Invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn user_directory(config: &ServerConfig) -> Result<Arc<dyn UserDirectory>> {
    if let Some(url) = &config.database_url {
        let directory = PgUserDirectory::connect(url)
            .await
            .context("Failed to connect to database")?;
        return Ok(Arc::new(directory));
    }

    let directory = match &config.user_directory_seed {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            InMemoryUserDirectory::from_seed_json(&raw).context("Invalid user directory seed")?
        }
        None => InMemoryUserDirectory::new(),
    };
    tracing::warn!(
        profiles = directory.len(),
        "DATABASE_URL not set, user profiles are kept in memory"
    );
    Ok(Arc::new(directory))
}
