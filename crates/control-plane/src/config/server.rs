// Server configuration loaded from environment variables.
// Decision: Every setting has a working local default except auth key material
// Decision: Tenant defaults are configuration, read once and handed to the store

use std::net::SocketAddr;
use std::path::PathBuf;
use tenantry_core::{Layout, TenantDefaults, UnknownLayout};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid TENANT_DEFAULT_LAYOUT: {0}")]
    InvalidLayout(#[from] UnknownLayout),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix for all API routes, e.g. "/api". Empty means none.
    pub api_prefix: String,
    /// Allowed CORS origins. Empty disables CORS; "*" allows any origin.
    pub cors_allowed_origins: Vec<String>,
    /// JSON document holding every tenant
    pub tenants_file: PathBuf,
    /// PostgreSQL URL for the user directory; in-memory when unset
    pub database_url: Option<String>,
    /// JSON file seeding the in-memory user directory
    pub user_directory_seed: Option<PathBuf>,
    /// Directory served under /static/logos
    pub assets_dir: PathBuf,
    /// Externally visible base URL used for logo links
    pub public_base_url: Option<String>,
    pub tenant_defaults: TenantDefaults,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_prefix: String::new(),
            cors_allowed_origins: Vec::new(),
            tenants_file: PathBuf::from("./tenants.json"),
            database_url: None,
            user_directory_seed: None,
            assets_dir: PathBuf::from("./assets"),
            public_base_url: None,
            tenant_defaults: TenantDefaults::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match non_empty("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        let mut tenant_defaults = defaults.tenant_defaults;
        if let Some(v) = non_empty("TENANT_DEFAULT_PRIMARY_COLOR") {
            tenant_defaults.primary_color = v;
        }
        if let Some(v) = non_empty("TENANT_DEFAULT_SECONDARY_COLOR") {
            tenant_defaults.secondary_color = v;
        }
        if let Some(v) = non_empty("TENANT_DEFAULT_LOGO") {
            tenant_defaults.logo = v;
        }
        if let Some(v) = non_empty("TENANT_DEFAULT_BRAND_NAME") {
            tenant_defaults.brand_name = v;
        }
        if let Some(v) = non_empty("TENANT_DEFAULT_LAYOUT") {
            tenant_defaults.layout = v.parse::<Layout>()?;
        }

        Ok(Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port,
            api_prefix: non_empty("API_PREFIX")
                .map(|p| normalize_prefix(&p))
                .unwrap_or_default(),
            cors_allowed_origins: non_empty("CORS_ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            tenants_file: non_empty("TENANTS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.tenants_file),
            database_url: non_empty("DATABASE_URL"),
            user_directory_seed: non_empty("USER_DIRECTORY_SEED").map(PathBuf::from),
            assets_dir: non_empty("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
            public_base_url: non_empty("PUBLIC_BASE_URL"),
            tenant_defaults,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "HOST",
                value: self.host.clone(),
            })
    }
}

/// "api/" -> "/api", "/" -> ""
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.api_prefix, "");
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.tenants_file, PathBuf::from("./tenants.json"));
        assert!(config.database_url.is_none());
        assert_eq!(config.tenant_defaults, TenantDefaults::default());
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9100"),
            ("API_PREFIX", "api/"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
            ("TENANTS_FILE", "/var/lib/tenantry/tenants.json"),
            ("DATABASE_URL", "postgres://localhost/tenantry"),
            ("TENANT_DEFAULT_BRAND_NAME", "Acme Cloud"),
            ("TENANT_DEFAULT_LAYOUT", "top"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:9100");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/tenantry"));
        assert_eq!(config.tenant_defaults.brand_name, "Acme Cloud");
        assert_eq!(config.tenant_defaults.layout, Layout::Top);
        assert_eq!(config.tenant_defaults.primary_color, "#2563eb");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue { key: "PORT", .. })
        ));
        assert!(matches!(
            config_from(&[("TENANT_DEFAULT_LAYOUT", "bottom")]),
            Err(ConfigError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/api"), "/api");
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/api/v1/"), "/api/v1");
        assert_eq!(normalize_prefix("/"), "");
    }
}
