// Tenant API routes
// Decision: Tenant is taken from the path (/tenant/{tenant}/...), never the Host
// Decision: Reads need any authenticated user; writes need Admin or HR
// Decision: Relative logos are made absolute at response time; storage keeps
//           whatever the client sent

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tenantry_core::{FeatureFlags, Layout, NewTenant, TenantConfig, TenantPatch};
use utoipa::ToSchema;

use super::common::ErrorResponse;
use super::error::ApiError;
use super::state::AppState;
use crate::auth::{CurrentUser, RequireRole, TenantManagers};

/// Path under which logo files are served.
pub const STATIC_LOGOS_PATH: &str = "/static/logos";

/// Request to create a tenant. Omitted branding fields use the service defaults.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    /// Unique tenant key.
    #[schema(example = "acme")]
    pub tenant: String,
    #[schema(example = "#2563eb")]
    pub primary_color: Option<String>,
    #[schema(example = "#a21caf")]
    pub secondary_color: Option<String>,
    pub logo: Option<String>,
    pub brand_name: Option<String>,
    pub layout: Option<Layout>,
    /// Initial feature flags. Replaces the default set when supplied.
    #[schema(value_type = Option<Object>)]
    pub features: Option<FeatureFlags>,
}

impl CreateTenantRequest {
    fn into_parts(self) -> (String, NewTenant) {
        (
            self.tenant,
            NewTenant {
                primary_color: self.primary_color,
                secondary_color: self.secondary_color,
                logo: self.logo,
                brand_name: self.brand_name,
                layout: self.layout,
                features: self.features,
            },
        )
    }
}

/// Partial branding update. A supplied `features` map replaces the stored one.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantConfigRequest {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo: Option<String>,
    pub brand_name: Option<String>,
    pub layout: Option<Layout>,
    #[schema(value_type = Option<Object>)]
    pub features: Option<FeatureFlags>,
}

impl From<UpdateTenantConfigRequest> for TenantPatch {
    fn from(req: UpdateTenantConfigRequest) -> Self {
        TenantPatch {
            primary_color: req.primary_color,
            secondary_color: req.secondary_color,
            logo: req.logo,
            brand_name: req.brand_name,
            layout: req.layout,
            features: req.features,
        }
    }
}

/// Feature delta, merged key by key into the stored flags.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateFeaturesRequest {
    #[schema(value_type = Object, example = json!({"feature2": false}))]
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateTenantResponse {
    pub message: String,
    pub tenant: TenantConfig,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateFeaturesResponse {
    pub message: String,
    #[schema(value_type = Object)]
    pub features: FeatureFlags,
}

/// Turns stored relative logo paths into absolute URLs.
#[derive(Debug, Clone, Default)]
pub struct PublicLinks {
    /// Externally visible base URL, e.g. `https://tenants.example.com`.
    pub public_base_url: Option<String>,
}

impl PublicLinks {
    pub fn new(public_base_url: Option<String>) -> Self {
        Self {
            public_base_url: public_base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Configured base URL, or one derived from the request's Host header.
    pub fn base_url(&self, headers: &HeaderMap) -> Option<String> {
        if let Some(base) = &self.public_base_url {
            return Some(base.clone());
        }
        let host = headers.get(header::HOST)?.to_str().ok()?;
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("http");
        Some(format!("{proto}://{host}"))
    }

    pub fn resolve_logo(&self, logo: &str, headers: &HeaderMap) -> String {
        if logo.starts_with("http://") || logo.starts_with("https://") {
            return logo.to_string();
        }
        let Some(base) = self.base_url(headers) else {
            return logo.to_string();
        };
        if logo.starts_with('/') {
            format!("{base}{logo}")
        } else {
            format!("{base}{STATIC_LOGOS_PATH}/{logo}")
        }
    }
}

/// Create tenant routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenant/create", post(create_tenant))
        .route(
            "/tenant/:tenant/config",
            get(get_tenant_config).put(update_tenant_config),
        )
        .route(
            "/tenant/:tenant/features",
            get(get_tenant_features).put(update_tenant_features),
        )
}

/// POST /tenant/create - Create a tenant
#[utoipa::path(
    post,
    path = "/tenant/create",
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant created", body = CreateTenantResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 409, description = "Tenant already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "tenants"
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    _caller: RequireRole<TenantManagers>,
    payload: Result<Json<CreateTenantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateTenantResponse>), ApiError> {
    let Json(req) = payload?;
    let (key, input) = req.into_parts();

    let tenant = state.tenants.create(&key, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTenantResponse {
            message: format!("Tenant '{key}' created successfully."),
            tenant,
        }),
    ))
}

/// GET /tenant/{tenant}/config - Get tenant branding and features
#[utoipa::path(
    get,
    path = "/tenant/{tenant}/config",
    params(("tenant" = String, Path, description = "Tenant key")),
    responses(
        (status = 200, description = "Tenant configuration", body = TenantConfig),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "tenants"
)]
pub async fn get_tenant_config(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(tenant): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TenantConfig>, ApiError> {
    let mut config = state.tenants.get_config(&tenant).await?;
    if config.has_relative_logo() {
        config.logo = state.links.resolve_logo(&config.logo, &headers);
    }
    Ok(Json(config))
}

/// PUT /tenant/{tenant}/config - Update tenant branding
#[utoipa::path(
    put,
    path = "/tenant/{tenant}/config",
    params(("tenant" = String, Path, description = "Tenant key")),
    request_body = UpdateTenantConfigRequest,
    responses(
        (status = 200, description = "Updated configuration", body = TenantConfig),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "tenants"
)]
pub async fn update_tenant_config(
    State(state): State<AppState>,
    _caller: RequireRole<TenantManagers>,
    Path(tenant): Path<String>,
    payload: Result<Json<UpdateTenantConfigRequest>, JsonRejection>,
) -> Result<Json<TenantConfig>, ApiError> {
    let Json(req) = payload?;
    let config = state.tenants.update_config(&tenant, req.into()).await?;
    Ok(Json(config))
}

/// GET /tenant/{tenant}/features - Get tenant feature flags
#[utoipa::path(
    get,
    path = "/tenant/{tenant}/features",
    params(("tenant" = String, Path, description = "Tenant key")),
    responses(
        (status = 200, description = "Feature flags", body = std::collections::BTreeMap<String, bool>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "tenants"
)]
pub async fn get_tenant_features(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(tenant): Path<String>,
) -> Result<Json<FeatureFlags>, ApiError> {
    Ok(Json(state.tenants.get_features(&tenant).await?))
}

/// PUT /tenant/{tenant}/features - Merge feature flag changes
#[utoipa::path(
    put,
    path = "/tenant/{tenant}/features",
    params(("tenant" = String, Path, description = "Tenant key")),
    request_body = UpdateFeaturesRequest,
    responses(
        (status = 200, description = "Merged feature flags", body = UpdateFeaturesResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Tenant not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "tenants"
)]
pub async fn update_tenant_features(
    State(state): State<AppState>,
    _caller: RequireRole<TenantManagers>,
    Path(tenant): Path<String>,
    payload: Result<Json<UpdateFeaturesRequest>, JsonRejection>,
) -> Result<Json<UpdateFeaturesResponse>, ApiError> {
    let Json(req) = payload?;
    let features = state.tenants.update_features(&tenant, req.features).await?;
    Ok(Json(UpdateFeaturesResponse {
        message: format!("Features updated successfully for tenant '{tenant}'."),
        features,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_absolute_logo_untouched() {
        let links = PublicLinks::new(Some("https://tenants.example".into()));
        let logo = "https://cdn.example/acme.png";
        assert_eq!(links.resolve_logo(logo, &HeaderMap::new()), logo);
    }

    #[test]
    fn test_relative_logo_uses_public_base_url() {
        let links = PublicLinks::new(Some("https://tenants.example/".into()));
        assert_eq!(
            links.resolve_logo("acme.png", &HeaderMap::new()),
            "https://tenants.example/static/logos/acme.png"
        );
        assert_eq!(
            links.resolve_logo("/static/logos/acme.png", &HeaderMap::new()),
            "https://tenants.example/static/logos/acme.png"
        );
    }

    #[test]
    fn test_relative_logo_uses_request_host() {
        let links = PublicLinks::default();
        let forwarded = headers(&[("host", "api.example"), ("x-forwarded-proto", "https, http")]);
        assert_eq!(
            links.resolve_logo("acme.png", &forwarded),
            "https://api.example/static/logos/acme.png"
        );

        let plain = headers(&[("host", "localhost:8000")]);
        assert_eq!(
            links.resolve_logo("acme.png", &plain),
            "http://localhost:8000/static/logos/acme.png"
        );
    }

    #[test]
    fn test_relative_logo_without_host_is_left_alone() {
        assert_eq!(
            PublicLinks::default().resolve_logo("acme.png", &HeaderMap::new()),
            "acme.png"
        );
    }

    #[test]
    fn test_create_request_deserialize() {
        let req: CreateTenantRequest = serde_json::from_str(
            r##"{"tenant": "acme", "primaryColor": "#000000", "layout": "top"}"##,
        )
        .unwrap();
        let (key, input) = req.into_parts();
        assert_eq!(key, "acme");
        assert_eq!(input.primary_color.as_deref(), Some("#000000"));
        assert_eq!(input.layout, Some(Layout::Top));
        assert!(input.features.is_none());
    }

    #[test]
    fn test_update_request_rejects_unknown_layout() {
        let result = serde_json::from_str::<UpdateTenantConfigRequest>(r#"{"layout": "bottom"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_features_request_requires_map() {
        assert!(serde_json::from_str::<UpdateFeaturesRequest>(r#"{}"#).is_err());
        let req: UpdateFeaturesRequest =
            serde_json::from_str(r#"{"features": {"beta": true}}"#).unwrap();
        assert_eq!(req.features.get("beta"), Some(&true));
    }
}
