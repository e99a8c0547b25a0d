// OpenAPI specification generation
//
// Shared by the API server (Swagger UI) and the export-openapi binary
// (static spec generation).

use crate::api;
use tenantry_core::{Layout, Role, TenantConfig, UserContext};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI documentation for the Tenantry API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::ping,
        api::health::health,
        api::auth::me,
        api::auth::get_user,
        api::auth::update_user,
        api::tenants::create_tenant,
        api::tenants::get_tenant_config,
        api::tenants::update_tenant_config,
        api::tenants::get_tenant_features,
        api::tenants::update_tenant_features,
    ),
    components(
        schemas(
            api::ErrorResponse, api::MessageResponse,
            api::health::HealthResponse,
            Role, UserContext,
            api::auth::UserProfileResponse,
            api::auth::UpdateUserRequest,
            api::auth::UpdateUserResponse,
            TenantConfig, Layout,
            api::tenants::CreateTenantRequest,
            api::tenants::CreateTenantResponse,
            api::tenants::UpdateTenantConfigRequest,
            api::tenants::UpdateFeaturesRequest,
            api::tenants::UpdateFeaturesResponse,
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "health", description = "Liveness endpoints"),
        (name = "auth", description = "Current user and user profile administration"),
        (name = "tenants", description = "Tenant configuration and feature flags")
    ),
    info(
        title = "Tenantry API",
        version = "0.1.0",
        description = "Multi-tenant configuration backend with role-based access control",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

/// Registers the "bearer" scheme referenced by authenticated paths.
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route() {
        let json: serde_json::Value = serde_json::from_str(&ApiDoc::to_json().unwrap()).unwrap();
        let paths = json["paths"].as_object().unwrap();

        for path in [
            "/ping",
            "/health",
            "/auth/me",
            "/auth/users/{uid}",
            "/tenant/create",
            "/tenant/{tenant}/config",
            "/tenant/{tenant}/features",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn test_features_response_is_flag_map() {
        let json: serde_json::Value = serde_json::from_str(&ApiDoc::to_json().unwrap()).unwrap();
        let schema = &json["paths"]["/tenant/{tenant}/features"]["get"]["responses"]["200"]
            ["content"]["application/json"]["schema"];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"]["type"], "boolean");
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let json: serde_json::Value = serde_json::from_str(&ApiDoc::to_json().unwrap()).unwrap();
        let scheme = &json["components"]["securitySchemes"]["bearer"];
        assert_eq!(scheme["type"], "http");
        assert_eq!(scheme["scheme"], "bearer");
    }
}
