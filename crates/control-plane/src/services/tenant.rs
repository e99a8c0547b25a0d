// Tenant service
// Decision: Tenant keys are validated here, once, before they reach storage
// Decision: Each operation runs in a span carrying tenant.key

use std::sync::Arc;
use tenantry_core::{FeatureFlags, NewTenant, TenantConfig, TenantPatch};
use tracing::Instrument;

use super::error::{ServiceError, ServiceResult};
use crate::storage::TenantStore;

pub struct TenantService {
    store: Arc<TenantStore>,
}

/// Reject keys that could not round-trip through a URL path segment.
pub fn validate_tenant_key(key: &str) -> ServiceResult<()> {
    if key.is_empty() {
        return Err(ServiceError::InvalidInput(
            "Tenant name must not be empty.".to_string(),
        ));
    }
    if key.trim() != key {
        return Err(ServiceError::InvalidInput(
            "Tenant name must not start or end with whitespace.".to_string(),
        ));
    }
    if key.contains('/') {
        return Err(ServiceError::InvalidInput(
            "Tenant name must not contain '/'.".to_string(),
        ));
    }
    Ok(())
}

impl TenantService {
    pub fn new(store: Arc<TenantStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn create(&self, key: &str, input: NewTenant) -> ServiceResult<TenantConfig> {
        let span = tracing::info_span!("tenant.create", tenant.key = %key);
        async {
            validate_tenant_key(key)?;
            let config = self.store.create(key, input).await?;
            tracing::info!(tenant.key = %key, "tenant created");
            Ok::<_, ServiceError>(config)
        }
        .instrument(span)
        .await
    }

    pub async fn get_config(&self, key: &str) -> ServiceResult<TenantConfig> {
        self.store
            .get_config(key)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Tenant '{key}'")))
    }

    pub async fn update_config(&self, key: &str, patch: TenantPatch) -> ServiceResult<TenantConfig> {
        let span = tracing::info_span!("tenant.update_config", tenant.key = %key);
        async {
            let config = self.store.update_config(key, patch).await?;
            tracing::info!(tenant.key = %key, "tenant config updated");
            Ok::<_, ServiceError>(config)
        }
        .instrument(span)
        .await
    }

    pub async fn get_features(&self, key: &str) -> ServiceResult<FeatureFlags> {
        self.store
            .get_features(key)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Tenant '{key}'")))
    }

    pub async fn update_features(
        &self,
        key: &str,
        delta: FeatureFlags,
    ) -> ServiceResult<FeatureFlags> {
        let span = tracing::info_span!("tenant.update_features", tenant.key = %key);
        async {
            let changed = delta.len();
            let features = self.store.update_features(key, delta).await?;
            tracing::info!(tenant.key = %key, changed, "tenant features updated");
            Ok::<_, ServiceError>(features)
        }
        .instrument(span)
        .await
    }
}
