// Tenant store
// Decision: Mutations hold an async write lock across load-mutate-save so two
//           concurrent writers in this process never lose each other's update
// Decision: Reads do not take the lock; they see the last saved document
// Decision: A failed mutation closure aborts before save, leaving the store as-is

use std::sync::Arc;
use tenantry_core::{FeatureFlags, NewTenant, TenantConfig, TenantDefaults, TenantPatch};
use tokio::sync::Mutex;

use super::documents::{TenantDocument, TenantDocumentBackend};
use super::error::StoreError;

pub struct TenantStore {
    backend: Arc<dyn TenantDocumentBackend>,
    defaults: TenantDefaults,
    write_lock: Mutex<()>,
}

impl TenantStore {
    pub fn new(backend: Arc<dyn TenantDocumentBackend>, defaults: TenantDefaults) -> Self {
        Self {
            backend,
            defaults,
            write_lock: Mutex::new(()),
        }
    }

    pub fn defaults(&self) -> &TenantDefaults {
        &self.defaults
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut TenantDocument) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.backend.load().await?;
        let out = f(&mut document)?;
        self.backend.save(&document).await?;
        Ok(out)
    }

    /// Create a tenant, filling unset fields from the defaults.
    pub async fn create(&self, key: &str, input: NewTenant) -> Result<TenantConfig, StoreError> {
        let config = self.defaults.resolve(input);
        self.mutate(|document| {
            if document.contains_key(key) {
                return Err(StoreError::AlreadyExists(key.to_string()));
            }
            document.insert(key.to_string(), config.clone());
            Ok(config)
        })
        .await
    }

    pub async fn get_config(&self, key: &str) -> Result<Option<TenantConfig>, StoreError> {
        let mut document = self.backend.load().await?;
        Ok(document.remove(key))
    }

    /// Shallow update. A supplied `features` map replaces the stored one.
    pub async fn update_config(
        &self,
        key: &str,
        patch: TenantPatch,
    ) -> Result<TenantConfig, StoreError> {
        self.mutate(|document| {
            let config = document
                .get_mut(key)
                .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
            config.apply_patch(patch);
            Ok(config.clone())
        })
        .await
    }

    pub async fn get_features(&self, key: &str) -> Result<Option<FeatureFlags>, StoreError> {
        Ok(self.get_config(key).await?.map(|config| config.features))
    }

    /// Key-by-key merge. Returns the full resulting map.
    pub async fn update_features(
        &self,
        key: &str,
        delta: FeatureFlags,
    ) -> Result<FeatureFlags, StoreError> {
        self.mutate(|document| {
            let config = document
                .get_mut(key)
                .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
            Ok(config.merge_features(delta).clone())
        })
        .await
    }
}
