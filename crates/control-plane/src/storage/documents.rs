// Tenant document backends
// Decision: The whole tenant set is one document, loaded and saved as a unit
// Decision: A missing document is an empty store, an unreadable one is Corrupted
// Decision: File writes go to a sibling temp file and are renamed into place,
//           so a crash mid-write never leaves a truncated document behind

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tenantry_core::TenantConfig;

use super::error::StoreError;

/// Tenant key -> configuration, as persisted.
pub type TenantDocument = BTreeMap<String, TenantConfig>;

#[async_trait]
pub trait TenantDocumentBackend: Send + Sync {
    async fn load(&self) -> Result<TenantDocument, StoreError>;

    async fn save(&self, document: &TenantDocument) -> Result<(), StoreError>;

    fn backend_name(&self) -> &'static str;
}

// ============================================================================
// JSON file
// ============================================================================

/// Pretty-printed JSON document on the local filesystem.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tenants.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TenantDocumentBackend for JsonFileBackend {
    async fn load(&self) -> Result<TenantDocument, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TenantDocument::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "tenant document unreadable");
            StoreError::Corrupted(format!("{}: {e}", self.path.display()))
        })
    }

    async fn save(&self, document: &TenantDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| StoreError::Unavailable(format!("serialize tenants: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "json-file"
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Default)]
pub struct InMemoryDocumentBackend {
    document: RwLock<TenantDocument>,
}

impl InMemoryDocumentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: TenantDocument) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }
}

#[async_trait]
impl TenantDocumentBackend for InMemoryDocumentBackend {
    async fn load(&self) -> Result<TenantDocument, StoreError> {
        Ok(self.document.read().clone())
    }

    async fn save(&self, document: &TenantDocument) -> Result<(), StoreError> {
        *self.document.write() = document.clone();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenantry_core::{NewTenant, TenantDefaults};

    fn sample_document() -> TenantDocument {
        let mut document = TenantDocument::new();
        document.insert(
            "acme".to_string(),
            TenantDefaults::default().resolve(NewTenant::default()),
        );
        document
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("tenants.json"));

        let document = backend.load().await.unwrap();
        assert!(document.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested").join("tenants.json"));

        backend.save(&sample_document()).await.unwrap();
        let loaded = backend.load().await.unwrap();

        assert_eq!(loaded, sample_document());
        assert!(!backend.temp_path().exists());
    }

    #[tokio::test]
    async fn test_saved_file_is_camel_case_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenants.json");
        let backend = JsonFileBackend::new(&path);

        backend.save(&sample_document()).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["acme"]["brandName"], "Mint Tenants");
        assert!(raw.contains('\n'));
    }

    #[tokio::test]
    async fn test_unparseable_file_is_corrupted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tenants.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonFileBackend::new(&path).load().await;
        assert!(matches!(result, Err(StoreError::Corrupted(_))));
    }

    #[tokio::test]
    async fn test_unreadable_path_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let result = JsonFileBackend::new(dir.path()).load().await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_in_memory_backend() {
        let backend = InMemoryDocumentBackend::new();
        assert!(backend.load().await.unwrap().is_empty());

        backend.save(&sample_document()).await.unwrap();
        assert_eq!(backend.load().await.unwrap(), sample_document());
    }
}
