// User directory: subject id -> {role, tenant}
// Decision: Trait object so the auth gate and services don't care which
//           backend is active (PostgreSQL in production, memory in dev/tests)
// Decision: Upsert writes both fields; there is no partial profile update

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tenantry_core::UserProfile;

use super::error::StoreError;

/// Keyed lookup and upsert of user profiles.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch the profile for a subject. `Ok(None)` means no record exists.
    async fn fetch(&self, subject_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Create or overwrite the profile for a subject.
    async fn upsert(
        &self,
        subject_id: &str,
        profile: UserProfile,
    ) -> Result<UserProfile, StoreError>;

    /// Short backend label for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}

/// In-memory directory for development and tests.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from a JSON object of `{"<uid>": {"role", "tenant"}}`.
    pub fn from_seed_json(json: &str) -> Result<Self, StoreError> {
        let profiles: HashMap<String, UserProfile> = serde_json::from_str(json)
            .map_err(|e| StoreError::Corrupted(format!("user seed: {e}")))?;
        Ok(Self {
            profiles: RwLock::new(profiles),
        })
    }

    pub fn with_profile(self, subject_id: impl Into<String>, profile: UserProfile) -> Self {
        self.profiles.write().insert(subject_id.into(), profile);
        self
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn fetch(&self, subject_id: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.read().get(subject_id).cloned())
    }

    async fn upsert(
        &self,
        subject_id: &str,
        profile: UserProfile,
    ) -> Result<UserProfile, StoreError> {
        self.profiles
            .write()
            .insert(subject_id.to_string(), profile.clone());
        Ok(profile)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
