// User directory service
// Decision: Only known roles may be written, so the gate never has to refuse
//           a profile this service created

use std::sync::Arc;
use tenantry_core::{Role, UserProfile};

use super::error::{ServiceError, ServiceResult};
use crate::storage::UserDirectory;

pub struct UserService {
    directory: Arc<dyn UserDirectory>,
}

impl UserService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    pub fn backend_name(&self) -> &'static str {
        self.directory.backend_name()
    }

    /// Raw directory record for a subject, if any.
    pub async fn fetch_user_metadata(&self, subject_id: &str) -> ServiceResult<Option<UserProfile>> {
        if subject_id.is_empty() {
            return Err(ServiceError::InvalidInput("uid must not be empty.".to_string()));
        }
        Ok(self.directory.fetch(subject_id).await?)
    }

    /// Create or overwrite a subject's role and tenant.
    pub async fn update_user_metadata(
        &self,
        subject_id: &str,
        role: &str,
        tenant: &str,
    ) -> ServiceResult<UserProfile> {
        if subject_id.is_empty() {
            return Err(ServiceError::InvalidInput("uid must not be empty.".to_string()));
        }
        if tenant.is_empty() {
            return Err(ServiceError::InvalidInput("tenant must not be empty.".to_string()));
        }
        let role: Role = role.parse().map_err(|_| {
            ServiceError::InvalidInput(format!(
                "role must be one of Admin, HR, Employee (got {role:?})."
            ))
        })?;

        let profile = self
            .directory
            .upsert(subject_id, UserProfile::new(role.as_str(), tenant))
            .await?;

        tracing::info!(
            auth.subject = %subject_id,
            auth.role = %role,
            tenant.key = %tenant,
            "user profile updated"
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryUserDirectory, StoreError};
    use async_trait::async_trait;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserDirectory::new()))
    }

    #[tokio::test]
    async fn test_update_then_fetch() {
        let service = service();
        let saved = service
            .update_user_metadata("u-1", "HR", "acme")
            .await
            .unwrap();
        assert_eq!(saved, UserProfile::new("HR", "acme"));

        let fetched = service.fetch_user_metadata("u-1").await.unwrap();
        assert_eq!(fetched, Some(saved));
        assert_eq!(service.fetch_user_metadata("u-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_validates_input() {
        let service = service();
        for (uid, role, tenant) in [
            ("", "HR", "acme"),
            ("u-1", "", "acme"),
            ("u-1", "hr", "acme"),
            ("u-1", "Owner", "acme"),
            ("u-1", "HR", ""),
        ] {
            let result = service.update_user_metadata(uid, role, tenant).await;
            assert!(
                matches!(result, Err(ServiceError::InvalidInput(_))),
                "{uid:?} {role:?} {tenant:?}"
            );
        }
    }

    struct DownDirectory;

    #[async_trait]
    impl UserDirectory for DownDirectory {
        async fn fetch(&self, _subject_id: &str) -> Result<Option<UserProfile>, StoreError> {
            Err(StoreError::Unavailable("timeout".to_string()))
        }

        async fn upsert(
            &self,
            _subject_id: &str,
            _profile: UserProfile,
        ) -> Result<UserProfile, StoreError> {
            Err(StoreError::Unavailable("timeout".to_string()))
        }

        fn backend_name(&self) -> &'static str {
            "down"
        }
    }

    #[tokio::test]
    async fn test_backend_failure_is_store_error() {
        let service = UserService::new(Arc::new(DownDirectory));
        assert!(matches!(
            service.fetch_user_metadata("u-1").await,
            Err(ServiceError::Store(StoreError::Unavailable(_)))
        ));
        assert!(matches!(
            service.update_user_metadata("u-1", "Admin", "acme").await,
            Err(ServiceError::Store(_))
        ));
    }
}
