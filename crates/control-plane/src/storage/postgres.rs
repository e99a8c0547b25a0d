// PostgreSQL user directory
// Decision: Runtime-checked queries (no DATABASE_URL needed at compile time)
// Decision: Migrations are embedded and applied on connect

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tenantry_core::UserProfile;

use super::error::StoreError;
use super::users::UserDirectory;

#[derive(Debug, sqlx::FromRow)]
struct UserProfileRow {
    #[allow(dead_code)]
    subject_id: String,
    role: String,
    tenant: String,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        UserProfile::new(row.role, row.tenant)
    }
}

pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, run pending migrations and return the directory.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("user directory migrations applied");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn fetch(&self, subject_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let row: Option<UserProfileRow> = sqlx::query_as(
            r#"
            SELECT subject_id, role, tenant, updated_at
            FROM user_profiles
            WHERE subject_id = $1
            "#,
        )
        .bind(subject_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserProfile::from))
    }

    async fn upsert(
        &self,
        subject_id: &str,
        profile: UserProfile,
    ) -> Result<UserProfile, StoreError> {
        let row: UserProfileRow = sqlx::query_as(
            r#"
            INSERT INTO user_profiles (subject_id, role, tenant)
            VALUES ($1, $2, $3)
            ON CONFLICT (subject_id) DO UPDATE
            SET role = EXCLUDED.role,
                tenant = EXCLUDED.tenant,
                updated_at = NOW()
            RETURNING subject_id, role, tenant, updated_at
            "#,
        )
        .bind(subject_id)
        .bind(&profile.role)
        .bind(&profile.tenant)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
