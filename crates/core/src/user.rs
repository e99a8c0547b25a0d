// User domain types
//
// UserProfile is the raw record held by the user directory.
// UserContext is what the auth gate hands to handlers after a request has been
// authenticated and the profile has been validated.

use serde::{Deserialize, Serialize};

use crate::role::{Role, UnknownRole};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Role and tenant assignment stored for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserProfile {
    /// Raw role string, e.g. "Admin", "HR", "Employee".
    #[serde(default)]
    pub role: String,
    /// Tenant key the user belongs to.
    #[serde(default)]
    pub tenant: String,
}

/// Why a stored profile cannot be used for authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileDefect {
    MissingRole,
    MissingTenant,
    UnknownRole(UnknownRole),
}

impl ProfileDefect {
    pub fn reason(&self) -> &'static str {
        match self {
            ProfileDefect::MissingRole => "role not set",
            ProfileDefect::MissingTenant => "tenant not set",
            ProfileDefect::UnknownRole(_) => "role not recognized",
        }
    }
}

impl UserProfile {
    pub fn new(role: impl Into<String>, tenant: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            tenant: tenant.into(),
        }
    }

    /// Validate the record and parse its role.
    pub fn authorize_fields(&self) -> Result<(Role, &str), ProfileDefect> {
        if self.role.is_empty() {
            return Err(ProfileDefect::MissingRole);
        }
        if self.tenant.is_empty() {
            return Err(ProfileDefect::MissingTenant);
        }
        let role = self
            .role
            .parse::<Role>()
            .map_err(ProfileDefect::UnknownRole)?;
        Ok((role, self.tenant.as_str()))
    }
}

/// Authenticated and provisioned caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UserContext {
    /// Stable subject identifier from the identity provider.
    #[serde(rename = "uid")]
    pub subject_id: String,
    /// Email claim, if the identity provider supplied one.
    pub email: Option<String>,
    /// Role resolved from the user directory.
    pub role: Role,
    /// Tenant resolved from the user directory.
    #[serde(rename = "tenant")]
    pub tenant_key: String,
}
