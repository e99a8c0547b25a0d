// Role domain type
//
// Roles are stored in the user directory as raw strings. They are parsed into
// a closed enum at the boundary so every authorization check compares typed
// values. Unknown strings do not parse; callers treat that as "not provisioned".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Authorization level assigned to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum Role {
    /// Full administrative access, including user management.
    Admin,
    /// Human resources. May manage tenant branding and features.
    #[serde(rename = "HR")]
    Hr,
    /// Regular member of a tenant. Read-only access.
    Employee,
}

impl Role {
    /// Roles allowed to create tenants and change tenant config or features.
    pub const TENANT_MANAGERS: &'static [Role] = &[Role::Admin, Role::Hr];

    /// Roles allowed to read and change user directory records.
    pub const USER_ADMINS: &'static [Role] = &[Role::Admin];

    /// Raw directory spelling of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Hr => "HR",
            Role::Employee => "Employee",
        }
    }

    /// Case-sensitive membership check against an allowed set.
    pub fn is_one_of(&self, allowed: &[Role]) -> bool {
        allowed.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a directory string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "HR" => Ok(Role::Hr),
            "Employee" => Ok(Role::Employee),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Render an allowed set for log fields, e.g. `Admin,HR`.
pub fn format_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_exact() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("HR".parse::<Role>(), Ok(Role::Hr));
        assert_eq!("Employee".parse::<Role>(), Ok(Role::Employee));

        assert!("admin".parse::<Role>().is_err());
        assert!("hr".parse::<Role>().is_err());
        assert!("Hr".parse::<Role>().is_err());
        assert!(" Admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
        assert!("Owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_display_round_trips() {
        for role in [Role::Admin, Role::Hr, Role::Employee] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_role_serde_uses_directory_spelling() {
        assert_eq!(serde_json::to_string(&Role::Hr).unwrap(), "\"HR\"");
        let role: Role = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"Hr\"").is_err());
    }

    #[test]
    fn test_is_one_of() {
        assert!(Role::Admin.is_one_of(Role::TENANT_MANAGERS));
        assert!(Role::Hr.is_one_of(Role::TENANT_MANAGERS));
        assert!(!Role::Employee.is_one_of(Role::TENANT_MANAGERS));
        assert!(!Role::Hr.is_one_of(Role::USER_ADMINS));
        assert!(!Role::Admin.is_one_of(&[]));
    }

    #[test]
    fn test_format_roles() {
        assert_eq!(format_roles(Role::TENANT_MANAGERS), "Admin,HR");
        assert_eq!(format_roles(&[]), "");
    }
}
