//! User roles and their permission levels.

use serde::{Deserialize, Serialize};

/// Account role with different permission levels.
///
/// The API spells roles in camelCase (`"customer"`, `"admin"`,
/// `"superAdmin"`); serde renames keep the wire form out of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Regular shopper. Can browse, order, and review.
    #[default]
    Customer,
    /// Store staff. Can manage the catalog, orders, and customers.
    Admin,
    /// Full access including admin account management.
    SuperAdmin,
}

impl Role {
    /// Whether this role grants access to the admin surface.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// Whether this role may create or modify other admin accounts.
    #[must_use]
    pub const fn can_manage_admins(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
            Self::SuperAdmin => write!(f, "superAdmin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            "superAdmin" => Ok(Self::SuperAdmin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_spelling() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"superAdmin\""
        );
        let parsed: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(parsed, Role::Customer);
    }

    #[test]
    fn test_permissions() {
        assert!(!Role::Customer.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(Role::SuperAdmin.is_admin());
        assert!(!Role::Admin.can_manage_admins());
        assert!(Role::SuperAdmin.can_manage_admins());
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        for role in [Role::Customer, Role::Admin, Role::SuperAdmin] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }
}
