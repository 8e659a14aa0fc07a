//! Staff identity as reported by the backend.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::StaffUserId;

/// Role of a staff account.
///
/// The backend owns the role list; values the till does not know about are
/// kept verbatim instead of failing the whole identity check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StaffRole {
    Admin,
    Manager,
    Staff,
    Other(String),
}

impl StaffRole {
    /// Wire value of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
            Self::Other(role) => role,
        }
    }
}

impl From<String> for StaffRole {
    fn from(role: String) -> Self {
        match role.as_str() {
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            "staff" => Self::Staff,
            _ => Self::Other(role),
        }
    }
}

impl From<StaffRole> for String {
    fn from(role: StaffRole) -> Self {
        match role {
            StaffRole::Other(role) => role,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in staff member, as returned by `GET /api/auth/me`.
///
/// This is a projection of backend data: the till never persists or edits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUser {
    pub id: StaffUserId,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub role: StaffRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_user_from_me_payload() {
        let json = r#"{
            "id": "u_1",
            "email": "sam@kebab.shop",
            "name": "Sam",
            "role": "manager",
            "isActive": true,
            "createdAt": "2025-01-01T00:00:00.000Z"
        }"#;
        let user: StaffUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, StaffRole::Manager);
        assert_eq!(user.is_active, Some(true));
    }

    #[test]
    fn test_unknown_role_preserved() {
        let role: StaffRole = serde_json::from_str("\"kitchen\"").unwrap();
        assert_eq!(role, StaffRole::Other("kitchen".to_string()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"kitchen\"");
    }
}
