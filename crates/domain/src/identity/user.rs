//! User domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access level granted to a user by the backend.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    #[default]
    Viewer,
}

/// Represents an authenticated user as returned by the backend.
///
/// Immutable from the client's perspective; replaced wholesale on every
/// successful authentication response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_wire_format_is_camel_case() {
        let user = User {
            id: "1".into(),
            email: "a@b.com".into(),
            username: "a".into(),
            full_name: Some("A B".into()),
            role: Role::Viewer,
            is_active: true,
            is_verified: false,
            ..Default::default()
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["fullName"], "A B");
        assert_eq!(value["isActive"], true);
        assert_eq!(value["isVerified"], false);
        assert_eq!(value["role"], "viewer");
        assert!(value.get("full_name").is_none());
    }

    #[test]
    fn test_user_deserializes_without_full_name() {
        let user: User = serde_json::from_str(
            r#"{
                "id": "1",
                "email": "a@b.com",
                "username": "a",
                "role": "admin",
                "isActive": true,
                "isVerified": true,
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(user.role, Role::Admin);
        assert!(user.full_name.is_none());
    }
}
