use chrono::{DateTime, Utc};
use serde::Serialize;

/// Role names created by the lazy bootstrap on first registration.
pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_CUSTOMER: &str = "Customer";

/// Registered account. The username doubles as the email field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    /// bcrypt hash, never the plaintext.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: &str, name: &str, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: username.to_string(),
            name: name.to_string(),
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_new_user_gets_uuid_id() {
        let user = User::new("mario@example.com", "Mario", "hash".to_string());
        assert!(Uuid::parse_str(&user.id).is_ok());
    }

    #[test]
    fn test_email_mirrors_username() {
        let user = User::new("mario@example.com", "Mario", "hash".to_string());
        assert_eq!(user.email, user.username);
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User::new("mario@example.com", "Mario", "$2b$12$secret".to_string());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("mario@example.com"));
    }

    #[test]
    fn test_distinct_users_get_distinct_ids() {
        let a = User::new("a@example.com", "A", "hash".to_string());
        let b = User::new("a@example.com", "A", "hash".to_string());
        assert_ne!(a.id, b.id);
    }
}
