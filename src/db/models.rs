use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Stored as JSONB; expected to be an array of strings but legacy rows
    /// may hold anything, so it stays a raw value until normalized.
    pub categories: Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: 1,
            email: "test@example.com".to_string(),
            username: "tester".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            categories: json!(["tech"]),
            created_at: Utc::now(),
        };

        let serialized = serde_json::to_string(&user).unwrap();
        assert!(!serialized.contains("password_hash"));
        assert!(!serialized.contains("argon2id"));
        assert!(serialized.contains("test@example.com"));
    }
}
