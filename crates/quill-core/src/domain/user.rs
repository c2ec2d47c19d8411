use serde::{Deserialize, Serialize};

/// Admin user entity - an account allowed to manage posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub username: String,
    pub role: String,
    pub password_hash: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub modified_at: i64,
}

impl AdminUser {
    /// Create a new admin user with current timestamps.
    pub fn new(username: String, role: String, password_hash: String) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            username,
            role,
            password_hash,
            created_at: now,
            modified_at: now,
        }
    }
}
