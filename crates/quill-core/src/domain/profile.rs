use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Extra details kept for an externally authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub org: String,
    pub telephone: String,
    pub updated_time: DateTime<Utc>,
}

impl UserProfile {
    /// Empty profile created on signup.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            org: String::new(),
            telephone: String::new(),
            updated_time: Utc::now(),
        }
    }
}
