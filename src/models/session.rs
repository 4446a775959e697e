//! Session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin login record held by the session registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    /// Opaque token sent back in the `Authorization` header
    pub token: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn new(token: String, username: String) -> Self {
        Self {
            token,
            username,
            issued_at: Utc::now(),
        }
    }
}
