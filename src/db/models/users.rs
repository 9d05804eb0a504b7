//! Database models for users.

use crate::types::UserId;
use chrono::{DateTime, Utc};

/// Database request for creating a new user.
///
/// Callers hash the password before constructing this; the repository never
/// sees a plaintext password on the write path.
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub email: String,
    pub password_hash: String,
}

/// Database response for a user.
///
/// Deliberately has no password hash field: the hash is read inside the
/// repository for verification and goes no further.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDBResponse {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
