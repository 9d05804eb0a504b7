//! API request/response models for users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::users::UserDBResponse;
use crate::types::UserId;

/// The authenticated caller, produced by the credential extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
}

/// Outward projection of a user record.
///
/// Built from [`UserDBResponse`], which already carries no password hash, so
/// there is nothing sensitive to strip here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(user: UserDBResponse) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
