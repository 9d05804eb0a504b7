//! Database repository for users.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::password;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::users::{UserCreateDBRequest, UserDBResponse},
};
use crate::types::{UserId, abbrev_uuid};

/// Why a credential check failed.
///
/// `UserNotFound` and `InvalidPassword` stay distinct here; collapsing them
/// into one opaque message is the API layer's job (see [`crate::errors`]).
#[derive(Error, Debug)]
pub enum AuthError {
    /// Empty email or password, rejected before any storage access
    #[error("email and password must not be empty")]
    InvalidInput,

    /// No user with the given email
    #[error("user not found")]
    UserNotFound,

    /// The password did not match the stored hash
    #[error("invalid password")]
    InvalidPassword,

    /// Hash parsing or the verification task itself failed
    #[error("verifying password")]
    Verification(#[source] anyhow::Error),

    /// Underlying storage failure during lookup
    #[error(transparent)]
    Database(#[from] DbError),
}

// Database entity model. Holds the password hash and therefore never leaves
// this module; outward results are projected into UserDBResponse.
#[derive(Debug, Clone, FromRow)]
struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDBResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;

    #[instrument(skip(self, request), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        // Always generate a new ID for users
        let user_id = Uuid::new_v4();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&request.email)
        .bind(&request.password_hash)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(UserDBResponse::from(user))
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user.map(UserDBResponse::from))
    }
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, email), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<UserDBResponse>> {
        let user = self.fetch_by_email(email).await?;
        Ok(user.map(UserDBResponse::from))
    }

    /// Verify a user's credentials and return the user if successful.
    ///
    /// The returned record carries no password hash; the hash is compared in
    /// here and goes no further.
    #[instrument(skip(self, email, password), err)]
    pub async fn authenticate(&mut self, email: &str, password: &str) -> std::result::Result<UserDBResponse, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput);
        }

        let user = self
            .fetch_by_email(email)
            .await
            .map_err(AuthError::Database)?
            .ok_or(AuthError::UserNotFound)?;

        // Argon2 verification is CPU-bound; keep it off the async runtime.
        let hash = user.password_hash.clone();
        let password = password.to_string();
        let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
            .await
            .map_err(|e| AuthError::Verification(anyhow::anyhow!("join password verification task: {e}")))?
            .map_err(|e| AuthError::Verification(anyhow::Error::new(e)))?;

        if !is_valid {
            return Err(AuthError::InvalidPassword);
        }

        Ok(UserDBResponse::from(user))
    }

    async fn fetch_by_email(&mut self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    async fn create_user(pool: &PgPool, email: &str, password: &str) -> UserDBResponse {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);
        let request = UserCreateDBRequest {
            email: email.to_string(),
            password_hash: password::hash_string(password).unwrap(),
        };
        repo.create(&request).await.unwrap()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_round_trip(pool: PgPool) {
        let created = create_user(&pool, "round@example.com", "pw").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let by_email = repo.get_by_email("round@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "round@example.com");
        assert_eq!(by_id.id, by_email.id);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_by_id_missing_is_none(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);
        let found = repo.get_by_id(Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_email_is_unique_violation(pool: PgPool) {
        create_user(&pool, "dup@example.com", "pw").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);
        let request = UserCreateDBRequest {
            email: "dup@example.com".to_string(),
            password_hash: password::hash_string("other").unwrap(),
        };
        let err = repo.create(&request).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }), "got {err:?}");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_authenticate_rejects_empty_input(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let err = repo.authenticate("", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput));

        let err = repo.authenticate("user@example.com", "").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_authenticate_unknown_email(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let err = repo.authenticate("missing@example.com", "anything").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_authenticate_wrong_password(pool: PgPool) {
        create_user(&pool, "auth@example.com", "correct horse").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);
        let err = repo.authenticate("auth@example.com", "battery staple").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidPassword));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_authenticate_success(pool: PgPool) {
        let created = create_user(&pool, "auth@example.com", "correct horse").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);
        let user = repo.authenticate("auth@example.com", "correct horse").await.unwrap();
        assert_eq!(user.id, created.id);
        assert_eq!(user.email, "auth@example.com");
    }
}
