use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

use crate::db::errors::DbError;
use crate::db::handlers::AuthError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided or not valid
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Credential verification error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::Commit { .. } | DbError::RollbackFailed { .. } | DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Auth(auth_err) => match auth_err {
                AuthError::InvalidInput => StatusCode::BAD_REQUEST,
                // The two rejection reasons map to the same status so a
                // caller cannot probe which emails exist.
                AuthError::UserNotFound | AuthError::InvalidPassword => StatusCode::UNAUTHORIZED,
                AuthError::Verification(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => {
                format!("{resource} with ID {id} not found")
            }
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { constraint, table, .. } => match (table.as_deref(), constraint.as_deref()) {
                    (Some("users"), Some(c)) if c.contains("email") => "An account with this email address already exists".to_string(),
                    _ => "Resource already exists".to_string(),
                },
                DbError::Commit { .. } | DbError::RollbackFailed { .. } | DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Auth(auth_err) => match auth_err {
                AuthError::InvalidInput => "Email and password must not be empty".to_string(),
                AuthError::UserNotFound | AuthError::InvalidPassword => "Invalid email or password".to_string(),
                AuthError::Verification(_) | AuthError::Database(_) => "Internal server error".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_))
            | Error::Database(DbError::Commit { .. })
            | Error::Database(DbError::RollbackFailed { .. })
            | Error::Auth(AuthError::Verification(_))
            | Error::Auth(AuthError::Database(_))
            | Error::Internal { .. }
            | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::Auth(_) => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        (self.status_code(), self.user_message()).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_rejections_are_indistinguishable_outward() {
        let not_found = Error::Auth(AuthError::UserNotFound);
        let bad_password = Error::Auth(AuthError::InvalidPassword);

        assert_eq!(not_found.status_code(), bad_password.status_code());
        assert_eq!(not_found.user_message(), bad_password.user_message());
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = Error::Database(DbError::UniqueViolation {
            constraint: Some("users_email_key".to_string()),
            table: Some("users".to_string()),
            message: "duplicate key".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.user_message(), "An account with this email address already exists");
    }
}
