//! Request authentication.
//!
//! [`CurrentUser`] is an axum extractor that authenticates the request via
//! HTTP Basic credentials (`Authorization: Basic base64(email:password)`)
//! against the user repository. There is no token or session issuance; every
//! request carries its credentials.

use axum::{extract::FromRequestParts, http::request::Parts};
use base64::{Engine as _, engine::general_purpose};
use tracing::debug;

use crate::{
    AppState,
    api::models::users::CurrentUser,
    db::handlers::{AuthError, Users},
    errors::Error,
};

/// Pull `email:password` out of a Basic Authorization header, if present.
fn basic_credentials(parts: &Parts) -> Option<Result<(String, String), Error>> {
    let header = parts.headers.get(axum::http::header::AUTHORIZATION)?;

    let value = match header.to_str() {
        Ok(v) => v,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid authorization header: {e}"),
            }));
        }
    };

    let encoded = value.strip_prefix("Basic ")?;
    let decoded = match general_purpose::STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(_) => {
            return Some(Err(Error::BadRequest {
                message: "Invalid base64 in authorization header".to_string(),
            }));
        }
    };
    let decoded = match String::from_utf8(decoded) {
        Ok(s) => s,
        Err(_) => {
            return Some(Err(Error::BadRequest {
                message: "Authorization credentials are not valid UTF-8".to_string(),
            }));
        }
    };

    match decoded.split_once(':') {
        Some((email, password)) => Some(Ok((email.to_string(), password.to_string()))),
        None => Some(Err(Error::BadRequest {
            message: "Authorization credentials must be email:password".to_string(),
        })),
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let (email, password) = basic_credentials(parts).ok_or_else(|| Error::Unauthenticated {
            message: Some("Missing credentials".to_string()),
        })??;

        let mut conn = state.repositories.acquire().await?;
        let mut users = Users::new(&mut conn);

        match users.authenticate(&email, &password).await {
            Ok(user) => Ok(CurrentUser {
                id: user.id,
                email: user.email,
            }),
            // Which of the two happened stays in the debug log; the response
            // carries one opaque message for both.
            Err(AuthError::UserNotFound | AuthError::InvalidPassword) => {
                debug!("authentication rejected for submitted credentials");
                Err(Error::Unauthenticated {
                    message: Some("Invalid email or password".to_string()),
                })
            }
            Err(AuthError::InvalidInput) => Err(Error::BadRequest {
                message: "Email and password must not be empty".to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}
