//! User endpoint handlers.

use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::users::{CurrentUser, UserResponse},
    db::handlers::{Repository, Users},
    errors::Error,
};

/// Get the current user.
///
/// The extractor has already authenticated the request; this re-reads the
/// record through the facade so the response reflects the stored row.
#[tracing::instrument(skip_all, fields(user_id = %crate::types::abbrev_uuid(&current_user.id)))]
pub async fn me(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<UserResponse>, Error> {
    let mut conn = state.repositories.acquire().await?;
    let mut users = Users::new(&mut conn);

    let user = users.get_by_id(current_user.id).await?.ok_or_else(|| Error::NotFound {
        resource: "User".to_string(),
        id: current_user.id.to_string(),
    })?;

    Ok(Json(UserResponse::from(user)))
}
