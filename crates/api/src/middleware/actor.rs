//! Acting-user extractor.
//!
//! Authentication happens at the upstream gateway, which forwards the
//! authenticated user's id in the `X-User-Id` header. This extractor turns
//! that id into an [`Actor`] for the lifecycle layer.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tmc_core::actor::Actor;
use tmc_core::error::CoreError;
use tmc_core::types::DbId;
use tmc_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The active user behind the request.
///
/// ```ignore
/// async fn handler(CurrentActor(actor): CurrentActor) -> AppResult<Json<()>> {
///     tracing::info!(actor = %actor, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing X-User-Id header".into()))
            })?;

        let user_id: DbId = raw
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid X-User-Id header: '{raw}'")))?;

        let user = UserRepo::find_active_by_id(&state.pool, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Unknown or inactive user {user_id}"
                )))
            })?;

        Ok(CurrentActor(user.to_actor()))
    }
}
