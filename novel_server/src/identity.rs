//! Request identity.
//!
//! Authentication happens upstream; the identity provider forwards the
//! user's ID in the `x-user-id` header. Requests without it are anonymous.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use novel_model::{Actor, UserId};

use crate::error::ApiError;
use crate::AppState;

pub const USER_HEADER: &str = "x-user-id";

/// The actor a request is made by.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_HEADER) else {
            return Ok(CurrentActor(Actor::Anonymous));
        };
        let id: UserId = value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .ok_or(ApiError::Unauthenticated("malformed x-user-id header"))?;

        let recorder = state.read().await;
        let user = recorder.user(id).map_err(|_| {
            tracing::warn!(user = %id, "request for unknown user");
            ApiError::Unauthenticated("unknown user")
        })?;
        Ok(CurrentActor(Actor::User(user.clone())))
    }
}
