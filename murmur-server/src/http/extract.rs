//! Session extractors
//!
//! `CurrentUser` rejects with 401 when no valid session backs the
//! request; `MaybeUser` resolves to `None` instead, for endpoints that
//! serve both signed-in and anonymous callers.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::cookie;
use crate::db::repos::{SessionRepo, SessionUser};
use crate::state::AppState;

use super::error::ApiError;

/// The authenticated caller, resolved from the session cookie or a
/// Bearer token
pub struct CurrentUser {
    pub session: SessionUser,
    /// Raw token the session was resolved from; sign-out deletes it.
    pub token: String,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie::session_token(&parts.headers).ok_or(ApiError::Unauthorized {
            message: "authentication required",
        })?;

        let session = SessionRepo::new(&state.pool)
            .find_user_by_token(&token)
            .await?
            .ok_or(ApiError::Unauthorized {
                message: "invalid or expired session",
            })?;

        Ok(Self { session, token })
    }
}

/// Like [`CurrentUser`], but an absent or invalid session is `None`
pub struct MaybeUser(pub Option<SessionUser>);

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = cookie::session_token(&parts.headers) else {
            return Ok(Self(None));
        };

        let session = SessionRepo::new(&state.pool)
            .find_user_by_token(&token)
            .await?;

        Ok(Self(session))
    }
}
