//! User profile endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::db::repos::{SessionUser, UserRecord, UserRepo};
use crate::http::error::ApiError;
use crate::http::{ok, Envelope};
use crate::state::AppState;

/// Public user projection
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            image: u.image,
            bio: u.bio,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        }
    }
}

impl From<&SessionUser> for UserResponse {
    fn from(s: &SessionUser) -> Self {
        Self {
            id: s.user_id,
            name: s.name.clone(),
            email: s.email.clone(),
            image: s.image.clone(),
            bio: s.bio.clone(),
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

/// GET /users/{id} - view a profile
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<UserResponse>>, ApiError> {
    let user = UserRepo::new(&state.pool).get(id).await?;
    Ok(ok(UserResponse::from(user)))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users/{id}", get(get_user))
}
