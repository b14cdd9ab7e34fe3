//! Session management endpoints
//!
//! Sign-up and sign-in issue a server-side session and hand the token
//! back twice: as an HttpOnly cookie for browsers, and in the response
//! body for clients that prefer a Bearer header.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use murmur_core::{Bio, EmailAddress, Password, UserName};

use crate::auth::{self, cookie};
use crate::db::repos::{SessionRepo, UserRepo};
use crate::http::error::ApiError;
use crate::http::extract::{CurrentUser, MaybeUser};
use crate::http::ok;
use crate::state::AppState;

use super::users::UserResponse;

/// Sign-up request
#[derive(Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
}

/// Sign-in request
#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Session response: the signed-in user plus session metadata
///
/// `token` is only present when a session is being issued; the session
/// probe does not repeat it.
#[derive(Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub expires_at: String,
}

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// POST /api/auth/sign-up - create an account and start a session
async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = UserName::new(&req.name)?;
    let email = EmailAddress::new(&req.email)?;
    let password = Password::new(&req.password)?;
    let bio = Bio::new(req.bio.as_deref())?;

    let password_hash = auth::hash_password(password.as_str())?;
    let user = UserRepo::new(&state.pool)
        .create(&name, &email, &password_hash, bio.as_ref())
        .await?;

    tracing::info!(user_id = %user.id, "account created");

    let token = auth::generate_session_token();
    let session = SessionRepo::new(&state.pool)
        .create(user.id, &token, state.config.session_ttl_hours)
        .await?;

    let set_cookie = cookie::session_cookie(
        &token,
        state.config.session_ttl_hours * 3600,
        state.config.cookie_secure,
    );

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, set_cookie)],
        ok(SessionResponse {
            user: UserResponse::from(user),
            token: Some(token),
            expires_at: session.expires_at.to_rfc3339(),
        }),
    ))
}

/// POST /api/auth/sign-in - verify credentials and start a session
///
/// Unknown email and wrong password produce the same 401 so the
/// endpoint can't be used to probe for accounts.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim().to_ascii_lowercase();

    let users = UserRepo::new(&state.pool);
    let Some(account) = users.get_auth_by_email(&email).await? else {
        return Err(ApiError::Unauthorized {
            message: INVALID_CREDENTIALS,
        });
    };

    if !auth::verify_password(&req.password, &account.password_hash)? {
        return Err(ApiError::Unauthorized {
            message: INVALID_CREDENTIALS,
        });
    }

    let sessions = SessionRepo::new(&state.pool);
    let purged = sessions.delete_expired().await?;
    if purged > 0 {
        tracing::debug!(purged, "purged expired sessions");
    }

    let token = auth::generate_session_token();
    let session = sessions
        .create(account.id, &token, state.config.session_ttl_hours)
        .await?;

    let user = users.get(account.id).await?;

    let set_cookie = cookie::session_cookie(
        &token,
        state.config.session_ttl_hours * 3600,
        state.config.cookie_secure,
    );

    Ok((
        [(header::SET_COOKIE, set_cookie)],
        ok(SessionResponse {
            user: UserResponse::from(user),
            token: Some(token),
            expires_at: session.expires_at.to_rfc3339(),
        }),
    ))
}

/// POST /api/auth/sign-out - end the current session
async fn sign_out(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    SessionRepo::new(&state.pool)
        .delete_by_token(&user.token)
        .await?;

    let clear = cookie::clear_session_cookie(state.config.cookie_secure);
    Ok(([(header::SET_COOKIE, clear)], ok(serde_json::Value::Null)))
}

/// GET /api/auth/session - who am I
///
/// Always 200; anonymous callers get `data: null` so clients can probe
/// without special error handling.
async fn get_session(user: MaybeUser) -> Result<impl IntoResponse, ApiError> {
    let data = user.0.map(|s| SessionResponse {
        user: UserResponse::from(&s),
        token: None,
        expires_at: s.expires_at.to_rfc3339(),
    });

    Ok(ok(data))
}

/// Session management routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/session", get(get_session))
}
