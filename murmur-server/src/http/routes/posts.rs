//! Post endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use murmur_core::{PageParams, Paginated, Pagination, PostContent};

use crate::db::repos::{PostRepo, PostWithAuthor, UserRepo};
use crate::http::error::ApiError;
use crate::http::extract::CurrentUser;
use crate::http::{ok, Envelope};
use crate::state::AppState;

/// Create post request
#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
}

/// Update post request
#[derive(Deserialize)]
pub struct UpdatePostRequest {
    pub content: String,
}

/// Author columns embedded in a post response
#[derive(Serialize)]
pub struct PostAuthorResponse {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
}

/// Post response
#[derive(Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub content: String,
    pub created_at: String,
    pub author: PostAuthorResponse,
}

impl From<PostWithAuthor> for PostResponse {
    fn from(p: PostWithAuthor) -> Self {
        Self {
            id: p.id,
            content: p.content,
            created_at: p.created_at.to_rfc3339(),
            author: PostAuthorResponse {
                id: p.author.id,
                name: p.author.name,
                image: p.author.image,
            },
        }
    }
}

/// GET /posts - the public feed, newest first
async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Envelope<Paginated<PostResponse>>>, ApiError> {
    let page = Pagination::from(params);
    let result = PostRepo::new(&state.pool).list(page).await?;

    Ok(ok(result.map(PostResponse::from)))
}

/// POST /posts - publish a post
async fn create_post(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Envelope<PostResponse>>), ApiError> {
    let content = PostContent::new(&req.content)?;

    let post = PostRepo::new(&state.pool)
        .create(user.session.user_id, &content)
        .await?;

    Ok((StatusCode::CREATED, ok(PostResponse::from(post))))
}

/// GET /posts/{id} - a single post
async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<PostResponse>>, ApiError> {
    let post = PostRepo::new(&state.pool).get(id).await?;
    Ok(ok(PostResponse::from(post)))
}

/// GET /posts/user/{id} - one author's posts
///
/// A known author with nothing published gets an empty page, not 404.
async fn list_user_posts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<Envelope<Paginated<PostResponse>>>, ApiError> {
    if !UserRepo::new(&state.pool).exists(user_id).await? {
        return Err(ApiError::NotFound {
            resource: "user",
            id: user_id.to_string(),
        });
    }

    let page = Pagination::from(params);
    let result = PostRepo::new(&state.pool)
        .list_for_author(user_id, page)
        .await?;

    Ok(ok(result.map(PostResponse::from)))
}

/// PUT /posts/{id} - edit your own post
async fn update_post(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<Envelope<PostResponse>>, ApiError> {
    let content = PostContent::new(&req.content)?;

    let repo = PostRepo::new(&state.pool);
    let author_id = repo.author_of(id).await?;
    if author_id != user.session.user_id {
        return Err(ApiError::Forbidden {
            message: "you can only edit your own posts",
        });
    }

    let post = repo
        .update_content(id, user.session.user_id, &content)
        .await?;

    Ok(ok(PostResponse::from(post)))
}

/// DELETE /posts/{id} - delete your own post
async fn delete_post(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    let repo = PostRepo::new(&state.pool);
    let author_id = repo.author_of(id).await?;
    if author_id != user.session.user_id {
        return Err(ApiError::Forbidden {
            message: "you can only delete your own posts",
        });
    }

    repo.delete(id, user.session.user_id).await?;

    Ok(ok(serde_json::Value::Null))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/user/{id}", get(list_user_posts))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}
