//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uses JOINs for list operations (no N+1)
//! - Single query with `COUNT(*) OVER()` for paginated totals
//! - Ownership checks happen in SQL (`WHERE id AND author_id`)

pub mod posts;
pub mod sessions;
pub mod users;

pub use posts::{PostAuthor, PostRepo, PostWithAuthor};
pub use sessions::{SessionRecord, SessionRepo, SessionUser};
pub use users::{AuthRecord, UserRecord, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} {field} already taken")]
    Conflict {
        resource: &'static str,
        field: &'static str,
    },
}
