//! Session repository
//!
//! Sessions are opaque server-side tokens with a fixed expiry. Lookup
//! joins the owning user so request authentication is one query.

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use super::DbError;

/// Session row
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// The authenticated user behind a valid session token
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Session repository
pub struct SessionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Start a session for `user_id` with the given token and lifetime.
    pub async fn create(
        &self,
        user_id: Uuid,
        token: &str,
        ttl_hours: i64,
    ) -> Result<SessionRecord, DbError> {
        let expires_at = Utc::now() + Duration::hours(ttl_hours);

        let session: SessionRecord = sqlx::query_as(
            r#"
            INSERT INTO sessions (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, token, user_id, created_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(session)
    }

    /// Resolve a token to its user, skipping expired rows.
    pub async fn find_user_by_token(&self, token: &str) -> Result<Option<SessionUser>, DbError> {
        let row = sqlx::query(
            r#"
            SELECT
                u.id AS user_id,
                u.name,
                u.email,
                u.image,
                u.bio,
                u.created_at,
                u.updated_at,
                s.expires_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| SessionUser {
            user_id: r.get("user_id"),
            name: r.get("name"),
            email: r.get("email"),
            image: r.get("image"),
            bio: r.get("bio"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
            expires_at: r.get("expires_at"),
        }))
    }

    /// Terminate the session behind a token. Deleting an already-gone
    /// token is not an error.
    pub async fn delete_by_token(&self, token: &str) -> Result<(), DbError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Drop expired sessions, returning how many were removed.
    pub async fn delete_expired(&self) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    #[tokio::test]
    #[ignore = "requires database"]
    async fn expired_token_resolves_to_none() {
        use super::*;
        use murmur_core::{EmailAddress, UserName};

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let users = crate::db::repos::UserRepo::new(&pool);
        let name = UserName::new("Session Tester").unwrap();
        let email = EmailAddress::new("session-tester@example.com").unwrap();
        let user = users.create(&name, &email, "hash", None).await.expect("user");

        let sessions = SessionRepo::new(&pool);
        // Negative TTL backdates the expiry
        let session = sessions
            .create(user.id, "expired-token-test", -1)
            .await
            .expect("session");

        let found = sessions
            .find_user_by_token(&session.token)
            .await
            .expect("lookup");

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&pool)
            .await
            .expect("cleanup");

        assert!(found.is_none());
    }
}
