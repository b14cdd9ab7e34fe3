//! User repository
//!
//! Account rows are written once at sign-up; the unique email index is
//! the source of truth for duplicates (no check-then-insert).

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use murmur_core::{Bio, EmailAddress, UserName};

use super::DbError;

/// User record as exposed by the API (no credentials)
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Credential projection used by sign-in
#[derive(Debug, Clone, FromRow)]
pub struct AuthRecord {
    pub id: Uuid,
    pub password_hash: String,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account.
    ///
    /// A unique violation on the email index maps to [`DbError::Conflict`].
    pub async fn create(
        &self,
        name: &UserName,
        email: &EmailAddress,
        password_hash: &str,
        bio: Option<&Bio>,
    ) -> Result<UserRecord, DbError> {
        let user: UserRecord = sqlx::query_as(
            r#"
            INSERT INTO users (name, email, password_hash, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, image, bio, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(email.as_str())
        .bind(password_hash)
        .bind(bio.map(Bio::as_str))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return DbError::Conflict {
                        resource: "user",
                        field: "email",
                    };
                }
            }
            DbError::Sqlx(e)
        })?;

        Ok(user)
    }

    /// Fetch a profile by id.
    pub async fn get(&self, id: Uuid) -> Result<UserRecord, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, name, email, image, bio, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "user",
            id: id.to_string(),
        })
    }

    /// Fetch sign-in credentials for an email, if the account exists.
    pub async fn get_auth_by_email(&self, email: &str) -> Result<Option<AuthRecord>, DbError> {
        let record = sqlx::query_as(
            r#"
            SELECT id, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Check whether a user row exists.
    pub async fn exists(&self, id: Uuid) -> Result<bool, DbError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1) AS present")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(row.get("present"))
    }
}

#[cfg(test)]
mod tests {
    // Integration tests - run with DATABASE_URL set
    // cargo test -p murmur-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_email_maps_to_conflict() {
        use super::*;
        use murmur_core::{EmailAddress, UserName};

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let repo = UserRepo::new(&pool);
        let name = UserName::new("Dup Tester").unwrap();
        let email = EmailAddress::new("dup-tester@example.com").unwrap();

        let first = repo.create(&name, &email, "hash", None).await;
        let second = repo.create(&name, &email, "hash", None).await;

        // Clean up before asserting so reruns stay green
        if let Ok(user) = &first {
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(user.id)
                .execute(&pool)
                .await
                .expect("cleanup");
        }

        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(DbError::Conflict { field: "email", .. })
        ));
    }
}
