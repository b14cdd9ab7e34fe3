//! Post repository
//!
//! List queries return denormalized author data via LEFT JOIN and a
//! window-function total, so every listing is a single round trip.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use murmur_core::{Paginated, Pagination, PostContent};

use super::DbError;

/// Author columns denormalized onto a post row
#[derive(Debug, Clone)]
pub struct PostAuthor {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
}

/// Post with its author projection
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: PostAuthor,
}

impl PostWithAuthor {
    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
            author: PostAuthor {
                id: row.get("author_id"),
                name: row.get("author_name"),
                image: row.get("author_image"),
            },
        }
    }
}

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a post and return it with the author joined, one query.
    pub async fn create(
        &self,
        author_id: Uuid,
        content: &PostContent,
    ) -> Result<PostWithAuthor, DbError> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO posts (author_id, content)
                VALUES ($1, $2)
                RETURNING id, content, author_id, created_at
            )
            SELECT
                i.id,
                i.content,
                i.created_at,
                u.id AS author_id,
                u.name AS author_name,
                u.image AS author_image
            FROM inserted i
            JOIN users u ON u.id = i.author_id
            "#,
        )
        .bind(author_id)
        .bind(content.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(PostWithAuthor::from_row(&row))
    }

    /// List the feed, newest first.
    pub async fn list(&self, page: Pagination) -> Result<Paginated<PostWithAuthor>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                p.id,
                p.content,
                p.created_at,
                u.id AS author_id,
                u.name AS author_name,
                u.image AS author_image,
                COUNT(*) OVER() AS total
            FROM posts p
            LEFT JOIN users u ON u.id = p.author_id
            ORDER BY p.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        let total = rows.first().map(|r| r.get::<i64, _>("total")).unwrap_or(0);
        let items = rows.iter().map(PostWithAuthor::from_row).collect();

        Ok(Paginated {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// Fetch a single post with its author.
    pub async fn get(&self, id: Uuid) -> Result<PostWithAuthor, DbError> {
        let row = sqlx::query(
            r#"
            SELECT
                p.id,
                p.content,
                p.created_at,
                u.id AS author_id,
                u.name AS author_name,
                u.image AS author_image
            FROM posts p
            LEFT JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "post",
            id: id.to_string(),
        })?;

        Ok(PostWithAuthor::from_row(&row))
    }

    /// List one author's posts, newest first.
    pub async fn list_for_author(
        &self,
        author_id: Uuid,
        page: Pagination,
    ) -> Result<Paginated<PostWithAuthor>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                p.id,
                p.content,
                p.created_at,
                u.id AS author_id,
                u.name AS author_name,
                u.image AS author_image,
                COUNT(*) OVER() AS total
            FROM posts p
            LEFT JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(author_id)
        .bind(page.limit as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        let total = rows.first().map(|r| r.get::<i64, _>("total")).unwrap_or(0);
        let items = rows.iter().map(PostWithAuthor::from_row).collect();

        Ok(Paginated {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    /// Who wrote a post. `NotFound` when the post doesn't exist; the
    /// HTTP layer turns an author mismatch into 403.
    pub async fn author_of(&self, id: Uuid) -> Result<Uuid, DbError> {
        let row = sqlx::query("SELECT author_id FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "post",
                id: id.to_string(),
            })?;

        Ok(row.get("author_id"))
    }

    /// Replace a post's content, scoped to its author.
    ///
    /// The author predicate repeats in SQL so the write never races the
    /// ownership check; zero rows means the post vanished in between.
    pub async fn update_content(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: &PostContent,
    ) -> Result<PostWithAuthor, DbError> {
        let row = sqlx::query(
            r#"
            WITH updated AS (
                UPDATE posts
                SET content = $3
                WHERE id = $1 AND author_id = $2
                RETURNING id, content, author_id, created_at
            )
            SELECT
                up.id,
                up.content,
                up.created_at,
                u.id AS author_id,
                u.name AS author_name,
                u.image AS author_image
            FROM updated up
            JOIN users u ON u.id = up.author_id
            "#,
        )
        .bind(id)
        .bind(author_id)
        .bind(content.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "post",
            id: id.to_string(),
        })?;

        Ok(PostWithAuthor::from_row(&row))
    }

    /// Delete a post, scoped to its author.
    pub async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "post",
                id: id.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Integration tests - run with DATABASE_URL set
    // cargo test -p murmur-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn feed_is_newest_first() {
        use super::*;
        use murmur_core::{EmailAddress, PostContent, UserName};

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");

        let users = crate::db::repos::UserRepo::new(&pool);
        let name = UserName::new("Feed Tester").unwrap();
        let email = EmailAddress::new("feed-tester@example.com").unwrap();
        let user = users.create(&name, &email, "hash", None).await.expect("user");

        let posts = PostRepo::new(&pool);
        let first = PostContent::new("older post").unwrap();
        let second = PostContent::new("newer post").unwrap();
        posts.create(user.id, &first).await.expect("first post");
        posts.create(user.id, &second).await.expect("second post");

        let page = posts
            .list_for_author(user.id, Pagination::default())
            .await
            .expect("list");

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&pool)
            .await
            .expect("cleanup");

        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].content, "newer post");
        assert_eq!(page.items[1].content, "older post");
    }
}
