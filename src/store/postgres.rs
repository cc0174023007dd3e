use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::models::{Post, Profile, UserRecord};
use crate::store::{AggregateStore, StoreError};

/// Postgres-backed store. Profile and post aggregates live as JSONB
/// documents with the lookup keys (owner, author, created_at) promoted to
/// real columns. The `users` table is written by the external auth service;
/// this crate only reads from it and deletes on account removal.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the aggregate tables if they do not exist yet. Idempotent,
    /// safe to run at every startup.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                avatar TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id UUID PRIMARY KEY,
                owner UUID NOT NULL UNIQUE,
                doc JSONB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id UUID PRIMARY KEY,
                author UUID NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                doc JSONB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn map_insert_err(err: sqlx::Error, key: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(key.to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl AggregateStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let row: Option<(Uuid, String, Option<String>)> =
            sqlx::query_as("SELECT id, name, avatar FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, name, avatar)| UserRecord { id, name, avatar }))
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_profile_by_owner(&self, owner: Uuid) -> Result<Option<Profile>, StoreError> {
        let doc: Option<Json<Profile>> =
            sqlx::query_scalar("SELECT doc FROM profiles WHERE owner = $1")
                .bind(owner)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doc.map(|Json(profile)| profile))
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let docs: Vec<Json<Profile>> = sqlx::query_scalar("SELECT doc FROM profiles")
            .fetch_all(&self.pool)
            .await?;
        Ok(docs.into_iter().map(|Json(profile)| profile).collect())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO profiles (id, owner, doc) VALUES ($1, $2, $3)")
            .bind(profile.id)
            .bind(profile.owner)
            .bind(Json(profile))
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_err(e, "profiles.owner"))?;
        Ok(())
    }

    async fn replace_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE profiles SET doc = $2 WHERE id = $1")
            .bind(profile.id)
            .bind(Json(profile))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(profile.id));
        }
        Ok(())
    }

    async fn delete_profile_by_owner(&self, owner: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM profiles WHERE owner = $1")
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let doc: Option<Json<Post>> = sqlx::query_scalar("SELECT doc FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc.map(|Json(post)| post))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let docs: Vec<Json<Post>> =
            sqlx::query_scalar("SELECT doc FROM posts ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(docs.into_iter().map(|Json(post)| post).collect())
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO posts (id, author, created_at, doc) VALUES ($1, $2, $3, $4)")
            .bind(post.id)
            .bind(post.author)
            .bind(post.created_at)
            .bind(Json(post))
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_err(e, "posts.id"))?;
        Ok(())
    }

    async fn replace_post(&self, post: &Post) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE posts SET doc = $2 WHERE id = $1")
            .bind(post.id)
            .bind(Json(post))
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(post.id));
        }
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
