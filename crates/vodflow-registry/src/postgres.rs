use crate::registry::{RegistryError, RegistryResult, TemporaryVideoRegistry};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use vodflow_core::models::TemporaryVideo;

/// Postgres-backed registry.
///
/// The table's primary key is `(user_id, video_id)`; `create` is a single
/// atomic upsert whose conflict clause only overwrites an expired row, so two
/// concurrent creates for one key yield exactly one success.
#[derive(Clone)]
pub struct PostgresRegistry {
    pool: PgPool,
    ttl_secs: i64,
}

impl PostgresRegistry {
    pub fn new(pool: PgPool, ttl_secs: i64) -> Self {
        Self { pool, ttl_secs }
    }

    fn row_to_record(row: &sqlx::postgres::PgRow) -> TemporaryVideo {
        TemporaryVideo {
            user_id: row.get("user_id"),
            video_id: row.get("video_id"),
            video_url: row.get("video_url"),
            thumbnail_url: row.get("thumbnail_url"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
        }
    }
}

#[async_trait]
impl TemporaryVideoRegistry for PostgresRegistry {
    async fn create(
        &self,
        user_id: &str,
        video_id: &str,
        video_url: &str,
    ) -> RegistryResult<TemporaryVideo> {
        let now = Utc::now();
        let expires_at: DateTime<Utc> = now + Duration::seconds(self.ttl_secs);

        // The DO UPDATE arm only fires for an expired row; a live row makes
        // the upsert a no-op and RETURNING yields nothing.
        let row = sqlx::query(
            r#"
            INSERT INTO temporary_videos (user_id, video_id, video_url, thumbnail_url, created_at, expires_at)
            VALUES ($1, $2, $3, NULL, $4, $5)
            ON CONFLICT (user_id, video_id) DO UPDATE
            SET video_url = EXCLUDED.video_url,
                thumbnail_url = NULL,
                created_at = EXCLUDED.created_at,
                expires_at = EXCLUDED.expires_at
            WHERE temporary_videos.expires_at <= $4
            RETURNING user_id, video_id, video_url, thumbnail_url, created_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .bind(video_url)
        .bind(now)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Self::row_to_record(&row)),
            None => Err(RegistryError::AlreadyExists {
                user_id: user_id.to_string(),
                video_id: video_id.to_string(),
            }),
        }
    }

    async fn find(&self, user_id: &str, video_id: &str) -> RegistryResult<TemporaryVideo> {
        let row = sqlx::query(
            r#"
            SELECT user_id, video_id, video_url, thumbnail_url, created_at, expires_at
            FROM temporary_videos
            WHERE user_id = $1 AND video_id = $2 AND expires_at > $3
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Self::row_to_record(&row)),
            None => Err(RegistryError::NotFound {
                user_id: user_id.to_string(),
                video_id: video_id.to_string(),
            }),
        }
    }

    async fn delete(&self, user_id: &str, video_id: &str) -> RegistryResult<()> {
        sqlx::query("DELETE FROM temporary_videos WHERE user_id = $1 AND video_id = $2")
            .bind(user_id)
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn sweep_if_expired(&self, user_id: &str, video_id: &str) -> RegistryResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM temporary_videos
            WHERE user_id = $1 AND video_id = $2 AND expires_at <= $3
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn sweep_expired(&self) -> RegistryResult<u64> {
        let result = sqlx::query("DELETE FROM temporary_videos WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
