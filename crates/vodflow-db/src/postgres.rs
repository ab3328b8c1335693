use crate::catalog::{Catalog, CatalogError, CatalogResult};
use crate::transaction::TransactionGuard;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;
use vodflow_core::models::{Ad, AdDescriptor, Tag, Video, VideoSnapshot, VideoUploadMetadata};

/// Postgres-backed catalog. One transaction per operation; rollback on any
/// error makes the multi-row writes all-or-nothing.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_video(
        tx: &mut Transaction<'_, Postgres>,
        video: &Video,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO videos (video_id, video_name, video_url, thumbnail_url, seller_id, seller_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(video.video_id)
        .bind(&video.video_name)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(&video.seller_id)
        .bind(&video.seller_name)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn insert_ad(tx: &mut Transaction<'_, Postgres>, ad: &Ad) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO ads (ad_id, video_id, ad_url, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(ad.ad_id)
        .bind(ad.video_id)
        .bind(&ad.ad_url)
        .bind(ad.start_time)
        .bind(ad.end_time)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Look up a tag inside the transaction; a missing tag is `TagNotFound`.
    async fn lookup_tag(
        tx: &mut Transaction<'_, Postgres>,
        tag_id: &str,
    ) -> CatalogResult<Tag> {
        let row = sqlx::query("SELECT tag_id, tag_name FROM tags WHERE tag_id = $1")
            .bind(tag_id)
            .fetch_optional(&mut **tx)
            .await?;

        match row {
            Some(row) => Ok(Tag {
                tag_id: row.get("tag_id"),
                tag_name: row.get("tag_name"),
            }),
            None => Err(CatalogError::TagNotFound(tag_id.to_string())),
        }
    }

    async fn insert_video_tag(
        tx: &mut Transaction<'_, Postgres>,
        video_id: Uuid,
        tag_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO video_tags (video_id, tag_id) VALUES ($1, $2)")
            .bind(video_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Fetch the video row scoped by owner; `NotFound` covers both an unknown
    /// id and a non-owner caller.
    async fn fetch_owned_video(
        tx: &mut Transaction<'_, Postgres>,
        seller_id: &str,
        video_id: Uuid,
    ) -> CatalogResult<Video> {
        let row = sqlx::query(
            r#"
            SELECT video_id, video_name, video_url, thumbnail_url, seller_id, seller_name, created_at, updated_at
            FROM videos
            WHERE video_id = $1 AND seller_id = $2
            "#,
        )
        .bind(video_id)
        .bind(seller_id)
        .fetch_optional(&mut **tx)
        .await?;

        match row {
            Some(row) => Ok(Video {
                video_id: row.get("video_id"),
                video_name: row.get("video_name"),
                video_url: row.get("video_url"),
                thumbnail_url: row.get("thumbnail_url"),
                seller_id: row.get("seller_id"),
                seller_name: row.get("seller_name"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            }),
            None => Err(CatalogError::NotFound(video_id.to_string())),
        }
    }

    async fn fetch_ads(
        tx: &mut Transaction<'_, Postgres>,
        video_id: Uuid,
    ) -> Result<Vec<Ad>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT ad_id, video_id, ad_url, start_time, end_time FROM ads WHERE video_id = $1",
        )
        .bind(video_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Ad {
                ad_id: row.get("ad_id"),
                video_id: row.get("video_id"),
                ad_url: row.get("ad_url"),
                start_time: row.get("start_time"),
                end_time: row.get("end_time"),
            })
            .collect())
    }

    async fn fetch_tags(
        tx: &mut Transaction<'_, Postgres>,
        video_id: Uuid,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT t.tag_id, t.tag_name
            FROM video_tags vt
            JOIN tags t ON t.tag_id = vt.tag_id
            WHERE vt.video_id = $1
            "#,
        )
        .bind(video_id)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows
            .iter()
            .map(|row| Tag {
                tag_id: row.get("tag_id"),
                tag_name: row.get("tag_name"),
            })
            .collect())
    }

    async fn touch_updated_at(
        tx: &mut Transaction<'_, Postgres>,
        video_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE videos SET updated_at = $2 WHERE video_id = $1")
            .bind(video_id)
            .bind(now)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    #[tracing::instrument(skip(self, metadata, video_url, thumbnail_url), fields(seller_id = %seller_id))]
    async fn finalize(
        &self,
        seller_id: &str,
        metadata: &VideoUploadMetadata,
        video_url: &str,
        thumbnail_url: &str,
    ) -> CatalogResult<VideoSnapshot> {
        let mut guard = TransactionGuard::begin(&self.pool).await?;

        let video = Video::new(
            &metadata.video_name,
            video_url,
            thumbnail_url,
            seller_id,
            &metadata.seller_name,
        );
        Self::insert_video(&mut guard, &video).await?;

        let mut ads = Vec::with_capacity(metadata.ads.len());
        for descriptor in &metadata.ads {
            let ad = Ad::new(video.video_id, descriptor);
            Self::insert_ad(&mut guard, &ad).await?;
            ads.push(ad);
        }

        let mut tags = Vec::with_capacity(metadata.tag_ids.len());
        for tag_id in &metadata.tag_ids {
            let tag = Self::lookup_tag(&mut guard, tag_id).await?;
            Self::insert_video_tag(&mut guard, video.video_id, tag_id).await?;
            tags.push(tag);
        }

        guard.commit().await?;

        tracing::info!(
            video_id = %video.video_id,
            ad_count = ads.len(),
            tag_count = tags.len(),
            "Finalized permanent video record"
        );

        Ok(VideoSnapshot::assemble(&video, tags, ads))
    }

    #[tracing::instrument(skip(self, tag_ids), fields(seller_id = %seller_id, video_id = %video_id))]
    async fn update_tags(
        &self,
        seller_id: &str,
        video_id: Uuid,
        tag_ids: &[String],
    ) -> CatalogResult<VideoSnapshot> {
        let mut guard = TransactionGuard::begin(&self.pool).await?;

        let mut video = Self::fetch_owned_video(&mut guard, seller_id, video_id).await?;

        let mut tags = Vec::with_capacity(tag_ids.len());
        for tag_id in tag_ids {
            tags.push(Self::lookup_tag(&mut guard, tag_id).await?);
        }

        sqlx::query("DELETE FROM video_tags WHERE video_id = $1")
            .bind(video_id)
            .execute(&mut **guard)
            .await?;

        for tag_id in tag_ids {
            Self::insert_video_tag(&mut guard, video_id, tag_id).await?;
        }

        let now = Utc::now();
        Self::touch_updated_at(&mut guard, video_id, now).await?;
        video.updated_at = now;

        let ads = Self::fetch_ads(&mut guard, video_id).await?;

        guard.commit().await?;

        Ok(VideoSnapshot::assemble(&video, tags, ads))
    }

    #[tracing::instrument(skip(self, ads), fields(seller_id = %seller_id, video_id = %video_id))]
    async fn update_ads(
        &self,
        seller_id: &str,
        video_id: Uuid,
        ads: &[AdDescriptor],
    ) -> CatalogResult<VideoSnapshot> {
        let mut guard = TransactionGuard::begin(&self.pool).await?;

        let mut video = Self::fetch_owned_video(&mut guard, seller_id, video_id).await?;

        sqlx::query("DELETE FROM ads WHERE video_id = $1")
            .bind(video_id)
            .execute(&mut **guard)
            .await?;

        let mut new_ads = Vec::with_capacity(ads.len());
        for descriptor in ads {
            let ad = Ad::new(video_id, descriptor);
            Self::insert_ad(&mut guard, &ad).await?;
            new_ads.push(ad);
        }

        let now = Utc::now();
        Self::touch_updated_at(&mut guard, video_id, now).await?;
        video.updated_at = now;

        let tags = Self::fetch_tags(&mut guard, video_id).await?;

        guard.commit().await?;

        Ok(VideoSnapshot::assemble(&video, tags, new_ads))
    }

    async fn insert_tag(&self, tag: &Tag) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tags (tag_id, tag_name)
            VALUES ($1, $2)
            ON CONFLICT (tag_id) DO UPDATE SET tag_name = EXCLUDED.tag_name
            "#,
        )
        .bind(&tag.tag_id)
        .bind(&tag.tag_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
