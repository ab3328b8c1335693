use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Permanent video record. `video_url` and `thumbnail_url` are immutable once
/// the record is created; media is never replaced in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub video_id: Uuid,
    pub video_name: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub seller_id: String,
    pub seller_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Mint a fresh permanent video record. The id is always newly generated;
    /// it is distinct from the temporary video id used during staging.
    pub fn new(
        video_name: &str,
        video_url: &str,
        thumbnail_url: &str,
        seller_id: &str,
        seller_name: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            video_id: Uuid::new_v4(),
            video_name: video_name.to_string(),
            video_url: video_url.to_string(),
            thumbnail_url: thumbnail_url.to_string(),
            seller_id: seller_id.to_string(),
            seller_name: seller_name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Advertisement overlay attached to a video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Ad {
    pub ad_id: Uuid,
    pub video_id: Uuid,
    pub ad_url: String,
    pub start_time: i32,
    pub end_time: i32,
}

impl Ad {
    pub fn new(video_id: Uuid, descriptor: &AdDescriptor) -> Self {
        Self {
            ad_id: Uuid::new_v4(),
            video_id,
            ad_url: descriptor.ad_url.clone(),
            start_time: descriptor.start_time,
            end_time: descriptor.end_time,
        }
    }
}

/// Pre-existing catalog tag. Tags are never created by the upload pipeline;
/// finalization fails if a referenced tag does not exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Tag {
    pub tag_id: String,
    pub tag_name: String,
}

/// Client-supplied ad descriptor, as submitted with the metadata step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema, Validate)]
pub struct AdDescriptor {
    #[validate(length(min = 1, message = "ad_url must not be empty"))]
    pub ad_url: String,
    #[validate(range(min = 0))]
    pub start_time: i32,
    #[validate(range(min = 0))]
    pub end_time: i32,
}

/// Metadata submitted in the second step of the upload protocol.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct VideoUploadMetadata {
    #[validate(length(min = 1, max = 255, message = "video_name must not be empty"))]
    pub video_name: String,
    #[validate(length(min = 1, max = 255, message = "seller_name must not be empty"))]
    pub seller_name: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "too many ads"))]
    #[validate(nested)]
    pub ads: Vec<AdDescriptor>,
    #[serde(default)]
    #[validate(length(max = 50, message = "too many tags"))]
    pub tag_ids: Vec<String>,
}

/// Denormalized snapshot of a permanent video, as returned by the metadata
/// step and carried on the event channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct VideoSnapshot {
    pub video_id: Uuid,
    pub video_name: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub seller_id: String,
    pub seller_name: String,
    pub tags: Vec<Tag>,
    pub ads: Vec<Ad>,
    pub created_at: DateTime<Utc>,
}

impl VideoSnapshot {
    pub fn assemble(video: &Video, tags: Vec<Tag>, ads: Vec<Ad>) -> Self {
        Self {
            video_id: video.video_id,
            video_name: video.video_name.clone(),
            video_url: video.video_url.clone(),
            thumbnail_url: video.thumbnail_url.clone(),
            seller_id: video.seller_id.clone(),
            seller_name: video.seller_name.clone(),
            tags,
            ads,
            created_at: video.created_at,
        }
    }
}
