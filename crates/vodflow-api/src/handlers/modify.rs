use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use vodflow_core::models::{AdDescriptor, VideoSnapshot};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTagsRequest {
    pub tag_ids: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAdsRequest {
    pub ads: Vec<AdDescriptor>,
}

#[utoipa::path(
    patch,
    path = "/upload-service/videos/{user_id}/{video_id}/tags",
    tag = "videos",
    params(
        ("user_id" = String, Path, description = "Owning user"),
        ("video_id" = Uuid, Path, description = "Permanent video id")
    ),
    request_body = UpdateTagsRequest,
    responses(
        (status = 200, description = "Tag set replaced", body = VideoSnapshot),
        (status = 400, description = "Unknown tag id", body = ErrorResponse),
        (status = 404, description = "Video not found for this user", body = ErrorResponse)
    )
)]
pub async fn update_tags(
    State(state): State<Arc<AppState>>,
    Path((user_id, video_id)): Path<(String, Uuid)>,
    Json(request): Json<UpdateTagsRequest>,
) -> Result<Json<VideoSnapshot>, HttpAppError> {
    let snapshot = state
        .pipeline
        .update_tags(&user_id, video_id, &request.tag_ids)
        .await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    patch,
    path = "/upload-service/videos/{user_id}/{video_id}/ads",
    tag = "videos",
    params(
        ("user_id" = String, Path, description = "Owning user"),
        ("video_id" = Uuid, Path, description = "Permanent video id")
    ),
    request_body = UpdateAdsRequest,
    responses(
        (status = 200, description = "Ad set replaced", body = VideoSnapshot),
        (status = 400, description = "Invalid ad descriptor", body = ErrorResponse),
        (status = 404, description = "Video not found for this user", body = ErrorResponse)
    )
)]
pub async fn update_ads(
    State(state): State<Arc<AppState>>,
    Path((user_id, video_id)): Path<(String, Uuid)>,
    Json(request): Json<UpdateAdsRequest>,
) -> Result<Json<VideoSnapshot>, HttpAppError> {
    let snapshot = state
        .pipeline
        .update_ads(&user_id, video_id, &request.ads)
        .await?;
    Ok(Json(snapshot))
}
