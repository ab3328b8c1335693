use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use vodflow_core::models::{VideoSnapshot, VideoUploadMetadata};
use vodflow_core::PipelineError;

struct FinalizeParts {
    metadata: VideoUploadMetadata,
    thumbnail_filename: String,
    thumbnail: Bytes,
}

async fn extract_parts(mut multipart: Multipart) -> Result<FinalizeParts, HttpAppError> {
    let mut metadata = None;
    let mut thumbnail = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("metadata") => {
                let raw = field.text().await?;
                metadata = Some(serde_json::from_str::<VideoUploadMetadata>(&raw)?);
            }
            Some("thumbnail") => {
                let filename = field
                    .file_name()
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| "thumbnail.jpg".to_string());
                let data = field.bytes().await?;
                thumbnail = Some((filename, data));
            }
            _ => {}
        }
    }

    let metadata = metadata.ok_or_else(|| {
        PipelineError::Validation("multipart body must contain a 'metadata' part".to_string())
    })?;
    let (thumbnail_filename, thumbnail) = thumbnail.ok_or_else(|| {
        PipelineError::Validation("multipart body must contain a 'thumbnail' part".to_string())
    })?;

    Ok(FinalizeParts {
        metadata,
        thumbnail_filename,
        thumbnail,
    })
}

#[utoipa::path(
    post,
    path = "/upload-service/videos/{user_id}/{video_id}",
    tag = "videos",
    params(
        ("user_id" = String, Path, description = "Uploading user"),
        ("video_id" = String, Path, description = "Temporary video id from the upload step")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video published to the catalog", body = VideoSnapshot),
        (status = 400, description = "Invalid metadata or unknown tag", body = ErrorResponse),
        (status = 404, description = "No staged upload for this id, or it expired", body = ErrorResponse),
        (status = 500, description = "Finalization failed; the staged upload is kept", body = ErrorResponse)
    )
)]
pub async fn finalize_video(
    State(state): State<Arc<AppState>>,
    Path((user_id, video_id)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<VideoSnapshot>), HttpAppError> {
    let parts = extract_parts(multipart).await?;

    let snapshot = state
        .pipeline
        .submit_metadata(
            &user_id,
            &video_id,
            &parts.metadata,
            &parts.thumbnail_filename,
            parts.thumbnail,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}
