use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use vodflow_core::models::TemporaryVideo;
use vodflow_core::PipelineError;

/// Pull the `video` part out of the multipart body.
async fn extract_video_part(
    mut multipart: Multipart,
) -> Result<(String, Bytes), HttpAppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("video") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|name| name.to_string())
            .ok_or_else(|| {
                PipelineError::Validation("video part must carry a filename".to_string())
            })?;
        let data = field.bytes().await?;
        return Ok((filename, data));
    }

    Err(HttpAppError(PipelineError::Validation(
        "multipart body must contain a 'video' part".to_string(),
    )))
}

#[utoipa::path(
    post,
    path = "/upload-service/videos/{user_id}",
    tag = "videos",
    params(
        ("user_id" = String, Path, description = "Uploading user")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video staged; returns the temporary record", body = TemporaryVideo),
        (status = 400, description = "Invalid upload", body = ErrorResponse),
        (status = 409, description = "Upload already staged for this video id", body = ErrorResponse),
        (status = 500, description = "Ingestion failed", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<TemporaryVideo>, HttpAppError> {
    let (filename, data) = extract_video_part(multipart).await?;

    // The temporary id is minted here; the permanent id is minted at
    // finalization and is unrelated.
    let video_id = uuid::Uuid::new_v4().to_string();

    let record = state
        .pipeline
        .submit_upload(&user_id, &video_id, &filename, data)
        .await?;

    Ok(Json(record))
}
