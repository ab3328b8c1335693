//! OpenAPI documentation.

use crate::error;
use crate::handlers;
use utoipa::OpenApi;
use vodflow_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vodflow Upload Service",
        version = "0.1.0",
        description = "Two-step video upload API: stage a raw video for HLS transcoding, then attach metadata to publish it to the catalog."
    ),
    paths(
        handlers::upload::upload_video,
        handlers::finalize::finalize_video,
        handlers::modify::update_tags,
        handlers::modify::update_ads,
        handlers::health::health,
    ),
    components(schemas(
        models::TemporaryVideo,
        models::VideoSnapshot,
        models::VideoUploadMetadata,
        models::AdDescriptor,
        models::Ad,
        models::Tag,
        handlers::modify::UpdateTagsRequest,
        handlers::modify::UpdateAdsRequest,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "videos", description = "Video upload and publication"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
