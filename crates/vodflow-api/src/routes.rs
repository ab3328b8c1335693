use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Json, Router,
};
use http::HeaderValue;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

fn cors_layer(origins: &[String]) -> Result<CorsLayer, anyhow::Error> {
    if origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let values = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| anyhow::anyhow!("invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(values))
        .allow_methods(Any)
        .allow_headers(Any))
}

pub fn build_router(state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = cors_layer(&state.config.cors_origins)?;
    // Slack above the validator's limit so oversized uploads get the
    // validation error instead of a bare 413.
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes + 1024 * 1024);

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/upload-service/videos/{user_id}",
            post(handlers::upload::upload_video),
        )
        .route(
            "/upload-service/videos/{user_id}/{video_id}",
            post(handlers::finalize::finalize_video),
        )
        .route(
            "/upload-service/videos/{user_id}/{video_id}/tags",
            patch(handlers::modify::update_tags),
        )
        .route(
            "/upload-service/videos/{user_id}/{video_id}/ads",
            patch(handlers::modify::update_ads),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(body_limit)
        .with_state(state);

    Ok(app)
}
