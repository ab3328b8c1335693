mod api_doc;
mod error;
mod handlers;
mod routes;
mod server;
mod state;
mod telemetry;

use std::sync::Arc;
use vodflow_core::Config;
use vodflow_db::PostgresCatalog;
use vodflow_events::{EventPublisher, LogPublisher, WebhookPublisher};
use vodflow_pipeline::{ArtifactUploader, StagingArea, TranscodeStage, UploadPipeline};
use vodflow_processing::{FfmpegEngine, UploadValidator};
use vodflow_registry::{PostgresRegistry, RegistrySweeper};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;
    telemetry::init(&config);

    tracing::info!(environment = %config.environment, "Starting vodflow upload service");

    let pool = vodflow_db::create_pool(
        &config.database_url,
        config.db_max_connections,
        config.db_timeout_seconds,
    )
    .await?;
    vodflow_db::run_migrations(&pool).await?;

    let store = vodflow_storage::create_blob_store(&config).await?;

    let engine = Arc::new(FfmpegEngine::new(
        config.ffmpeg_path.clone(),
        config.hls_segment_duration,
        &config.hls_variants,
    ));

    let registry = Arc::new(PostgresRegistry::new(pool.clone(), config.registry_ttl_secs));
    let catalog = Arc::new(PostgresCatalog::new(pool.clone()));

    let publisher: Arc<dyn EventPublisher> =
        match (config.webhook_url.clone(), config.webhook_secret.clone()) {
            (Some(url), Some(secret)) => {
                tracing::info!(url = %url, "Publishing events via webhook");
                Arc::new(WebhookPublisher::new(
                    url,
                    secret,
                    config.webhook_timeout_seconds,
                ))
            }
            _ => {
                tracing::info!("No webhook configured; events will be logged only");
                Arc::new(LogPublisher::new())
            }
        };

    let pipeline = UploadPipeline::new(
        StagingArea::new(
            config.staging_root.clone(),
            UploadValidator::new(
                config.max_upload_bytes,
                config.video_allowed_extensions.clone(),
            ),
        ),
        TranscodeStage::new(engine),
        ArtifactUploader::new(store),
        registry.clone(),
        catalog,
        publisher,
    );

    let sweeper = if config.sweep_interval_secs > 0 {
        Some(
            RegistrySweeper::new(
                registry,
                std::time::Duration::from_secs(config.sweep_interval_secs),
            )
            .spawn(),
        )
    } else {
        None
    };

    let state = Arc::new(state::AppState {
        config: config.clone(),
        pipeline,
    });
    let router = routes::build_router(state)?;

    server::start_server(&config, router).await?;

    if let Some(handle) = sweeper {
        handle.shutdown().await;
    }

    Ok(())
}
