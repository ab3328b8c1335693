use crate::artifacts::ArtifactUploader;
use crate::staging::StagingArea;
use crate::transcode::TranscodeStage;
use bytes::Bytes;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use vodflow_core::models::{AdDescriptor, TemporaryVideo, VideoSnapshot, VideoUploadMetadata};
use vodflow_core::PipelineError;
use vodflow_db::Catalog;
use vodflow_events::{EventPublisher, VideoEvent};
use vodflow_registry::TemporaryVideoRegistry;

/// Orchestrates the two-step upload protocol over the stage seams. Each step
/// compensates its own side effects; the temporary registry record is the
/// only state shared between the steps.
pub struct UploadPipeline {
    staging: StagingArea,
    transcode: TranscodeStage,
    uploader: ArtifactUploader,
    registry: Arc<dyn TemporaryVideoRegistry>,
    catalog: Arc<dyn Catalog>,
    publisher: Arc<dyn EventPublisher>,
}

impl UploadPipeline {
    pub fn new(
        staging: StagingArea,
        transcode: TranscodeStage,
        uploader: ArtifactUploader,
        registry: Arc<dyn TemporaryVideoRegistry>,
        catalog: Arc<dyn Catalog>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            staging,
            transcode,
            uploader,
            registry,
            catalog,
            publisher,
        }
    }

    /// Step one: ingest a raw video. Stage, encode, upload, register.
    ///
    /// On any failure the staging directory is removed and the registry is
    /// left without a record for this key, so the client can retry with the
    /// same video id.
    #[tracing::instrument(skip(self, data), fields(user_id = %user_id, video_id = %video_id, size = data.len()))]
    pub async fn submit_upload(
        &self,
        user_id: &str,
        video_id: &str,
        filename: &str,
        data: Bytes,
    ) -> Result<TemporaryVideo, PipelineError> {
        let input = self.staging.stage(user_id, video_id, filename, data).await?;

        let hls_dir = match self.transcode.run(&input).await {
            Ok(dir) => dir,
            Err(e) => {
                self.staging.cleanup(user_id, video_id).await;
                return Err(e);
            }
        };

        let artifacts = match self.uploader.upload_directory(user_id, video_id, &hls_dir).await {
            Ok(artifacts) => artifacts,
            Err(e) => {
                self.staging.cleanup(user_id, video_id).await;
                return Err(e);
            }
        };

        let record = match self
            .registry
            .create(user_id, video_id, &artifacts.video_url)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                self.staging.cleanup(user_id, video_id).await;
                self.uploader.delete_objects(&artifacts, user_id, video_id).await;
                return Err(e.into());
            }
        };

        self.staging.cleanup(user_id, video_id).await;

        // Opportunistic reclaim; with a zero TTL the record is already gone
        // by the time the client comes back.
        if let Err(e) = self.registry.sweep_if_expired(user_id, video_id).await {
            tracing::warn!(error = %e, "Post-upload expiry sweep failed");
        }

        tracing::info!(video_url = %record.video_url, "Upload step complete");
        Ok(record)
    }

    /// Step two: attach metadata and promote the upload to the permanent
    /// catalog.
    ///
    /// The temporary record is retired only after the catalog commit; on any
    /// failure before that it stays in place so the client can retry until
    /// the TTL runs out.
    #[tracing::instrument(skip(self, metadata, thumbnail), fields(user_id = %user_id, video_id = %video_id))]
    pub async fn submit_metadata(
        &self,
        user_id: &str,
        video_id: &str,
        metadata: &VideoUploadMetadata,
        thumbnail_filename: &str,
        thumbnail: Bytes,
    ) -> Result<VideoSnapshot, PipelineError> {
        metadata.validate()?;

        let record = self.registry.find(user_id, video_id).await?;

        let thumbnail_url = self
            .uploader
            .upload_thumbnail(user_id, video_id, thumbnail_filename, thumbnail)
            .await?;

        let snapshot = self
            .catalog
            .finalize(user_id, metadata, &record.video_url, &thumbnail_url)
            .await?;

        // Past the commit point: the permanent record exists, so neither a
        // publish failure nor a retire failure can fail the request.
        self.publish_best_effort(VideoEvent::created(snapshot.clone())).await;

        if let Err(e) = self.registry.delete(user_id, video_id).await {
            tracing::warn!(error = %e, "Failed to retire temporary record after finalization");
        }

        tracing::info!(permanent_video_id = %snapshot.video_id, "Metadata step complete");
        Ok(snapshot)
    }

    /// Replace the tag set of a published video.
    pub async fn update_tags(
        &self,
        user_id: &str,
        video_id: Uuid,
        tag_ids: &[String],
    ) -> Result<VideoSnapshot, PipelineError> {
        let snapshot = self.catalog.update_tags(user_id, video_id, tag_ids).await?;
        self.publish_best_effort(VideoEvent::updated(snapshot.clone())).await;
        Ok(snapshot)
    }

    /// Replace the ad set of a published video.
    pub async fn update_ads(
        &self,
        user_id: &str,
        video_id: Uuid,
        ads: &[AdDescriptor],
    ) -> Result<VideoSnapshot, PipelineError> {
        for ad in ads {
            ad.validate()?;
        }
        let snapshot = self.catalog.update_ads(user_id, video_id, ads).await?;
        self.publish_best_effort(VideoEvent::updated(snapshot.clone())).await;
        Ok(snapshot)
    }

    async fn publish_best_effort(&self, event: VideoEvent) {
        if let Err(e) = self.publisher.publish(&event).await {
            tracing::warn!(
                topic = event.topic.as_str(),
                video_id = %event.payload.video_id,
                error = %e,
                "Event publication failed; continuing"
            );
        }
    }
}
