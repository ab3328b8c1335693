use crate::{EventPublisher, PublishError, VideoEvent};
use async_trait::async_trait;

/// Fallback publisher used when no webhook endpoint is configured. Events are
/// written to the log and considered delivered.
#[derive(Default)]
pub struct LogPublisher;

impl LogPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: &VideoEvent) -> Result<(), PublishError> {
        tracing::info!(
            topic = event.topic.as_str(),
            video_id = %event.payload.video_id,
            "Event published (log only)"
        );
        Ok(())
    }
}
