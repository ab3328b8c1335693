//! Downstream event publication.
//!
//! Publication is best-effort by contract: callers log failures after the
//! catalog commit instead of failing the request.

mod capture;
mod event;
mod log;
mod webhook;

pub use capture::CapturingPublisher;
pub use event::{EventTopic, VideoEvent};
pub use log::LogPublisher;
pub use webhook::WebhookPublisher;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to deliver event: {0}")]
    Delivery(String),

    #[error("Failed to serialize event payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &VideoEvent) -> Result<(), PublishError>;
}
