use crate::{EventPublisher, PublishError, VideoEvent};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Test publisher that records every event, or fails on demand to exercise
/// the degraded-success path.
#[derive(Default)]
pub struct CapturingPublisher {
    events: Mutex<Vec<VideoEvent>>,
    fail: AtomicBool,
}

impl CapturingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<VideoEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl EventPublisher for CapturingPublisher {
    async fn publish(&self, event: &VideoEvent) -> Result<(), PublishError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::Delivery("injected failure".to_string()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
