use serde::{Deserialize, Serialize};
use vodflow_core::models::VideoSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventTopic {
    VideoCreated,
    VideoUpdated,
}

impl EventTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTopic::VideoCreated => "video-created",
            EventTopic::VideoUpdated => "video-updated",
        }
    }
}

/// A published catalog change. The payload is the full post-commit snapshot,
/// so consumers never need a follow-up read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEvent {
    pub topic: EventTopic,
    pub payload: VideoSnapshot,
}

impl VideoEvent {
    pub fn created(payload: VideoSnapshot) -> Self {
        Self {
            topic: EventTopic::VideoCreated,
            payload,
        }
    }

    pub fn updated(payload: VideoSnapshot) -> Self {
        Self {
            topic: EventTopic::VideoUpdated,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_wire_names() {
        assert_eq!(EventTopic::VideoCreated.as_str(), "video-created");
        assert_eq!(EventTopic::VideoUpdated.as_str(), "video-updated");
        assert_eq!(
            serde_json::to_string(&EventTopic::VideoUpdated).unwrap(),
            "\"video-updated\""
        );
    }
}
