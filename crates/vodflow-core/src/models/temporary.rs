use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Short-lived record mapping a (user, video) identity to its staged artifact
/// URLs. Exclusively owned by the temporary video registry: created at the end
/// of the upload step, retired by finalization or by the expiry sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct TemporaryVideo {
    pub user_id: String,
    pub video_id: String,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TemporaryVideo {
    pub fn new(user_id: &str, video_id: &str, video_url: &str, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            video_id: video_id.to_string(),
            video_url: video_url.to_string(),
            thumbnail_url: None,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
        }
    }

    /// An expired-but-not-yet-swept record is treated as absent everywhere.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_at_is_created_at_plus_ttl() {
        let record = TemporaryVideo::new("u1", "v1", "http://cdn/v1/master.m3u8", 600);
        assert_eq!(record.expires_at - record.created_at, Duration::seconds(600));
        assert!(record.thumbnail_url.is_none());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let record = TemporaryVideo::new("u1", "v1", "http://cdn/v1/master.m3u8", 0);
        assert!(record.is_expired_at(record.created_at + Duration::milliseconds(1)));
        assert!(!record.is_expired_at(record.created_at));
    }
}
