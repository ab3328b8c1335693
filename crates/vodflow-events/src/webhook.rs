use crate::{EventPublisher, PublishError, VideoEvent};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Vodflow-Signature";
pub const EVENT_HEADER: &str = "X-Vodflow-Event";

/// Delivers events as signed HTTP POSTs to a single configured endpoint.
pub struct WebhookPublisher {
    client: reqwest::Client,
    url: String,
    secret: String,
}

impl WebhookPublisher {
    pub fn new(url: String, secret: String, timeout_seconds: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .unwrap_or_default();

        Self {
            client,
            url,
            secret,
        }
    }

    fn sign(&self, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }
}

#[async_trait]
impl EventPublisher for WebhookPublisher {
    #[tracing::instrument(skip(self, event), fields(topic = event.topic.as_str()))]
    async fn publish(&self, event: &VideoEvent) -> Result<(), PublishError> {
        let body = serde_json::to_vec(&event.payload)?;
        let signature = self.sign(&body);

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header(EVENT_HEADER, event.topic.as_str())
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await
            .map_err(|e| PublishError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Delivery(format!(
                "webhook endpoint returned {}",
                status
            )));
        }

        tracing::debug!(status = %status, "Webhook delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_stable_hex() {
        let publisher =
            WebhookPublisher::new("http://example.test/hook".to_string(), "s3cret".to_string(), 5);
        let sig = publisher.sign(b"payload");
        assert_eq!(sig.len(), 64);
        assert_eq!(sig, publisher.sign(b"payload"));
        assert_ne!(sig, publisher.sign(b"other"));
    }
}
