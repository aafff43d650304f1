use anyhow::Result;
use async_trait::async_trait;

/// Trait for JetStream publisher operations
/// Abstracts the publish side of a JetStream connection so producers can be
/// exercised without a live broker
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait JetStreamPublisher: Send + Sync {
    /// Publish a message to a subject and await the JetStream acknowledgment
    async fn publish(&self, subject: String, payload: bytes::Bytes) -> Result<()>;
}
