use crate::domain::{RelayResult, WeatherResponse, WeatherResponseProducer};
use async_trait::async_trait;
use common::nats::JetStreamPublisher;
use std::sync::Arc;
use tracing::{debug, info};

pub struct NatsWeatherResponseProducer {
    publisher: Arc<dyn JetStreamPublisher>,
    base_subject: String,
}

impl NatsWeatherResponseProducer {
    pub fn new(publisher: Arc<dyn JetStreamPublisher>, base_subject: String) -> Self {
        debug!(
            base_subject = %base_subject,
            "initialized NatsWeatherResponseProducer"
        );

        Self {
            publisher,
            base_subject,
        }
    }

    /// Subject the responses are published to: `{base_subject}.result`.
    /// The correlation id is caller-controlled and stays in the body; it is
    /// never spliced into the subject.
    fn subject(&self) -> String {
        format!("{}.result", self.base_subject)
    }
}

#[async_trait]
impl WeatherResponseProducer for NatsWeatherResponseProducer {
    async fn publish(&self, response: &WeatherResponse) -> RelayResult<()> {
        // UTF-8 JSON wire form: {"Value": ..., "CorrelationId": "..."}
        let payload = serde_json::to_vec(response).map_err(anyhow::Error::from)?;

        let subject = self.subject();

        info!(
            subject = %subject,
            correlation_id = %response.correlation_id,
            "publishing weather response"
        );

        self.publisher.publish(subject, payload.into()).await?;

        Ok(())
    }
}
