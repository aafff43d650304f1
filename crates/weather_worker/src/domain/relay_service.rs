use crate::domain::error::RelayResult;
use crate::domain::message::{WeatherRequest, WeatherResponse, WeatherResponseProducer};
use crate::domain::weather_provider::WeatherProvider;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Domain service that relays weather lookups from the input queue to the
/// output queue
///
/// Flow:
/// 1. Fetch the current weather report for the requested location
/// 2. Build a response carrying the report verbatim and the request's
///    correlation id unchanged
/// 3. Publish via the producer trait, exactly once
///
/// The service has no retry or backoff; a failure anywhere means no
/// response is published for this request. Failure handling (drop vs
/// redeliver) belongs to the queue adapter.
pub struct WeatherRelayService {
    provider: Arc<dyn WeatherProvider>,
    producer: Arc<dyn WeatherResponseProducer>,
}

impl WeatherRelayService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        producer: Arc<dyn WeatherResponseProducer>,
    ) -> Self {
        Self { provider, producer }
    }

    /// Process one weather request: fetch the report, publish the correlated response
    #[instrument(skip(self, request), fields(correlation_id = %request.correlation_id))]
    pub async fn process_request(&self, request: WeatherRequest) -> RelayResult<()> {
        info!(
            location = %request.location,
            correlation_id = %request.correlation_id,
            "processing weather request"
        );

        let report = self.provider.fetch_current(&request.location).await?;

        let response = WeatherResponse {
            value: report,
            correlation_id: request.correlation_id,
        };

        self.producer.publish(&response).await?;

        debug!(
            correlation_id = %response.correlation_id,
            "weather response published"
        );

        Ok(())
    }
}
