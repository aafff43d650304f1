use crate::domain::WeatherRequest;
use anyhow::Result;
use common::nats::JetStreamPublisher;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Configuration for the demo request producer
pub struct DemoRequestProducerConfig {
    /// Interval between published lookups
    pub interval: Duration,
    /// Locations cycled through, one per tick
    pub locations: Vec<String>,
}

impl Default for DemoRequestProducerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            locations: vec![
                "Paris".to_string(),
                "London".to_string(),
                "Tokyo".to_string(),
                "New York".to_string(),
            ],
        }
    }
}

/// Run a demo producer that publishes sample weather lookup requests
///
/// Publishes one request per interval with a fresh correlation id until a
/// cancellation signal is received. Useful for exercising the relay
/// pipeline locally without a real requester on the input queue.
pub async fn run_demo_request_producer(
    ctx: CancellationToken,
    config: DemoRequestProducerConfig,
    publisher: Arc<dyn JetStreamPublisher>,
    subject: String,
) -> Result<()> {
    info!(subject = %subject, "demo request producer started");

    let mut tick = 0usize;

    loop {
        tokio::select! {
            _ = ctx.cancelled() => {
                info!("received shutdown signal, stopping demo request producer");
                break;
            }
            _ = tokio::time::sleep(config.interval) => {
                let location = config.locations[tick % config.locations.len()].clone();
                tick += 1;

                let request = WeatherRequest {
                    location,
                    correlation_id: xid::new().to_string(),
                };

                let payload = serde_json::to_vec(&request)?;

                match publisher.publish(subject.clone(), payload.into()).await {
                    Ok(_) => {
                        debug!(
                            location = %request.location,
                            correlation_id = %request.correlation_id,
                            "published demo weather request"
                        );
                    }
                    Err(e) => {
                        error!(
                            location = %request.location,
                            error = %e,
                            "failed to publish demo weather request"
                        );
                    }
                }
            }
        }
    }

    info!("demo request producer stopped gracefully");
    Ok(())
}
