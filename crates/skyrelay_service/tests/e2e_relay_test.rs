#![cfg(feature = "integration-tests")]

use async_trait::async_trait;
use common::nats::{JetStreamPublisher as _, NatsClient, NatsConsumer};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{GenericImage, ImageExt};
use tokio_util::sync::CancellationToken;
use weather_worker::domain::{
    RelayResult, WeatherProvider, WeatherRelayService, WeatherReport,
};
use weather_worker::nats::{
    create_weather_request_processor, FailurePolicy, NatsWeatherResponseProducer,
};

/// Provider stub so the pipeline runs without reaching wttr.in
struct CannedWeatherProvider {
    report: WeatherReport,
}

#[async_trait]
impl WeatherProvider for CannedWeatherProvider {
    async fn fetch_current(&self, _location: &str) -> RelayResult<WeatherReport> {
        Ok(self.report.clone())
    }
}

#[tokio::test]
async fn test_relay_round_trip_through_jetstream() -> anyhow::Result<()> {
    // Start a NATS server with JetStream enabled
    let container = GenericImage::new("nats", "2.10")
        .with_exposed_port(4222.tcp())
        .with_wait_for(WaitFor::message_on_stderr("Server is ready"))
        .with_cmd(["--jetstream"])
        .start()
        .await?;

    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(4222).await?;
    let url = format!("nats://{}:{}", host, port);

    let client = Arc::new(NatsClient::connect(&url, Duration::from_secs(30)).await?);
    client
        .ensure_stream("weather_requests", "Weather lookup requests awaiting relay")
        .await?;
    client
        .ensure_stream("weather_responses", "Correlated weather responses")
        .await?;

    // Assemble the worker with a canned upstream
    let report = serde_json::json!({"current_condition": [{"temp_C": "18"}]});
    let provider = Arc::new(CannedWeatherProvider {
        report: report.clone(),
    });
    let producer = Arc::new(NatsWeatherResponseProducer::new(
        client.create_publisher_client(),
        "weather_responses".to_string(),
    ));
    let service = Arc::new(WeatherRelayService::new(provider, producer));

    let processor = create_weather_request_processor(service, FailurePolicy::DropMessage);
    let consumer = NatsConsumer::new(
        client.jetstream(),
        "weather_requests",
        "e2e-weather-worker",
        "weather_requests.>",
        10,
        1,
        processor,
    )
    .await?;

    let token = CancellationToken::new();
    let consumer_handle = tokio::spawn({
        let token = token.clone();
        async move { consumer.run(token).await }
    });

    // Publish one lookup request onto the input stream
    client
        .create_publisher_client()
        .publish(
            "weather_requests.lookup".to_string(),
            serde_json::to_vec(
                &serde_json::json!({"location": "Paris", "CorrelationId": "abc-123"}),
            )?
            .into(),
        )
        .await?;

    // Read the correlated response back off the output stream
    let response_consumer = client
        .jetstream()
        .get_stream("weather_responses")
        .await?
        .create_consumer(async_nats::jetstream::consumer::pull::Config {
            durable_name: Some("e2e-response-reader".to_string()),
            ..Default::default()
        })
        .await?;

    let mut messages = response_consumer
        .fetch()
        .max_messages(1)
        .expires(Duration::from_secs(20))
        .messages()
        .await?;

    let message = tokio::time::timeout(Duration::from_secs(30), messages.next())
        .await?
        .expect("no weather response arrived")?;

    let body: serde_json::Value = serde_json::from_slice(&message.payload)?;
    assert_eq!(body["CorrelationId"], "abc-123");
    assert_eq!(body["Value"], report);

    token.cancel();
    consumer_handle.await??;
    Ok(())
}
