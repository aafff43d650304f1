mod config;
mod telemetry;

use common::nats::NatsClient;
use config::ServiceConfig;
use skyrelay_runner::Runner;
use std::sync::Arc;
use std::time::Duration;
use telemetry::{init_telemetry, shutdown_telemetry, TelemetryConfig, TelemetryProviders};
use tracing::{debug, error, info};
use weather_worker::nats::{run_demo_request_producer, DemoRequestProducerConfig};
use weather_worker::weather_worker::{WeatherWorker, WeatherWorkerConfig};

#[tokio::main]
async fn main() {
    // Initialize configuration and tracing
    let config = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let telemetry_providers: Option<TelemetryProviders> = match init_telemetry(&TelemetryConfig {
        service_name: config.otel_service_name.clone(),
        otel_endpoint: config.otel_endpoint.clone(),
        otel_enabled: config.otel_enabled,
        log_level: config.log_level.clone(),
    }) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Failed to initialize telemetry: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        nats_url = %config.nats_url,
        requests_stream = %config.weather_requests_stream,
        responses_stream = %config.weather_responses_stream,
        failure_policy = ?config.failure_policy,
        "Starting skyrelay service"
    );
    debug!("Configuration: {:?}", config);

    // NATS initialization
    let nats_client = match NatsClient::connect(
        &config.nats_url,
        Duration::from_secs(config.startup_timeout_secs),
    )
    .await
    {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to connect to NATS: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = ensure_streams(&nats_client, &config).await {
        error!("Failed to ensure NATS streams: {}", e);
        std::process::exit(1);
    }

    // Initialize the weather relay worker
    let weather_worker = match WeatherWorker::new(
        nats_client.clone(),
        WeatherWorkerConfig {
            requests_stream: config.weather_requests_stream.clone(),
            requests_subject: config.weather_requests_subject.clone(),
            consumer_name: config.weather_consumer_name.clone(),
            responses_stream: config.weather_responses_stream.clone(),
            nats_batch_size: config.nats_batch_size,
            nats_batch_wait_secs: config.nats_batch_wait_secs,
            weather_base_url: config.weather_base_url.clone(),
            failure_policy: config.failure_policy,
        },
    )
    .await
    {
        Ok(worker) => worker,
        Err(e) => {
            error!("Failed to initialize weather worker: {}", e);
            std::process::exit(1);
        }
    };

    // Build runner with all processes
    let mut runner = Runner::new();

    runner = runner.with_named_process("weather_worker", weather_worker.into_runner_process());

    if config.demo_producer_enabled {
        let publisher = nats_client.create_publisher_client();
        let subject = format!("{}.lookup", config.weather_requests_stream);
        let demo_config = DemoRequestProducerConfig {
            interval: Duration::from_secs(config.demo_producer_interval_secs),
            ..Default::default()
        };

        runner = runner.with_named_process(
            "demo_request_producer",
            Box::new(move |ctx| {
                Box::pin(run_demo_request_producer(
                    ctx,
                    demo_config,
                    publisher,
                    subject,
                ))
            }),
        );
    }

    // Add cleanup handlers
    runner = runner
        .with_closer({
            let nats_for_close = Arc::clone(&nats_client);
            move || {
                Box::pin(async move {
                    info!("Running cleanup tasks...");
                    if let Ok(client) = Arc::try_unwrap(nats_for_close) {
                        client.close().await;
                    }

                    // Shutdown telemetry and flush pending traces and logs
                    shutdown_telemetry(telemetry_providers);

                    info!("Cleanup complete");
                    Ok(())
                })
            }
        })
        .with_closer_timeout(Duration::from_secs(10));

    // Run the service
    runner.run().await;
}

async fn ensure_streams(client: &NatsClient, config: &ServiceConfig) -> anyhow::Result<()> {
    client
        .ensure_stream(
            &config.weather_requests_stream,
            "Weather lookup requests awaiting relay",
        )
        .await?;
    client
        .ensure_stream(
            &config.weather_responses_stream,
            "Correlated weather responses",
        )
        .await?;
    Ok(())
}
