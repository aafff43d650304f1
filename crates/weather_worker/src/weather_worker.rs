use crate::domain::WeatherRelayService;
use crate::http::WttrClient;
use crate::nats::{
    create_weather_request_processor, FailurePolicy, NatsWeatherResponseProducer,
};
use common::nats::{NatsClient, NatsConsumer};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct WeatherWorkerConfig {
    pub requests_stream: String,
    pub requests_subject: String,
    pub consumer_name: String,
    pub responses_stream: String,
    pub nats_batch_size: usize,
    pub nats_batch_wait_secs: u64,
    pub weather_base_url: String,
    pub failure_policy: FailurePolicy,
}

pub struct WeatherWorker {
    consumer: NatsConsumer,
}

impl WeatherWorker {
    pub async fn new(
        nats_client: Arc<NatsClient>,
        config: WeatherWorkerConfig,
    ) -> anyhow::Result<Self> {
        info!("Initializing weather relay worker");

        let provider = Arc::new(WttrClient::new(config.weather_base_url));

        let publisher = nats_client.create_publisher_client();
        let producer = Arc::new(NatsWeatherResponseProducer::new(
            publisher,
            config.responses_stream.clone(),
        ));

        let service = Arc::new(WeatherRelayService::new(provider, producer));

        // Explicit trigger-to-handler binding, resolved here at startup
        let processor = create_weather_request_processor(service, config.failure_policy);
        let consumer = NatsConsumer::new(
            nats_client.jetstream(),
            &config.requests_stream,
            &config.consumer_name,
            &config.requests_subject,
            config.nats_batch_size,
            config.nats_batch_wait_secs,
            processor,
        )
        .await?;

        info!("Weather relay worker initialized");

        Ok(Self { consumer })
    }

    pub fn into_runner_process(
        self,
    ) -> Box<
        dyn FnOnce(
                CancellationToken,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>,
            > + Send,
    > {
        let consumer = self.consumer;
        Box::new(move |ctx| Box::pin(async move { consumer.run(ctx).await }))
    }
}
