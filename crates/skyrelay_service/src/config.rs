use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use weather_worker::nats::FailurePolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // NATS configuration
    /// NATS server URL
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// NATS JetStream stream name for weather lookup requests
    #[serde(default = "default_weather_requests_stream")]
    pub weather_requests_stream: String,

    /// NATS subject pattern for the request consumer filter
    #[serde(default = "default_weather_requests_subject")]
    pub weather_requests_subject: String,

    /// Durable consumer name for the weather worker
    #[serde(default = "default_weather_consumer_name")]
    pub weather_consumer_name: String,

    /// NATS JetStream stream name for weather responses
    #[serde(default = "default_weather_responses_stream")]
    pub weather_responses_stream: String,

    /// Batch size for the request consumer
    #[serde(default = "default_nats_batch_size")]
    pub nats_batch_size: usize,

    /// Max wait time for batches in seconds
    #[serde(default = "default_nats_batch_wait_secs")]
    pub nats_batch_wait_secs: u64,

    /// Startup timeout for initialization operations in seconds
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,

    // Weather upstream configuration
    /// Base URL of the weather service
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,

    /// What to do with messages whose processing failed
    /// (drop_message | redeliver)
    #[serde(default = "default_failure_policy")]
    pub failure_policy: FailurePolicy,

    // Demo producer configuration
    /// Publish sample lookup requests on an interval
    #[serde(default = "default_demo_producer_enabled")]
    pub demo_producer_enabled: bool,

    /// Interval between demo requests in seconds
    #[serde(default = "default_demo_producer_interval_secs")]
    pub demo_producer_interval_secs: u64,

    // OpenTelemetry configuration
    /// OpenTelemetry OTLP endpoint (gRPC)
    #[serde(default = "default_otel_endpoint")]
    pub otel_endpoint: String,

    /// Enable OpenTelemetry export
    #[serde(default = "default_otel_enabled")]
    pub otel_enabled: bool,

    /// Service name for the OpenTelemetry resource
    #[serde(default = "default_otel_service_name")]
    pub otel_service_name: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

// NATS defaults
fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_weather_requests_stream() -> String {
    "weather_requests".to_string()
}

fn default_weather_requests_subject() -> String {
    "weather_requests.>".to_string()
}

fn default_weather_consumer_name() -> String {
    "weather-relay-worker".to_string()
}

fn default_weather_responses_stream() -> String {
    "weather_responses".to_string()
}

fn default_nats_batch_size() -> usize {
    10
}

fn default_nats_batch_wait_secs() -> u64 {
    5
}

fn default_startup_timeout_secs() -> u64 {
    30
}

// Weather upstream defaults
fn default_weather_base_url() -> String {
    "https://wttr.in".to_string()
}

fn default_failure_policy() -> FailurePolicy {
    FailurePolicy::DropMessage
}

// Demo producer defaults
fn default_demo_producer_enabled() -> bool {
    false
}

fn default_demo_producer_interval_secs() -> u64 {
    5
}

// OpenTelemetry defaults
fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_otel_enabled() -> bool {
    false
}

fn default_otel_service_name() -> String {
    "skyrelay".to_string()
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("SKYRELAY"))
            .build()?
            .try_deserialize()
    }
}
