use crate::domain::error::{RelayError, RelayResult};
use crate::domain::validate::validate_struct;
use async_trait::async_trait;
use garde::Validate;
use serde::{Deserialize, Serialize};

/// Current weather data returned by the upstream service. The worker never
/// looks inside it; the document is relayed verbatim.
pub type WeatherReport = serde_json::Value;

/// A weather lookup request pulled off the input queue.
///
/// The wire body is UTF-8 JSON with the exact keys `location` and
/// `CorrelationId`; both must be present and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WeatherRequest {
    #[garde(length(min = 1))]
    pub location: String,

    #[serde(rename = "CorrelationId")]
    #[garde(length(min = 1))]
    pub correlation_id: String,
}

impl WeatherRequest {
    /// Decode and validate a request from a raw queue message body
    pub fn from_bytes(payload: &[u8]) -> RelayResult<Self> {
        let request: WeatherRequest = serde_json::from_slice(payload)
            .map_err(|e| RelayError::MalformedInput(e.to_string()))?;
        validate_struct(&request)?;
        Ok(request)
    }
}

/// The correlated response published to the output queue.
///
/// Wire body: `{"Value": <upstream JSON>, "CorrelationId": "<echoed>"}`.
/// Nothing else is ever added; two responses built from the same request
/// and report are byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(rename = "Value")]
    pub value: WeatherReport,

    #[serde(rename = "CorrelationId")]
    pub correlation_id: String,
}

/// Trait for publishing weather responses to the output queue
///
/// Implementations should:
/// - Serialize the response to its UTF-8 JSON wire form
/// - Publish to the output channel exactly once
/// - Return an error if the publish fails
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherResponseProducer: Send + Sync {
    async fn publish(&self, response: &WeatherResponse) -> RelayResult<()>;
}
