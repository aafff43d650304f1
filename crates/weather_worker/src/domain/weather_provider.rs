use crate::domain::error::RelayResult;
use crate::domain::message::WeatherReport;
use async_trait::async_trait;

/// Trait for fetching current weather data for a location
///
/// Implementations should:
/// - Perform a single lookup against the upstream weather service
/// - Return the response document as-is, without interpreting its fields
/// - Map transport failures and undecodable bodies to `RelayError::Upstream`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch_current(&self, location: &str) -> RelayResult<WeatherReport>;
}
