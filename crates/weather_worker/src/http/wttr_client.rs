use crate::domain::{RelayError, RelayResult, WeatherProvider, WeatherReport};
use async_trait::async_trait;
use tracing::debug;

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://wttr.in";

/// Weather provider backed by the wttr.in JSON API
///
/// One GET per lookup, transport defaults only: no retry, no timeout
/// override, no authentication.
pub struct WttrClient {
    http: reqwest::Client,
    base_url: String,
}

impl WttrClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Build the lookup URL. The location lands in the path as-is; wttr.in
    /// accepts free-form place names and the client's URL parser handles
    /// percent-encoding.
    fn request_url(&self, location: &str) -> String {
        format!("{}/{}?format=j1", self.base_url, location)
    }
}

#[async_trait]
impl WeatherProvider for WttrClient {
    async fn fetch_current(&self, location: &str) -> RelayResult<WeatherReport> {
        let url = self.request_url(location);
        debug!(url = %url, "requesting current weather");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RelayError::Upstream(e.to_string()))?;

        // The body is decoded whatever the status code; wttr.in serves JSON
        // error documents too, and a non-JSON body surfaces as Upstream
        response
            .json::<WeatherReport>()
            .await
            .map_err(|e| RelayError::Upstream(e.to_string()))
    }
}


// Note: the fetch path needs a live HTTP endpoint and is exercised through
// the service-level tests with a fake provider; see tests/ in this crate.
