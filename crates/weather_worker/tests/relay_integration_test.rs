use std::sync::Arc;
use weather_worker::domain::{
    RelayError, RelayResult, WeatherProvider, WeatherRelayService, WeatherReport, WeatherRequest,
    WeatherResponse, WeatherResponseProducer,
};

// In-memory fakes for exercising the full relay flow
mod fakes {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider returning a canned report, or a canned failure
    pub struct CannedWeatherProvider {
        report: Option<WeatherReport>,
        error: Option<String>,
    }

    impl CannedWeatherProvider {
        pub fn with_report(report: WeatherReport) -> Self {
            Self {
                report: Some(report),
                error: None,
            }
        }

        pub fn with_failure(description: &str) -> Self {
            Self {
                report: None,
                error: Some(description.to_string()),
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for CannedWeatherProvider {
        async fn fetch_current(&self, _location: &str) -> RelayResult<WeatherReport> {
            match (&self.report, &self.error) {
                (Some(report), _) => Ok(report.clone()),
                (None, Some(error)) => Err(RelayError::Upstream(error.clone())),
                (None, None) => unreachable!(),
            }
        }
    }

    #[derive(Clone)]
    pub struct InMemoryResponseProducer {
        published: Arc<Mutex<Vec<WeatherResponse>>>,
    }

    impl InMemoryResponseProducer {
        pub fn new() -> Self {
            Self {
                published: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn get_published(&self) -> Vec<WeatherResponse> {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherResponseProducer for InMemoryResponseProducer {
        async fn publish(&self, response: &WeatherResponse) -> RelayResult<()> {
            let mut published = self.published.lock().unwrap();
            published.push(response.clone());
            Ok(())
        }
    }
}

fn service_with(
    provider: fakes::CannedWeatherProvider,
    producer: fakes::InMemoryResponseProducer,
) -> WeatherRelayService {
    WeatherRelayService::new(Arc::new(provider), Arc::new(producer))
}

#[tokio::test]
async fn test_well_formed_request_emits_exactly_one_correlated_response() {
    // Arrange
    let report = serde_json::json!({"current_condition": [{"temp_C": "18"}]});
    let producer = fakes::InMemoryResponseProducer::new();
    let service = service_with(
        fakes::CannedWeatherProvider::with_report(report.clone()),
        producer.clone(),
    );

    let request =
        WeatherRequest::from_bytes(br#"{"location":"Paris","CorrelationId":"abc-123"}"#).unwrap();

    // Act
    let result = service.process_request(request).await;

    // Assert
    assert!(result.is_ok());

    let published = producer.get_published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].correlation_id, "abc-123");
    assert_eq!(published[0].value, report);
}

#[tokio::test]
async fn test_reference_scenario_wire_bodies() {
    // input {"location":"Paris","CorrelationId":"abc-123"} with upstream
    // {"current_condition":[{"temp_C":"18"}]} must come out as
    // {"Value":{"current_condition":[{"temp_C":"18"}]},"CorrelationId":"abc-123"}
    let report = serde_json::json!({"current_condition": [{"temp_C": "18"}]});
    let producer = fakes::InMemoryResponseProducer::new();
    let service = service_with(
        fakes::CannedWeatherProvider::with_report(report),
        producer.clone(),
    );

    let request =
        WeatherRequest::from_bytes(br#"{"location":"Paris","CorrelationId":"abc-123"}"#).unwrap();
    service.process_request(request).await.unwrap();

    let published = producer.get_published();
    let body = serde_json::to_string(&published[0]).unwrap();
    assert_eq!(
        body,
        r#"{"Value":{"current_condition":[{"temp_C":"18"}]},"CorrelationId":"abc-123"}"#
    );
}

#[tokio::test]
async fn test_missing_location_emits_nothing() {
    // {"CorrelationId":"xyz"} has no location; decoding fails before the
    // service ever runs, and nothing reaches the output queue
    let result = WeatherRequest::from_bytes(br#"{"CorrelationId":"xyz"}"#);

    match result {
        Err(RelayError::MalformedInput(msg)) => assert!(msg.contains("location")),
        other => panic!("expected MalformedInput, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upstream_failure_emits_nothing() {
    // Arrange
    let producer = fakes::InMemoryResponseProducer::new();
    let service = service_with(
        fakes::CannedWeatherProvider::with_failure("connection refused"),
        producer.clone(),
    );

    let request =
        WeatherRequest::from_bytes(br#"{"location":"Paris","CorrelationId":"abc-123"}"#).unwrap();

    // Act
    let result = service.process_request(request).await;

    // Assert: the failure description survives, and no response was emitted
    match result {
        Err(RelayError::Upstream(msg)) => assert!(msg.contains("connection refused")),
        other => panic!("expected Upstream, got {:?}", other),
    }
    assert_eq!(producer.get_published().len(), 0);
}

#[tokio::test]
async fn test_report_is_relayed_without_transformation() {
    // A deep, mixed-shape document must come through untouched
    let report = serde_json::json!({
        "current_condition": [{"temp_C": "18", "humidity": "62"}],
        "nearest_area": [{"areaName": [{"value": "Paris"}], "latitude": "48.867"}],
        "weather": [{"date": "2024-05-01", "hourly": [{"tempC": "15"}]}],
        "request": [{"query": "Lat 48.87 and Lon 2.33", "type": "LatLon"}]
    });
    let producer = fakes::InMemoryResponseProducer::new();
    let service = service_with(
        fakes::CannedWeatherProvider::with_report(report.clone()),
        producer.clone(),
    );

    let request =
        WeatherRequest::from_bytes(br#"{"location":"Paris","CorrelationId":"deep-1"}"#).unwrap();
    service.process_request(request).await.unwrap();

    assert_eq!(producer.get_published()[0].value, report);
}

#[tokio::test]
async fn test_identical_inputs_yield_identical_responses() {
    // No hidden timestamps or nonces: processing the same request twice
    // against the same report produces structurally identical output
    let report = serde_json::json!({"current_condition": [{"temp_C": "18"}]});
    let producer = fakes::InMemoryResponseProducer::new();
    let service = service_with(
        fakes::CannedWeatherProvider::with_report(report),
        producer.clone(),
    );

    let raw = br#"{"location":"Paris","CorrelationId":"abc-123"}"#;
    service
        .process_request(WeatherRequest::from_bytes(raw).unwrap())
        .await
        .unwrap();
    service
        .process_request(WeatherRequest::from_bytes(raw).unwrap())
        .await
        .unwrap();

    let published = producer.get_published();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0], published[1]);
    assert_eq!(
        serde_json::to_vec(&published[0]).unwrap(),
        serde_json::to_vec(&published[1]).unwrap()
    );
}
