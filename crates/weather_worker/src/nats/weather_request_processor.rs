use crate::domain::{RelayError, WeatherRelayService, WeatherRequest};
use async_nats::jetstream::Message;
use common::nats::{BatchProcessor, ProcessingResult};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error};

/// What happens to a queue message whose processing failed.
///
/// Whether failed lookups should be retried is a deployment decision, so
/// both behaviors are selectable. With `Redeliver`, a permanently
/// malformed body keeps coming back until the stream's own delivery limit
/// cuts it off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Acknowledge the message despite the failure. It is dropped from the
    /// queue and the error is visible only in logs.
    DropMessage,
    /// Reject the message so the queue redelivers it under its own policy.
    Redeliver,
}

/// Create a BatchProcessor that runs weather requests through the domain
/// service.
///
/// This is the whole trigger-to-handler binding: the returned processor is
/// handed to a `NatsConsumer` at startup, nothing is registered globally.
pub fn create_weather_request_processor(
    service: Arc<WeatherRelayService>,
    failure_policy: FailurePolicy,
) -> BatchProcessor {
    Box::new(move |messages: &[Message]| {
        let service = Arc::clone(&service);

        // Extract payloads and subjects before moving into the async block;
        // Message borrows from the slice
        let message_data: Vec<(usize, Vec<u8>, String)> = messages
            .iter()
            .enumerate()
            .map(|(idx, msg)| (idx, msg.payload.to_vec(), msg.subject.to_string()))
            .collect();

        Box::pin(async move {
            let mut ack = Vec::new();
            let mut nak = Vec::new();

            for (idx, payload, subject) in message_data {
                // Decode and validate the request body
                let request = match WeatherRequest::from_bytes(&payload) {
                    Ok(request) => request,
                    Err(e) => {
                        error!(
                            error = %e,
                            subject = %subject,
                            "failed to decode weather request"
                        );
                        resolve_failure(failure_policy, idx, &e, &mut ack, &mut nak);
                        continue;
                    }
                };

                // Process through the domain service
                match service.process_request(request).await {
                    Ok(()) => {
                        debug!(index = idx, "successfully processed weather request");
                        ack.push(idx);
                    }
                    Err(e) => {
                        error!(
                            error = %e,
                            index = idx,
                            subject = %subject,
                            "failed to process weather request"
                        );
                        resolve_failure(failure_policy, idx, &e, &mut ack, &mut nak);
                    }
                }
            }

            Ok(ProcessingResult { ack, nak })
        })
    })
}

fn resolve_failure(
    policy: FailurePolicy,
    idx: usize,
    error: &RelayError,
    ack: &mut Vec<usize>,
    nak: &mut Vec<(usize, Option<String>)>,
) {
    match policy {
        FailurePolicy::DropMessage => ack.push(idx),
        FailurePolicy::Redeliver => nak.push((idx, Some(error.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_message_acks_the_failure() {
        let mut ack = Vec::new();
        let mut nak = Vec::new();
        let error = RelayError::Upstream("dns failure".to_string());

        resolve_failure(FailurePolicy::DropMessage, 3, &error, &mut ack, &mut nak);

        assert_eq!(ack, vec![3]);
        assert!(nak.is_empty());
    }

    #[test]
    fn test_redeliver_naks_with_reason() {
        let mut ack = Vec::new();
        let mut nak = Vec::new();
        let error = RelayError::MalformedInput("missing field `location`".to_string());

        resolve_failure(FailurePolicy::Redeliver, 0, &error, &mut ack, &mut nak);

        assert!(ack.is_empty());
        assert_eq!(nak.len(), 1);
        let (idx, reason) = &nak[0];
        assert_eq!(*idx, 0);
        assert!(reason.as_ref().unwrap().contains("missing field"));
    }

    #[test]
    fn test_failure_policy_deserializes_from_config_strings() {
        let policy: FailurePolicy = serde_json::from_str(r#""drop_message""#).unwrap();
        assert_eq!(policy, FailurePolicy::DropMessage);

        let policy: FailurePolicy = serde_json::from_str(r#""redeliver""#).unwrap();
        assert_eq!(policy, FailurePolicy::Redeliver);
    }
}

// Note: exercising the processor itself needs real NATS Message values,
// which cannot be built without a live connection. The decode-and-process
// flow is covered by the service tests in tests/ and the gated e2e test in
// the skyrelay_service crate.
