use anyhow::{Context, Result};
use async_nats::jetstream::{self, consumer::PullConsumer, Message};
use futures::{future::BoxFuture, StreamExt};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Result of processing a batch of messages
/// Provides fine-grained control over which messages to acknowledge vs reject
#[derive(Debug)]
pub struct ProcessingResult {
    /// Indices of messages that were handled and should be acknowledged (Ack)
    pub ack: Vec<usize>,
    /// Indices of messages to reject (Nak) with optional error details
    pub nak: Vec<(usize, Option<String>)>,
}

impl ProcessingResult {
    /// Create a result where all messages should be acknowledged
    pub fn ack_all(count: usize) -> Self {
        Self {
            ack: (0..count).collect(),
            nak: Vec::new(),
        }
    }

    /// Create a result where all messages should be rejected
    pub fn nak_all(count: usize, error: Option<String>) -> Self {
        Self {
            ack: Vec::new(),
            nak: (0..count).map(|i| (i, error.clone())).collect(),
        }
    }
}

/// Type alias for the batch processor function
/// Takes a slice of raw NATS messages and returns a ProcessingResult
/// The processor owns deserialization and business logic
pub type BatchProcessor =
    Box<dyn Fn(&[Message]) -> BoxFuture<'static, Result<ProcessingResult>> + Send + Sync>;

/// Generic NATS JetStream consumer that processes batches of messages
/// The consumer handles fetching, acknowledgments, and error handling;
/// everything message-specific is delegated to the processor function
pub struct NatsConsumer {
    consumer: PullConsumer,
    stream_name: String,
    consumer_name: String,
    batch_size: usize,
    max_wait: Duration,
    processor: BatchProcessor,
}

impl NatsConsumer {
    pub async fn new(
        jetstream: &jetstream::Context,
        stream_name: &str,
        consumer_name: &str,
        subject_filter: &str,
        batch_size: usize,
        max_wait_secs: u64,
        processor: BatchProcessor,
    ) -> Result<Self> {
        debug!(
            stream = %stream_name,
            consumer = %consumer_name,
            filter_subject = %subject_filter,
            "creating JetStream consumer"
        );

        // Create or look up the durable consumer
        let consumer = jetstream
            .create_consumer_on_stream(
                jetstream::consumer::pull::Config {
                    name: Some(consumer_name.to_string()),
                    durable_name: Some(consumer_name.to_string()),
                    filter_subject: subject_filter.to_string(),
                    ack_policy: jetstream::consumer::AckPolicy::Explicit,
                    ..Default::default()
                },
                stream_name,
            )
            .await
            .context("Failed to create consumer")?;

        info!(
            stream = %stream_name,
            consumer = %consumer_name,
            "consumer created successfully"
        );

        Ok(Self {
            consumer,
            stream_name: stream_name.to_string(),
            consumer_name: consumer_name.to_string(),
            batch_size,
            max_wait: Duration::from_secs(max_wait_secs),
            processor,
        })
    }

    /// Run the consumer loop until cancellation
    pub async fn run(&self, ctx: CancellationToken) -> Result<()> {
        info!(
            stream = %self.stream_name,
            consumer = %self.consumer_name,
            "starting consumer loop"
        );

        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    info!(
                        stream = %self.stream_name,
                        consumer = %self.consumer_name,
                        "received shutdown signal, stopping consumer"
                    );
                    break;
                }
                result = self.fetch_and_process_batch() => {
                    if let Err(e) = result {
                        error!(
                            stream = %self.stream_name,
                            consumer = %self.consumer_name,
                            error = %e,
                            "error processing batch"
                        );
                        // Continue processing despite errors
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }

        info!(
            stream = %self.stream_name,
            consumer = %self.consumer_name,
            "consumer stopped gracefully"
        );
        Ok(())
    }

    async fn fetch_and_process_batch(&self) -> Result<()> {
        debug!(
            batch_size = self.batch_size,
            max_wait_secs = self.max_wait.as_secs(),
            "fetching message batch"
        );

        let mut messages = self
            .consumer
            .fetch()
            .max_messages(self.batch_size)
            .expires(self.max_wait)
            .messages()
            .await
            .context("Failed to fetch messages")?;

        let mut raw_messages = Vec::new();

        while let Some(result) = messages.next().await {
            match result {
                Ok(msg) => raw_messages.push(msg),
                Err(e) => {
                    warn!(error = %e, "error receiving message from batch");
                }
            }
        }

        if raw_messages.is_empty() {
            debug!("no messages in batch");
            return Ok(());
        }

        debug!(message_count = raw_messages.len(), "received message batch");

        // The processor owns deserialization and business logic; a processor
        // error rejects the whole batch
        let processing_result = match (self.processor)(&raw_messages).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "processor returned error, rejecting all messages");
                ProcessingResult::nak_all(raw_messages.len(), Some(e.to_string()))
            }
        };

        self.resolve_acknowledgments(&raw_messages, processing_result)
            .await;

        Ok(())
    }

    async fn resolve_acknowledgments(&self, messages: &[Message], result: ProcessingResult) {
        let ack_count = result.ack.len();
        for idx in result.ack {
            let Some(msg) = messages.get(idx) else {
                warn!(
                    message_index = idx,
                    batch_size = messages.len(),
                    "invalid ack index in ProcessingResult"
                );
                continue;
            };
            if let Err(e) = msg.ack().await {
                error!(error = %e, message_index = idx, "failed to acknowledge message");
            }
        }
        if ack_count > 0 {
            debug!(ack_count, "acknowledged messages");
        }

        let nak_count = result.nak.len();
        for (idx, error_msg) in result.nak {
            let Some(msg) = messages.get(idx) else {
                warn!(
                    message_index = idx,
                    batch_size = messages.len(),
                    "invalid nak index in ProcessingResult"
                );
                continue;
            };

            if let Some(err) = error_msg {
                warn!(
                    message_index = idx,
                    subject = %msg.subject,
                    error = %err,
                    "rejecting message for redelivery"
                );
            } else {
                warn!(
                    message_index = idx,
                    subject = %msg.subject,
                    "rejecting message for redelivery"
                );
            }

            if let Err(e) = msg.ack_with(jetstream::AckKind::Nak(None)).await {
                error!(error = %e, message_index = idx, "failed to reject message");
            }
        }
        if nak_count > 0 {
            debug!(nak_count, "rejected messages for redelivery");
        }
    }
}
