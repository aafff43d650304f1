pub mod nats;

pub use nats::*;

// Re-export mocks when the testing feature is enabled
#[cfg(any(test, feature = "testing"))]
pub use nats::MockJetStreamPublisher;
