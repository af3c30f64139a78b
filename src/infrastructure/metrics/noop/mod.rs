// src/infrastructure/metrics/noop/mod.rs
mod noop_consumer;
mod noop_metrics;
mod noop_publisher;

pub use noop_consumer::NoopConsumer;
pub use noop_metrics::NoopMetrics;
pub use noop_publisher::NoopPublisher;

use crate::config::InstrumentorConfig;
use crate::domain::{ConsumerPtr, PublisherPtr};
use std::sync::Arc;

/// Creates the no-op ("memory") publisher.
///
/// This implementation does nothing - all metrics calls are ignored.
/// Useful for development, testing, or when metrics are disabled.
pub fn create_publisher(config: &InstrumentorConfig) -> PublisherPtr {
    // ---
    Arc::new(NoopPublisher::new(
        config.http_endpoint.clone(),
        config.http_handler.clone(),
        config.prefixes.clone(),
    ))
}

/// Creates the no-op ("memory") consumer.
pub fn create_consumer() -> ConsumerPtr {
    Arc::new(NoopConsumer::new())
}
