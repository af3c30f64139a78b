mod counters;
mod gauges;
mod histograms;
mod prometheus_consumer;
mod prometheus_publisher;
mod recorder;
mod sink;

pub use counters::PrometheusCounter;
pub use gauges::PrometheusGauge;
pub use histograms::PrometheusHistogram;
pub use prometheus_consumer::PrometheusConsumer;
pub use prometheus_publisher::PrometheusPublisher;

use crate::config::InstrumentorConfig;
use crate::domain::{ConsumerPtr, PublisherPtr};
use prometheus::Registry;
use std::sync::Arc;

/// Creates the Prometheus publisher.
///
/// Metrics register into `config.registry` when one is supplied, otherwise
/// into a registry owned by the publisher. Either way the default handler
/// exposes that registry in Prometheus text format.
pub fn create_publisher(config: &InstrumentorConfig) -> PublisherPtr {
    // ---
    tracing::info!("Initializing Prometheus metrics");
    let registry = config.registry.clone().unwrap_or_else(Registry::new);

    Arc::new(PrometheusPublisher::new(
        registry,
        config.http_endpoint.clone(),
        config.http_handler.clone(),
        config.prefixes.clone(),
    ))
}

/// Creates the Prometheus consumer.
pub fn create_consumer() -> ConsumerPtr {
    Arc::new(PrometheusConsumer::new())
}
