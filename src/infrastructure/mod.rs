pub mod metrics;

// Re-export the factory functions for easy access
pub use metrics::{
    create_noop_consumer, create_noop_publisher, create_prom_consumer, create_prom_publisher,
};

// Concrete backends, for callers composing a `Collection` by hand
pub use metrics::noop::{NoopConsumer, NoopMetrics, NoopPublisher};
pub use metrics::prometheus::{
    PrometheusConsumer, PrometheusCounter, PrometheusGauge, PrometheusHistogram,
    PrometheusPublisher,
};
