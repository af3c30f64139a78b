mod consumer;
mod metric_config;
mod metrics;
mod publisher;

// Publicly expose the metric handle abstractions
pub use metrics::{Counter, CounterPtr, Gauge, GaugePtr, Histogram, HistogramPtr};

// Publicly expose per-metric configuration
pub use metric_config::{
    join_key, CounterConfig, GaugeConfig, HistogramConfig, MetricConfig, DEFAULT_BUCKETS,
    KEY_SEPARATOR,
};

// Publicly expose the backend service abstractions
pub use consumer::{Consumer, ConsumerPtr};
pub use publisher::{HttpHandler, Publisher, PublisherPtr};
