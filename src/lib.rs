// src/lib.rs

//! Metrics instrumentation with interchangeable backends.
//!
//! A [`Collection`] is built from an [`InstrumentorConfig`] whose
//! [`MetricsKind`] selects either the inert `memory` backend or the
//! `prometheus` backend. Callers time fallible actions with
//! [`Collection::exec_func`] / [`Collection::wrap_func`], fetch ad-hoc
//! counters, gauges and histograms, and mount [`Collection::router`] on their
//! own axum server to expose the scrape endpoint.

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod collection;
mod config;
mod error;
mod handlers;
mod infrastructure;
mod lifecycle;

// Hoist up only the public symbol(s)
pub use collection::{Collection, DURATION_BUCKETS_MS};
pub use config::{InstrumentorConfig, MetricsKind, DEFAULT_HTTP_ENDPOINT};
pub use error::Error;
pub use lifecycle::LifecycleState;

// Publicly expose the backend creation functions and concrete types
pub use infrastructure::{
    create_noop_consumer, // ---
    create_noop_publisher,
    create_prom_consumer,
    create_prom_publisher,
    NoopConsumer,
    NoopMetrics,
    NoopPublisher,
    PrometheusConsumer,
    PrometheusCounter,
    PrometheusGauge,
    PrometheusHistogram,
    PrometheusPublisher,
};
