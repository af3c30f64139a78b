//! Prometheus publisher.
//!
//! Handles are memoised by metric name in one map per kind, all guarded by a
//! single lock. Construction and registration happen while that lock is held,
//! so concurrent first requests for a name yield exactly one registration.

use super::counters::PrometheusCounter;
use super::gauges::PrometheusGauge;
use super::histograms::PrometheusHistogram;
use super::recorder::render_metrics;
use crate::domain::{
    Counter, CounterConfig, CounterPtr, Gauge, GaugeConfig, GaugePtr, Histogram, HistogramConfig,
    HistogramPtr, HttpHandler, Publisher,
};
use crate::error::Error;
use crate::handlers::exposition_handler;
use crate::lifecycle::Lifecycle;
use parking_lot::Mutex;
use prometheus::core::Collector;
use prometheus::Registry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// First configuration seen for a name together with the handle built from it.
struct Cached<C, H: ?Sized> {
    config: C,
    handle: Arc<H>,
}

#[derive(Default)]
struct RegisteredMetrics {
    counters: HashMap<String, Cached<CounterConfig, dyn Counter>>,
    gauges: HashMap<String, Cached<GaugeConfig, dyn Gauge>>,
    histograms: HashMap<String, Cached<HistogramConfig, dyn Histogram>>,
}

/// Publisher for the "prometheus" backend.
pub struct PrometheusPublisher {
    lifecycle: Lifecycle,
    registry: Registry,
    metrics: Mutex<RegisteredMetrics>,
    http_endpoint: String,
    http_handler: HttpHandler,
    prefixes: Vec<String>,
}

impl PrometheusPublisher {
    // ---
    /// Creates a publisher registering into `registry`.
    ///
    /// Without a custom `http_handler`, the endpoint serves the text
    /// exposition of `registry`.
    pub fn new(
        registry: Registry,
        http_endpoint: String,
        http_handler: Option<HttpHandler>,
        prefixes: Vec<String>,
    ) -> Self {
        // ---
        tracing::info!("Creating Prometheus publisher");

        let http_handler = http_handler.unwrap_or_else(|| {
            let registry = registry.clone();
            exposition_handler(move || render_metrics(&registry))
        });

        PrometheusPublisher {
            lifecycle: Lifecycle::new("prometheus publisher"),
            registry,
            metrics: Mutex::new(RegisteredMetrics::default()),
            http_endpoint,
            http_handler,
            prefixes,
        }
    }

    /// The registry new metrics are registered into.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// Returns the cached handle for `name`, or builds, registers and caches one.
///
/// The caller holds the publisher lock for the whole call.
fn get_or_register<C, H, B>(
    cache: &mut HashMap<String, Cached<C, H>>,
    registry: &Registry,
    kind: &str,
    config: &C,
    name: &str,
    build: B,
) -> Result<Arc<H>, Error>
where
    C: Clone + PartialEq + Debug,
    H: ?Sized,
    B: FnOnce() -> Result<(Arc<H>, Box<dyn Collector>), Error>,
{
    // ---
    if let Some(cached) = cache.get(name) {
        if cached.config != *config {
            // First writer wins; the differing request is served the original handle.
            tracing::warn!(
                "{} `{}` already registered with {:?}; ignoring {:?}",
                kind,
                name,
                cached.config,
                config
            );
        }
        return Ok(Arc::clone(&cached.handle));
    }

    let (handle, collector) = build()?;
    registry
        .register(collector)
        .map_err(|source| Error::Registration {
            name: name.to_string(),
            source,
        })?;

    tracing::debug!("Registered {} `{}`", kind, name);
    cache.insert(
        name.to_string(),
        Cached {
            config: config.clone(),
            handle: Arc::clone(&handle),
        },
    );

    Ok(handle)
}

#[async_trait::async_trait]
impl Publisher for PrometheusPublisher {
    // ---
    async fn boot(&self) {
        self.lifecycle.boot().await;
    }

    async fn shutdown(&self) {
        self.lifecycle.shutdown().await;
    }

    fn counter(&self, config: &CounterConfig) -> Result<CounterPtr, Error> {
        // ---
        let mut metrics = self.metrics.lock();
        get_or_register(
            &mut metrics.counters,
            &self.registry,
            "counter",
            config,
            &config.name,
            || {
                let counter = PrometheusCounter::new(config)?;
                let collector = counter.collector();
                Ok((Arc::new(counter) as CounterPtr, collector))
            },
        )
    }

    fn gauge(&self, config: &GaugeConfig) -> Result<GaugePtr, Error> {
        // ---
        let mut metrics = self.metrics.lock();
        get_or_register(
            &mut metrics.gauges,
            &self.registry,
            "gauge",
            config,
            &config.name,
            || {
                let gauge = PrometheusGauge::new(config)?;
                let collector = gauge.collector();
                Ok((Arc::new(gauge) as GaugePtr, collector))
            },
        )
    }

    fn histogram(&self, config: &HistogramConfig) -> Result<HistogramPtr, Error> {
        // ---
        let mut metrics = self.metrics.lock();
        get_or_register(
            &mut metrics.histograms,
            &self.registry,
            "histogram",
            config,
            &config.name,
            || {
                let histogram = PrometheusHistogram::new(config)?;
                let collector = histogram.collector();
                Ok((Arc::new(histogram) as HistogramPtr, collector))
            },
        )
    }

    fn http_endpoint(&self) -> &str {
        &self.http_endpoint
    }

    fn http_handler(&self) -> HttpHandler {
        self.http_handler.clone()
    }

    fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    fn render(&self) -> Result<String, Error> {
        render_metrics(&self.registry)
    }
}
