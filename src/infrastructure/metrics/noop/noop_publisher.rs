use super::noop_metrics::NoopMetrics;
use crate::domain::{
    CounterConfig, CounterPtr, GaugeConfig, GaugePtr, HistogramConfig, HistogramPtr, HttpHandler,
    Publisher,
};
use crate::error::Error;
use crate::handlers::exposition_handler;
use crate::lifecycle::Lifecycle;
use std::sync::Arc;

/// Publisher for the "memory" backend.
///
/// Performs no validation and keeps no registry: every accessor hands out the
/// same inert handle. Endpoint, handler and prefixes are kept as configured so
/// routing and key derivation behave like the real backend.
pub struct NoopPublisher {
    lifecycle: Lifecycle,
    handle: Arc<NoopMetrics>,
    http_endpoint: String,
    http_handler: HttpHandler,
    prefixes: Vec<String>,
}

impl NoopPublisher {
    // ---
    pub fn new(
        http_endpoint: String,
        http_handler: Option<HttpHandler>,
        prefixes: Vec<String>,
    ) -> Self {
        // ---
        NoopPublisher {
            lifecycle: Lifecycle::new("noop publisher"),
            handle: Arc::new(NoopMetrics::new()),
            http_endpoint,
            http_handler: http_handler.unwrap_or_else(|| exposition_handler(|| Ok(String::new()))),
            prefixes,
        }
    }
}

#[async_trait::async_trait]
impl Publisher for NoopPublisher {
    // ---
    async fn boot(&self) {
        self.lifecycle.boot().await;
    }

    async fn shutdown(&self) {
        self.lifecycle.shutdown().await;
    }

    fn counter(&self, _: &CounterConfig) -> Result<CounterPtr, Error> {
        Ok(self.handle.clone())
    }

    fn gauge(&self, _: &GaugeConfig) -> Result<GaugePtr, Error> {
        Ok(self.handle.clone())
    }

    fn histogram(&self, _: &HistogramConfig) -> Result<HistogramPtr, Error> {
        Ok(self.handle.clone())
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
        Ok(String::new())
    }
}
