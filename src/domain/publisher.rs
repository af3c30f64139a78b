use super::metric_config::{join_key, CounterConfig, GaugeConfig, HistogramConfig};
use super::metrics::{CounterPtr, GaugePtr, HistogramPtr};
use crate::error::Error;
use std::sync::Arc;

/// Handler serving the scrape endpoint, mounted by an external axum server.
pub type HttpHandler = axum::routing::MethodRouter;

/// Abstraction for emitting application metrics.
///
/// Accessors are memoised by metric name: the first configuration seen for a
/// name decides the handle every later caller receives.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync + 'static {
    // ---
    /// Start the publisher. Runs at most once.
    async fn boot(&self);

    /// Stop the publisher. Runs at most once.
    async fn shutdown(&self);

    /// Get or create the counter named by `config.name`.
    fn counter(&self, config: &CounterConfig) -> Result<CounterPtr, Error>;

    /// Get or create the gauge named by `config.name`.
    fn gauge(&self, config: &GaugeConfig) -> Result<GaugePtr, Error>;

    /// Get or create the histogram named by `config.name`.
    fn histogram(&self, config: &HistogramConfig) -> Result<HistogramPtr, Error>;

    /// Path the scrape handler is supposed to be mounted at.
    fn http_endpoint(&self) -> &str;

    /// Scrape handler, as configured.
    fn http_handler(&self) -> HttpHandler;

    /// Ordered prefixes prepended by [`Publisher::new_key`].
    fn prefixes(&self) -> &[String];

    /// Render everything published so far in the backend's text exposition format.
    fn render(&self) -> Result<String, Error>;

    /// Build a metric name from the configured prefixes and `parts`.
    fn new_key(&self, parts: &[&str]) -> String {
        join_key(self.prefixes(), parts)
    }
}

/// Type alias for any backend that implements Publisher.
pub type PublisherPtr = Arc<dyn Publisher>;
