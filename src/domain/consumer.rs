use std::sync::Arc;

/// Abstraction for reading application metrics back from a backend.
///
/// Backends currently only take part in the lifecycle; reads go through
/// the publisher's scrape handler.
#[async_trait::async_trait]
pub trait Consumer: Send + Sync + 'static {
    // ---
    /// Start the consumer. Runs at most once.
    async fn boot(&self);

    /// Stop the consumer. Runs at most once.
    async fn shutdown(&self);
}

/// Type alias for any backend that implements Consumer.
pub type ConsumerPtr = Arc<dyn Consumer>;
