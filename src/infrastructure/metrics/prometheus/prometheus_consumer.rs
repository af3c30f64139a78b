use crate::domain::Consumer;
use crate::lifecycle::Lifecycle;

/// Consumer for the "prometheus" backend.
///
/// Scraping goes through the publisher's handler; this service only takes
/// part in the lifecycle.
pub struct PrometheusConsumer {
    lifecycle: Lifecycle,
}

impl PrometheusConsumer {
    pub fn new() -> Self {
        PrometheusConsumer {
            lifecycle: Lifecycle::new("prometheus consumer"),
        }
    }
}

#[async_trait::async_trait]
impl Consumer for PrometheusConsumer {
    // ---
    async fn boot(&self) {
        self.lifecycle.boot().await;
    }

    async fn shutdown(&self) {
        self.lifecycle.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::lifecycle::LifecycleState;

    #[tokio::test]
    async fn shutdown_is_final() {
        // ---
        let consumer = PrometheusConsumer::new();
        consumer.boot().await;
        consumer.shutdown().await;
        consumer.boot().await;

        assert_eq!(consumer.lifecycle.state().await, LifecycleState::Stopped);
    }
}
