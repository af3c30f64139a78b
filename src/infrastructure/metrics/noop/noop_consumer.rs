use crate::domain::Consumer;
use crate::lifecycle::Lifecycle;

/// Consumer for the "memory" backend. Only takes part in the lifecycle.
pub struct NoopConsumer {
    lifecycle: Lifecycle,
}

impl NoopConsumer {
    pub fn new() -> Self {
        NoopConsumer {
            lifecycle: Lifecycle::new("noop consumer"),
        }
    }
}

#[async_trait::async_trait]
impl Consumer for NoopConsumer {
    // ---
    async fn boot(&self) {
        self.lifecycle.boot().await;
    }

    async fn shutdown(&self) {
        self.lifecycle.shutdown().await;
    }
}
