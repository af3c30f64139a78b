//! Instrumentation façade.
//!
//! A [`Collection`] bundles the consumer and publisher of one backend. It
//! times caller-supplied actions, counts their failures, and hands out ad-hoc
//! metrics by key. It keeps no metric state of its own; everything lands in
//! the publisher.
//!
//! For a key `k` and prefixes `p`, instrumented actions emit
//!
//! - `p_k_durations_histogram_milliseconds`: one sample per execution, in
//!   whole milliseconds, whatever the outcome
//! - `p_k_errors_counter_total`: incremented once per failed execution

use crate::config::{validate_http_endpoint, InstrumentorConfig, MetricsKind};
use crate::domain::{
    ConsumerPtr, CounterConfig, CounterPtr, GaugeConfig, GaugePtr, HistogramConfig, HistogramPtr,
    HttpHandler, PublisherPtr,
};
use crate::error::Error;
use crate::infrastructure::{
    create_noop_consumer, create_noop_publisher, create_prom_consumer, create_prom_publisher,
};
use crate::lifecycle::{Lifecycle, LifecycleState};
use anyhow::Context;
use axum::Router;
use std::future::Future;
use std::time::Instant;

/// Millisecond bucket bounds for action durations.
pub const DURATION_BUCKETS_MS: &[f64] = &[
    1.0, 2.0, 3.0, 4.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0, 100.0, 200.0, 300.0, 400.0, 500.0,
    1_000.0, 2_000.0, 3_000.0, 4_000.0, 5_000.0, 10_000.0,
];

/// Consumer and publisher of one backend behind a single instrumentation API.
pub struct Collection {
    lifecycle: Lifecycle,
    consumer: ConsumerPtr,
    publisher: PublisherPtr,
}

impl Collection {
    // ---
    /// Builds the backend selected by `config.kind`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if `config` does not validate.
    pub fn new(config: InstrumentorConfig) -> Result<Self, Error> {
        // ---
        config.validate()?;

        let (consumer, publisher) = match config.kind {
            MetricsKind::Memory => (create_noop_consumer(), create_noop_publisher(&config)),
            MetricsKind::Prometheus => (create_prom_consumer(), create_prom_publisher(&config)),
        };

        tracing::info!(
            "Created {} instrumentor serving {}",
            config.kind,
            config.http_endpoint
        );
        Ok(Self::from_parts(consumer, publisher))
    }

    /// Composes an already constructed consumer and publisher.
    pub fn from_parts(consumer: ConsumerPtr, publisher: PublisherPtr) -> Self {
        // ---
        Self {
            lifecycle: Lifecycle::new("instrumentor collection"),
            consumer,
            publisher,
        }
    }

    pub fn consumer(&self) -> &ConsumerPtr {
        &self.consumer
    }

    pub fn publisher(&self) -> &PublisherPtr {
        &self.publisher
    }

    /// Boots consumer and publisher concurrently and waits for both.
    ///
    /// Only the first call does any work; concurrent callers return once it
    /// has finished.
    pub async fn boot(&self) {
        // ---
        let (consumer, publisher) = (&self.consumer, &self.publisher);
        self.lifecycle
            .boot_with(move || async move {
                tokio::join!(consumer.boot(), publisher.boot());
            })
            .await;
    }

    /// Shuts consumer and publisher down concurrently and waits for both.
    pub async fn shutdown(&self) {
        // ---
        let (consumer, publisher) = (&self.consumer, &self.publisher);
        self.lifecycle
            .shutdown_with(move || async move {
                tokio::join!(consumer.shutdown(), publisher.shutdown());
            })
            .await;
    }

    pub async fn state(&self) -> LifecycleState {
        self.lifecycle.state().await
    }

    /// Runs `action`, recording its duration and counting its failure.
    ///
    /// The action's error is returned with the key as context; it stays
    /// available through `root_cause()` and `downcast_ref()`. Failing to look
    /// up the metrics is returned before `action` runs.
    pub fn exec_func<F>(&self, key: &str, action: F) -> anyhow::Result<()>
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        // ---
        let (durations, errors) = self.action_metrics(key)?;

        let started = Instant::now();
        let result = action();

        record_outcome(key, &durations, &errors, started, result)
    }

    /// Async counterpart of [`Collection::exec_func`].
    pub async fn exec_future<Fut>(&self, key: &str, action: Fut) -> anyhow::Result<()>
    where
        Fut: Future<Output = anyhow::Result<()>>,
    {
        // ---
        let (durations, errors) = self.action_metrics(key)?;

        let started = Instant::now();
        let result = action.await;

        record_outcome(key, &durations, &errors, started, result)
    }

    /// Wraps `action` so every call goes through [`Collection::exec_func`].
    ///
    /// The returned closure can be called repeatedly, e.g. as a retry body.
    pub fn wrap_func<'a, F>(
        &'a self,
        key: &str,
        mut action: F,
    ) -> impl FnMut() -> anyhow::Result<()> + 'a
    where
        F: FnMut() -> anyhow::Result<()> + 'a,
    {
        let key = key.to_string();
        move || self.exec_func(&key, &mut action)
    }

    /// Counter named exactly `key`, created on first use.
    pub fn counter(&self, key: &str) -> Result<CounterPtr, Error> {
        self.publisher
            .counter(&CounterConfig::new(key, help_for("Counter", key)))
    }

    /// Gauge named exactly `key`, created on first use.
    pub fn gauge(&self, key: &str) -> Result<GaugePtr, Error> {
        self.publisher
            .gauge(&GaugeConfig::new(key, help_for("Gauge", key)))
    }

    /// Histogram named exactly `key` with the default buckets, created on first use.
    pub fn histogram(&self, key: &str) -> Result<HistogramPtr, Error> {
        self.publisher
            .histogram(&HistogramConfig::new(key, help_for("Histogram", key)))
    }

    pub fn http_endpoint(&self) -> &str {
        self.publisher.http_endpoint()
    }

    pub fn http_handler(&self) -> HttpHandler {
        self.publisher.http_handler()
    }

    pub fn prefixes(&self) -> &[String] {
        self.publisher.prefixes()
    }

    pub fn new_key(&self, parts: &[&str]) -> String {
        self.publisher.new_key(parts)
    }

    /// Router with the scrape handler mounted at the configured endpoint,
    /// ready to be merged into an application router.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if the publisher's endpoint is not a
    /// path axum can route, e.g. one built through [`Collection::from_parts`].
    pub fn router(&self) -> Result<Router, Error> {
        // ---
        let endpoint = self.http_endpoint();
        validate_http_endpoint(endpoint)?;
        Ok(Router::new().route(endpoint, self.http_handler()))
    }

    /// Current exposition text of the publisher.
    pub fn render(&self) -> Result<String, Error> {
        self.publisher.render()
    }

    fn action_metrics(&self, key: &str) -> Result<(HistogramPtr, CounterPtr), Error> {
        // ---
        let durations = HistogramConfig::new(
            self.new_key(&[key, "durations", "histogram", "milliseconds"]),
            format!("Duration of `{key}` in milliseconds"),
        )
        .with_buckets(DURATION_BUCKETS_MS);
        let errors = CounterConfig::new(
            self.new_key(&[key, "errors", "counter", "total"]),
            format!("Errors returned by `{key}`"),
        );

        Ok((
            self.publisher.histogram(&durations)?,
            self.publisher.counter(&errors)?,
        ))
    }
}

fn help_for(kind: &str, key: &str) -> String {
    format!("{kind} metric {key}")
}

/// Records one execution. Recording failures are logged, never allowed to
/// replace the action's own result.
fn record_outcome(
    key: &str,
    durations: &HistogramPtr,
    errors: &CounterPtr,
    started: Instant,
    result: anyhow::Result<()>,
) -> anyhow::Result<()> {
    // ---
    // Whole milliseconds; sub-millisecond precision is truncated.
    let elapsed_ms = started.elapsed().as_millis() as f64;
    if let Err(err) = durations.observe(elapsed_ms) {
        tracing::warn!("Failed to record duration of `{}`: {}", key, err);
    }

    let Err(err) = result else {
        return Ok(());
    };

    if let Err(metric_err) = errors.increment(1.0) {
        tracing::warn!("Failed to count error of `{}`: {}", key, metric_err);
    }
    Err(err).with_context(|| format!("instrumented action `{key}` failed"))
}
