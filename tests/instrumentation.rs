use instrumentor::domain::{CounterConfig, HistogramConfig, Publisher};
use instrumentor::{
    create_noop_consumer, create_prom_publisher, Collection, InstrumentorConfig, LifecycleState,
    MetricsKind,
};
use std::sync::Arc;
use std::time::Duration;

mod common;

#[tokio::test]
async fn collection_lifecycle_is_idempotent() {
    // ---
    let collection = common::prom_collection(&[]);
    assert_eq!(collection.state().await, LifecycleState::Unstarted);

    collection.boot().await;
    collection.boot().await;
    assert_eq!(collection.state().await, LifecycleState::Running);

    collection.shutdown().await;
    collection.shutdown().await;
    assert_eq!(collection.state().await, LifecycleState::Stopped);

    // A stopped collection stays stopped.
    collection.boot().await;
    assert_eq!(collection.state().await, LifecycleState::Stopped);
}

#[tokio::test]
async fn instruments_work_without_boot() {
    // ---
    let collection = common::prom_collection(&["svc"]);
    collection.exec_func("ping", || Ok(())).unwrap();

    let text = collection.render().unwrap();
    assert_eq!(
        common::sample(&text, "svc_ping_durations_histogram_milliseconds_count"),
        Some(1.0)
    );
}

#[tokio::test]
async fn async_actions_are_timed_in_milliseconds() {
    // ---
    let collection = common::prom_collection(&[]);
    collection
        .exec_future("sleepy", async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(())
        })
        .await
        .unwrap();

    let text = collection.render().unwrap();
    let sum = common::sample(&text, "sleepy_durations_histogram_milliseconds_sum").unwrap();
    assert!(sum >= 5.0, "duration recorded as {sum}");
    assert_eq!(sum.fract(), 0.0);
    // Fast actions fall into the millisecond buckets, not the top one.
    assert!(text.contains(r#"sleepy_durations_histogram_milliseconds_bucket{le="10000"} 1"#));
}

#[test]
fn error_chain_keeps_the_action_error() {
    // ---
    #[derive(Debug, thiserror::Error)]
    #[error("quota exceeded for {0}")]
    struct QuotaExceeded(&'static str);

    let collection = common::prom_collection(&[]);
    let err = collection
        .exec_func("upload", || Err(QuotaExceeded("alice").into()))
        .unwrap_err();

    let quota = err.downcast_ref::<QuotaExceeded>().unwrap();
    assert_eq!(quota.0, "alice");
    assert_eq!(err.root_cause().to_string(), "quota exceeded for alice");

    let text = collection.render().unwrap();
    assert_eq!(common::sample(&text, "upload_errors_counter_total"), Some(1.0));
}

#[test]
fn collections_with_separate_registries_do_not_clash() {
    // ---
    let first = common::prom_collection(&[]);
    let second = common::prom_collection(&[]);

    first.exec_func("op", || Ok(())).unwrap();
    second.exec_func("op", || Ok(())).unwrap();
    second.exec_func("op", || Ok(())).unwrap();

    let count = |c: &Collection| {
        common::sample(&c.render().unwrap(), "op_durations_histogram_milliseconds_count")
    };
    assert_eq!(count(&first), Some(1.0));
    assert_eq!(count(&second), Some(2.0));
}

#[test]
fn shared_registry_is_visible_to_the_caller() {
    // ---
    let registry = prometheus::Registry::new();
    let config = InstrumentorConfig::default()
        .with_kind(MetricsKind::Prometheus)
        .with_registry(registry.clone());
    let collection = Collection::new(config).unwrap();

    collection.gauge("workers").unwrap().increment(1.0).unwrap();

    assert_eq!(registry.gather().len(), 1);
    let text = prometheus::TextEncoder::new()
        .encode_to_string(&registry.gather())
        .unwrap();
    assert_eq!(common::sample(&text, "workers"), Some(1.0));
}

#[test]
fn labeled_metrics_from_the_publisher() {
    // ---
    let collection = common::prom_collection(&[]);
    let publisher = collection.publisher();

    let requests = publisher
        .counter(&CounterConfig::new("http_requests_total", "Requests").with_labels(["code"]))
        .unwrap();
    requests.increment_with_labels(1.0, &["200"]).unwrap();
    requests.increment_with_labels(1.0, &["200"]).unwrap();
    requests.increment_with_labels(1.0, &["503"]).unwrap();

    // Wrong arity is rejected instead of panicking in the backend.
    assert!(requests.increment_with_labels(1.0, &["200", "GET"]).is_err());
    assert!(requests.increment(1.0).is_err());

    let sizes = publisher
        .histogram(&HistogramConfig::new("body_bytes", "Body size").with_buckets([64.0, 512.0]))
        .unwrap();
    sizes.observe(100.0).unwrap();

    let text = collection.render().unwrap();
    assert_eq!(common::sample(&text, r#"http_requests_total{code="200"}"#), Some(2.0));
    assert_eq!(common::sample(&text, r#"http_requests_total{code="503"}"#), Some(1.0));
    assert_eq!(common::sample(&text, r#"body_bytes_bucket{le="64"}"#), Some(0.0));
    assert_eq!(common::sample(&text, r#"body_bytes_bucket{le="512"}"#), Some(1.0));
}

#[tokio::test]
async fn collection_from_parts_mixes_backends() {
    // ---
    let config = InstrumentorConfig::default().with_prefixes(["mixed"]);
    let publisher = create_prom_publisher(&config);
    let collection = Collection::from_parts(create_noop_consumer(), Arc::clone(&publisher));

    collection.boot().await;
    collection.exec_func("op", || Ok(())).unwrap();

    assert_eq!(collection.new_key(&["op"]), "mixed_op");
    assert!(publisher
        .render()
        .unwrap()
        .contains("mixed_op_durations_histogram_milliseconds_count 1"));
    collection.shutdown().await;
}
