// Test helpers are intentionally partially used
#![allow(dead_code)]

use instrumentor::{Collection, InstrumentorConfig, MetricsKind};
use reqwest::Client;
use std::sync::Once;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

static INIT: Once = Once::new();

// ============================================================================
// Test Setup
// ============================================================================

/// Installs a test-friendly tracing subscriber once per test binary.
/// Set `TEST_DEBUG` to see library logs.
pub fn setup_tracing() {
    // ---
    INIT.call_once(|| {
        if std::env::var("TEST_DEBUG").is_ok() {
            let _ = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_test_writer()
                .try_init();
        }
    });
}

/// Prometheus-backed collection with its own registry.
pub fn prom_collection(prefixes: &[&str]) -> Collection {
    // ---
    setup_tracing();
    let config = InstrumentorConfig::default()
        .with_kind(MetricsKind::Prometheus)
        .with_prefixes(prefixes.iter().copied());
    Collection::new(config).expect("valid prometheus config")
}

/// Value of the exposition sample line starting with `series `.
pub fn sample(text: &str, series: &str) -> Option<f64> {
    // ---
    text.lines()
        .find_map(|line| line.strip_prefix(series)?.strip_prefix(' '))
        .and_then(|value| value.parse().ok())
}

/// Serves a collection's router on an ephemeral port.
pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub async fn new(app: axum::Router) -> Self {
        // ---
        setup_tracing();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(50)).await;

        let client = Client::new();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }

    /// GETs `path`, returning status, content type and body.
    pub async fn get(&self, path: &str) -> (u16, Option<String>, String) {
        // ---
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get("content-type")
            .map(|value| value.to_str().unwrap().to_string());
        let body = res.text().await.unwrap();
        (status, content_type, body)
    }
}
