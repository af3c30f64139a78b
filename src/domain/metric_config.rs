//! Per-metric configuration and metric name construction.

use serde::{Deserialize, Serialize};

/// Separator placed between prefixes and key parts in metric names.
pub const KEY_SEPARATOR: &str = "_";

/// Bucket upper bounds (seconds) used when a histogram config does not override them.
pub const DEFAULT_BUCKETS: &[f64] = &[
    0.001, 0.002, 0.003, 0.004, 0.005, 0.01, 0.02, 0.03, 0.04, 0.05, 0.1, 0.2, 0.3, 0.4, 0.5, 1.0,
    2.0, 3.0, 4.0, 5.0, 10.0,
];

/// Configuration shared by counters and gauges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricConfig {
    /// Underscored metric name as registered with the backend.
    pub name: String,

    /// Human readable description. Required by the Prometheus backend.
    #[serde(default)]
    pub help: String,

    /// Label names partitioning the metric. Empty means a single series.
    #[serde(default)]
    pub labels: Vec<String>,
}

impl MetricConfig {
    // ---
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        // ---
        Self {
            name: name.into(),
            help: help.into(),
            labels: Vec::new(),
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// Counter configuration.
pub type CounterConfig = MetricConfig;

/// Gauge configuration.
pub type GaugeConfig = MetricConfig;

/// Histogram configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramConfig {
    pub name: String,

    #[serde(default)]
    pub help: String,

    #[serde(default)]
    pub labels: Vec<String>,

    /// Ascending bucket upper bounds. The Prometheus backend requires at least one.
    #[serde(default = "default_buckets")]
    pub buckets: Vec<f64>,
}

fn default_buckets() -> Vec<f64> {
    DEFAULT_BUCKETS.to_vec()
}

impl Default for HistogramConfig {
    fn default() -> Self {
        // ---
        Self {
            name: String::new(),
            help: String::new(),
            labels: Vec::new(),
            buckets: default_buckets(),
        }
    }
}

impl HistogramConfig {
    // ---
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        // ---
        Self {
            name: name.into(),
            help: help.into(),
            ..Self::default()
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_buckets(mut self, buckets: impl Into<Vec<f64>>) -> Self {
        self.buckets = buckets.into();
        self
    }
}

/// Joins `prefixes` followed by `parts` with [`KEY_SEPARATOR`].
///
/// ```
/// use instrumentor::domain::join_key;
///
/// let prefixes = vec!["svc".to_string()];
/// assert_eq!(join_key(&prefixes, &["a", "b"]), "svc_a_b");
/// assert_eq!(join_key(&prefixes, &[]), "svc");
/// ```
pub fn join_key(prefixes: &[String], parts: &[&str]) -> String {
    // ---
    prefixes
        .iter()
        .map(String::as_str)
        .chain(parts.iter().copied())
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}
