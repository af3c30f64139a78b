use crate::error::Error;
use std::sync::Arc;

/// A monotonically increasing metric.
///
/// Handles are built either as a single series (no labels configured) or as a
/// label-partitioned family. The plain operations only work on the former and
/// the `*_with_labels` operations only on the latter.
pub trait Counter: Send + Sync + 'static {
    // ---
    /// Add `delta` (must not be negative) to the counter.
    fn increment(&self, delta: f64) -> Result<(), Error>;

    /// Add `delta` to the series identified by `values`, one per configured label.
    fn increment_with_labels(&self, delta: f64, values: &[&str]) -> Result<(), Error>;
}

/// A metric that can be raised, lowered or set to an arbitrary value.
pub trait Gauge: Send + Sync + 'static {
    // ---
    fn decrement(&self, delta: f64) -> Result<(), Error>;
    fn decrement_with_labels(&self, delta: f64, values: &[&str]) -> Result<(), Error>;

    fn increment(&self, delta: f64) -> Result<(), Error>;
    fn increment_with_labels(&self, delta: f64, values: &[&str]) -> Result<(), Error>;

    fn set(&self, value: f64) -> Result<(), Error>;
    fn set_with_labels(&self, value: f64, values: &[&str]) -> Result<(), Error>;
}

/// A metric aggregating observed samples into configured buckets.
pub trait Histogram: Send + Sync + 'static {
    // ---
    fn observe(&self, sample: f64) -> Result<(), Error>;
    fn observe_with_labels(&self, sample: f64, values: &[&str]) -> Result<(), Error>;
}

/// Shared handle to any counter backend.
pub type CounterPtr = Arc<dyn Counter>;

/// Shared handle to any gauge backend.
pub type GaugePtr = Arc<dyn Gauge>;

/// Shared handle to any histogram backend.
pub type HistogramPtr = Arc<dyn Histogram>;
