use crate::domain::{Counter, Gauge, Histogram};
use crate::error::Error;

/// No-op metric handle. Every operation succeeds and discards its input,
/// whatever shape the caller assumes.
pub struct NoopMetrics;

impl NoopMetrics {
    pub fn new() -> Self {
        NoopMetrics
    }
}

impl Counter for NoopMetrics {
    // ---
    fn increment(&self, _: f64) -> Result<(), Error> {
        Ok(())
    }
    fn increment_with_labels(&self, _: f64, _: &[&str]) -> Result<(), Error> {
        Ok(())
    }
}

impl Gauge for NoopMetrics {
    // ---
    fn decrement(&self, _: f64) -> Result<(), Error> {
        Ok(())
    }
    fn decrement_with_labels(&self, _: f64, _: &[&str]) -> Result<(), Error> {
        Ok(())
    }
    fn increment(&self, _: f64) -> Result<(), Error> {
        Ok(())
    }
    fn increment_with_labels(&self, _: f64, _: &[&str]) -> Result<(), Error> {
        Ok(())
    }
    fn set(&self, _: f64) -> Result<(), Error> {
        Ok(())
    }
    fn set_with_labels(&self, _: f64, _: &[&str]) -> Result<(), Error> {
        Ok(())
    }
}

impl Histogram for NoopMetrics {
    // ---
    fn observe(&self, _: f64) -> Result<(), Error> {
        Ok(())
    }
    fn observe_with_labels(&self, _: f64, _: &[&str]) -> Result<(), Error> {
        Ok(())
    }
}
