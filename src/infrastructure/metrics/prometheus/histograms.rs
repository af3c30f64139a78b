use super::sink::{validate_common, Sink};
use crate::domain::{Histogram, HistogramConfig};
use crate::error::Error;
use prometheus::core::Collector;
use prometheus::{HistogramOpts, HistogramVec};

const KIND: &str = "histogram";

/// Histogram backed by a `prometheus::Histogram` or `prometheus::HistogramVec`.
pub struct PrometheusHistogram {
    name: String,
    sink: Sink<prometheus::Histogram, HistogramVec>,
}

impl PrometheusHistogram {
    // ---
    /// Validates `config` (including non-empty, strictly ascending buckets)
    /// and builds the histogram it describes.
    pub fn new(config: &HistogramConfig) -> Result<Self, Error> {
        // ---
        validate_common(KIND, &config.name, &config.help)?;
        validate_buckets(&config.name, &config.buckets)?;

        let opts = HistogramOpts::new(config.name.clone(), config.help.clone())
            .buckets(config.buckets.clone());
        let sink = Sink::build(
            &config.labels,
            || prometheus::Histogram::with_opts(opts.clone()),
            |labels| HistogramVec::new(opts.clone(), labels),
        )?;

        Ok(Self {
            name: config.name.clone(),
            sink,
        })
    }

    pub(crate) fn collector(&self) -> Box<dyn Collector> {
        self.sink.collector()
    }
}

fn validate_buckets(name: &str, buckets: &[f64]) -> Result<(), Error> {
    // ---
    if buckets.is_empty() {
        return Err(Error::invalid_config(format!(
            "histogram `{name}`: buckets must contain at least 1 value"
        )));
    }
    if buckets.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(Error::invalid_config(format!(
            "histogram `{name}`: buckets must be strictly ascending"
        )));
    }
    Ok(())
}

impl Histogram for PrometheusHistogram {
    // ---
    fn observe(&self, sample: f64) -> Result<(), Error> {
        // ---
        self.sink.scalar(KIND, &self.name)?.observe(sample);
        Ok(())
    }

    fn observe_with_labels(&self, sample: f64, values: &[&str]) -> Result<(), Error> {
        // ---
        let vec = self.sink.labeled(KIND, &self.name, values)?;
        vec.get_metric_with_label_values(values)?.observe(sample);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn scalar_histogram_counts_samples() -> Result<(), Error> {
        // ---
        let histogram = PrometheusHistogram::new(&HistogramConfig::new("latency", "latency"))?;
        histogram.observe(0.5)?;
        histogram.observe(2.0)?;

        match &histogram.sink {
            Sink::Scalar(inner) => {
                assert_eq!(inner.get_sample_count(), 2);
                assert_eq!(inner.get_sample_sum(), 2.5);
            }
            Sink::Labeled { .. } => panic!("expected a scalar histogram"),
        }
        assert!(histogram
            .observe_with_labels(1.0, &["GET"])
            .unwrap_err()
            .is_invalid_config());
        Ok(())
    }

    #[test]
    fn labeled_histogram_requires_label_values() -> Result<(), Error> {
        // ---
        let config = HistogramConfig::new("latency", "latency").with_labels(["method"]);
        let histogram = PrometheusHistogram::new(&config)?;

        histogram.observe_with_labels(0.1, &["GET"])?;
        assert!(histogram.observe(0.1).unwrap_err().is_invalid_config());
        assert!(histogram.observe_with_labels(0.1, &[]).unwrap_err().is_invalid_config());
        Ok(())
    }

    #[test]
    fn bucket_validation() {
        // ---
        let empty = HistogramConfig::new("latency", "latency").with_buckets(Vec::new());
        let err = PrometheusHistogram::new(&empty).err().unwrap();
        assert!(err.to_string().contains("at least 1 value"));

        let unsorted = HistogramConfig::new("latency", "latency").with_buckets(vec![1.0, 0.5]);
        let err = PrometheusHistogram::new(&unsorted).err().unwrap();
        assert!(err.to_string().contains("strictly ascending"));
    }
}
