use super::sink::{validate_common, Sink};
use crate::domain::{Counter, CounterConfig};
use crate::error::Error;
use prometheus::core::Collector;
use prometheus::{CounterVec, Opts};

const KIND: &str = "counter";

/// Counter backed by a `prometheus::Counter` or `prometheus::CounterVec`.
pub struct PrometheusCounter {
    name: String,
    sink: Sink<prometheus::Counter, CounterVec>,
}

impl PrometheusCounter {
    // ---
    /// Validates `config` and builds the scalar or labeled counter it describes.
    ///
    /// The counter is not registered anywhere yet.
    pub fn new(config: &CounterConfig) -> Result<Self, Error> {
        // ---
        validate_common(KIND, &config.name, &config.help)?;

        let opts = Opts::new(config.name.clone(), config.help.clone());
        let sink = Sink::build(
            &config.labels,
            || prometheus::Counter::with_opts(opts.clone()),
            |labels| CounterVec::new(opts.clone(), labels),
        )?;

        Ok(Self {
            name: config.name.clone(),
            sink,
        })
    }

    pub(crate) fn collector(&self) -> Box<dyn Collector> {
        self.sink.collector()
    }

    fn check_delta(&self, delta: f64) -> Result<(), Error> {
        // ---
        if delta < 0.0 || delta.is_nan() {
            return Err(Error::invalid_argument(format!(
                "counter `{}` cannot be incremented by {delta}",
                self.name
            )));
        }
        Ok(())
    }
}

impl Counter for PrometheusCounter {
    // ---
    fn increment(&self, delta: f64) -> Result<(), Error> {
        // ---
        let counter = self.sink.scalar(KIND, &self.name)?;
        self.check_delta(delta)?;
        counter.inc_by(delta);
        Ok(())
    }

    fn increment_with_labels(&self, delta: f64, values: &[&str]) -> Result<(), Error> {
        // ---
        let vec = self.sink.labeled(KIND, &self.name, values)?;
        self.check_delta(delta)?;
        vec.get_metric_with_label_values(values)?.inc_by(delta);
        Ok(())
    }
}
