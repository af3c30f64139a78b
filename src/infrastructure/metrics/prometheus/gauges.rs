use super::sink::{validate_common, Sink};
use crate::domain::{Gauge, GaugeConfig};
use crate::error::Error;
use prometheus::core::Collector;
use prometheus::{GaugeVec, Opts};

const KIND: &str = "gauge";

/// Gauge backed by a `prometheus::Gauge` or `prometheus::GaugeVec`.
pub struct PrometheusGauge {
    name: String,
    sink: Sink<prometheus::Gauge, GaugeVec>,
}

impl PrometheusGauge {
    // ---
    pub fn new(config: &GaugeConfig) -> Result<Self, Error> {
        // ---
        validate_common(KIND, &config.name, &config.help)?;

        let opts = Opts::new(config.name.clone(), config.help.clone());
        let sink = Sink::build(
            &config.labels,
            || prometheus::Gauge::with_opts(opts.clone()),
            |labels| GaugeVec::new(opts.clone(), labels),
        )?;

        Ok(Self {
            name: config.name.clone(),
            sink,
        })
    }

    pub(crate) fn collector(&self) -> Box<dyn Collector> {
        self.sink.collector()
    }

    fn series(&self) -> Result<&prometheus::Gauge, Error> {
        self.sink.scalar(KIND, &self.name)
    }

    fn labeled_series(&self, values: &[&str]) -> Result<prometheus::Gauge, Error> {
        // ---
        let vec = self.sink.labeled(KIND, &self.name, values)?;
        Ok(vec.get_metric_with_label_values(values)?)
    }
}

impl Gauge for PrometheusGauge {
    // ---
    fn decrement(&self, delta: f64) -> Result<(), Error> {
        self.series()?.sub(delta);
        Ok(())
    }

    fn decrement_with_labels(&self, delta: f64, values: &[&str]) -> Result<(), Error> {
        self.labeled_series(values)?.sub(delta);
        Ok(())
    }

    fn increment(&self, delta: f64) -> Result<(), Error> {
        self.series()?.add(delta);
        Ok(())
    }

    fn increment_with_labels(&self, delta: f64, values: &[&str]) -> Result<(), Error> {
        self.labeled_series(values)?.add(delta);
        Ok(())
    }

    fn set(&self, value: f64) -> Result<(), Error> {
        self.series()?.set(value);
        Ok(())
    }

    fn set_with_labels(&self, value: f64, values: &[&str]) -> Result<(), Error> {
        self.labeled_series(values)?.set(value);
        Ok(())
    }
}
