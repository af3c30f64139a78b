use crate::error::Error;
use prometheus::core::Collector;

/// Backing storage of a handle: a single series when no labels were
/// configured, otherwise a label-partitioned vector. Fixed at construction.
pub(crate) enum Sink<S, V> {
    Scalar(S),
    Labeled { vec: V, labels: Vec<String> },
}

impl<S, V> Sink<S, V>
where
    S: Collector + Clone + 'static,
    V: Collector + Clone + 'static,
{
    // ---
    /// Picks the shape from `labels` and builds it with the matching constructor.
    pub(crate) fn build(
        labels: &[String],
        scalar: impl FnOnce() -> prometheus::Result<S>,
        labeled: impl FnOnce(&[&str]) -> prometheus::Result<V>,
    ) -> Result<Self, Error> {
        // ---
        if labels.is_empty() {
            return Ok(Sink::Scalar(scalar()?));
        }

        let names: Vec<&str> = labels.iter().map(String::as_str).collect();
        Ok(Sink::Labeled {
            vec: labeled(&names)?,
            labels: labels.to_vec(),
        })
    }

    /// The scalar series, or a config error if this handle carries labels.
    pub(crate) fn scalar(&self, kind: &str, name: &str) -> Result<&S, Error> {
        // ---
        match self {
            Sink::Scalar(series) => Ok(series),
            Sink::Labeled { .. } => Err(Error::invalid_config(format!(
                "{kind} `{name}` is configured with labels; use the *_with_labels operations"
            ))),
        }
    }

    /// The labeled vector, after checking `values` matches the configured labels.
    pub(crate) fn labeled(&self, kind: &str, name: &str, values: &[&str]) -> Result<&V, Error> {
        // ---
        let (vec, labels) = match self {
            Sink::Labeled { vec, labels } => (vec, labels),
            Sink::Scalar(_) => {
                return Err(Error::invalid_config(format!(
                    "{kind} `{name}` is configured without labels; use the plain operations"
                )))
            }
        };

        if values.is_empty() {
            return Err(Error::invalid_config(format!(
                "{kind} `{name}`: label values must not be empty"
            )));
        }
        if values.len() != labels.len() {
            return Err(Error::invalid_config(format!(
                "{kind} `{name}` expects {} label values ({}), got {}",
                labels.len(),
                labels.join(", "),
                values.len()
            )));
        }

        Ok(vec)
    }

    /// Boxed collector for registry registration.
    pub(crate) fn collector(&self) -> Box<dyn Collector> {
        // ---
        match self {
            Sink::Scalar(series) => Box::new(series.clone()),
            Sink::Labeled { vec, .. } => Box::new(vec.clone()),
        }
    }
}

/// Checks the settings every Prometheus metric requires.
pub(crate) fn validate_common(kind: &str, name: &str, help: &str) -> Result<(), Error> {
    // ---
    if name.is_empty() {
        return Err(Error::invalid_config(format!("{kind} name must not be empty")));
    }
    if help.is_empty() {
        return Err(Error::invalid_config(format!(
            "{kind} `{name}`: help must not be empty"
        )));
    }
    Ok(())
}
