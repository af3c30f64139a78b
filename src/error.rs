//! Error taxonomy for metric registries and handles.
//!
//! Caller-supplied action failures are not represented here; `Collection`
//! surfaces those through `anyhow` with the action's own error at the root.

use thiserror::Error;

/// Errors returned by publishers, consumers and metric handles.
#[derive(Debug, Error)]
pub enum Error {
    /// A required setting is missing or malformed, or a handle was invoked
    /// against the shape (scalar or labeled) it was built with.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A value passed to a handle operation is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend registry rejected the collector (duplicate or malformed).
    #[error("failed to register metric `{name}`: {source}")]
    Registration {
        name: String,
        #[source]
        source: prometheus::Error,
    },

    /// Construction or encoding failure reported by the backend library.
    #[error("metrics backend error: {0}")]
    Backend(#[from] prometheus::Error),
}

impl Error {
    // ---
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// True for every configuration-class failure.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Error::InvalidConfig(_))
    }

    /// True when the backend registry refused a new metric.
    pub fn is_registration(&self) -> bool {
        matches!(self, Error::Registration { .. })
    }
}
