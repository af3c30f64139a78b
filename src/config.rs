// src/config.rs

//! Instrumentor configuration.
//!
//! A [`InstrumentorConfig`] selects the metrics backend and describes how its
//! scrape endpoint is exposed. It can be built in code (starting from
//! `Default`) or loaded from environment variables at startup.

use crate::domain::HttpHandler;
use crate::error::Error;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads an optional environment variable, falling back to `$default`.
macro_rules! optional_env {
    // ---
    ($key:literal, $default:expr) => {
        std::env::var($key).unwrap_or_else(|_| $default.to_string())
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails with an invalid-config
/// error whose message mentions `$needle`.
macro_rules! assert_invalid_config {
    // ---
    ($expr:expr, $needle:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string().contains($needle),
            "unexpected error: {err}"
        );
    }};
}

/// Default path the scrape handler is mounted at.
pub const DEFAULT_HTTP_ENDPOINT: &str = "/metrics";

// ============================================================
// Backend kind
// ============================================================

/// Which metrics backend a [`crate::Collection`] is built on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsKind {
    /// Inert backend: every operation succeeds and records nothing.
    #[default]
    Memory,
    /// Backend publishing through a `prometheus::Registry`.
    Prometheus,
}

impl MetricsKind {
    // ---
    pub fn as_str(self) -> &'static str {
        match self {
            MetricsKind::Memory => "memory",
            MetricsKind::Prometheus => "prometheus",
        }
    }
}

impl fmt::Display for MetricsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricsKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // ---
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(MetricsKind::Memory),
            "prometheus" => Ok(MetricsKind::Prometheus),
            "" => Err(Error::invalid_config("kind must not be empty")),
            other => Err(Error::invalid_config(format!(
                "kind must be one of: memory, prometheus (got `{other}`)"
            ))),
        }
    }
}

// ============================================================
// Public configuration facade
// ============================================================

/// Settings used to construct a [`crate::Collection`].
#[derive(Clone)]
pub struct InstrumentorConfig {
    /// Backend to build.
    pub kind: MetricsKind,

    /// Path the scrape handler should be mounted at. Defaults to `/metrics`.
    pub http_endpoint: String,

    /// Custom scrape handler. `None` serves the backend's own exposition.
    pub http_handler: Option<HttpHandler>,

    /// Ordered namespace segments prepended to derived metric names.
    pub prefixes: Vec<String>,

    /// Registry the Prometheus backend registers into. `None` gives the
    /// collection a registry of its own.
    pub registry: Option<prometheus::Registry>,
}

impl Default for InstrumentorConfig {
    fn default() -> Self {
        // ---
        Self {
            kind: MetricsKind::default(),
            http_endpoint: DEFAULT_HTTP_ENDPOINT.to_string(),
            http_handler: None,
            prefixes: Vec::new(),
            registry: None,
        }
    }
}

impl fmt::Debug for InstrumentorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ---
        f.debug_struct("InstrumentorConfig")
            .field("kind", &self.kind)
            .field("http_endpoint", &self.http_endpoint)
            .field("custom_http_handler", &self.http_handler.is_some())
            .field("prefixes", &self.prefixes)
            .field("shared_registry", &self.registry.is_some())
            .finish()
    }
}

impl InstrumentorConfig {
    // ---
    /// Loads configuration from the environment.
    ///
    /// - `INSTRUMENTOR_KIND`: `memory` (default) or `prometheus`
    /// - `INSTRUMENTOR_HTTP_ENDPOINT`: defaults to `/metrics`
    /// - `INSTRUMENTOR_PREFIXES`: comma-separated, blank segments dropped
    ///
    /// # Errors
    /// Returns an error for an unrecognised kind or an invalid endpoint.
    pub fn from_env() -> Result<Self> {
        // ---
        let kind: MetricsKind = optional_env!("INSTRUMENTOR_KIND", MetricsKind::default()).parse()?;
        let http_endpoint = optional_env!("INSTRUMENTOR_HTTP_ENDPOINT", DEFAULT_HTTP_ENDPOINT);
        let prefixes = optional_env!("INSTRUMENTOR_PREFIXES", "")
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        let config = Self {
            kind,
            http_endpoint,
            prefixes,
            ..Self::default()
        };
        config.validate()?;

        Ok(config)
    }

    pub fn with_kind(mut self, kind: MetricsKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_http_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.http_endpoint = endpoint.into();
        self
    }

    pub fn with_http_handler(mut self, handler: HttpHandler) -> Self {
        self.http_handler = Some(handler);
        self
    }

    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_registry(mut self, registry: prometheus::Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Checks the settings that would otherwise fail when the handler is mounted.
    pub fn validate(&self) -> std::result::Result<(), Error> {
        // ---
        validate_http_endpoint(&self.http_endpoint)?;
        if self.prefixes.iter().any(String::is_empty) {
            return Err(Error::invalid_config("prefixes must not contain empty segments"));
        }
        Ok(())
    }
}

/// Rejects endpoints axum would refuse to route.
///
/// Each segment may hold at most one `{capture}`; a `{*rest}` capture is only
/// allowed in the last segment.
pub(crate) fn validate_http_endpoint(endpoint: &str) -> std::result::Result<(), Error> {
    // ---
    let invalid = |reason: &str| -> std::result::Result<(), Error> {
        Err(Error::invalid_config(format!(
            "HTTP endpoint {reason} (got `{endpoint}`)"
        )))
    };

    if endpoint.is_empty() {
        return Err(Error::invalid_config("HTTP endpoint must not be empty"));
    }
    let Some(path) = endpoint.strip_prefix('/') else {
        return invalid("must start with `/`");
    };

    let segments: Vec<&str> = path.split('/').collect();
    for (index, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') || segment.starts_with('*') {
            return invalid("segments must not start with `:` or `*`; use `{name}` captures");
        }

        let mut open = None;
        let mut captures = 0;
        for (pos, ch) in segment.char_indices() {
            match (ch, open) {
                ('{', None) => open = Some(pos),
                ('{', Some(_)) => return invalid("has a nested `{`"),
                ('}', None) => return invalid("has an unmatched `}`"),
                ('}', Some(start)) => {
                    let name = &segment[start + 1..pos];
                    if name.is_empty() || name == "*" {
                        return invalid("has an unnamed capture");
                    }
                    if name.starts_with('*') && index + 1 != segments.len() {
                        return invalid("has a `{*rest}` capture before the last segment");
                    }
                    captures += 1;
                    open = None;
                }
                _ => {}
            }
        }
        if open.is_some() {
            return invalid("has an unmatched `{`");
        }
        if captures > 1 {
            return invalid("has more than one capture in a segment");
        }
    }
    Ok(())
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        // ---
        std::env::remove_var("INSTRUMENTOR_KIND");
        std::env::remove_var("INSTRUMENTOR_HTTP_ENDPOINT");
        std::env::remove_var("INSTRUMENTOR_PREFIXES");
    }

    #[test]
    #[serial]
    fn defaults_applied() -> Result<()> {
        // ---
        clear_env();

        let cfg = InstrumentorConfig::from_env()?;
        assert_eq!(cfg.kind, MetricsKind::Memory);
        assert_eq!(cfg.http_endpoint, "/metrics");
        assert!(cfg.prefixes.is_empty());
        assert!(cfg.http_handler.is_none());

        Ok(())
    }

    #[test]
    #[serial]
    fn overrides_defaults() -> Result<()> {
        // ---
        clear_env();
        std::env::set_var("INSTRUMENTOR_KIND", "Prometheus");
        std::env::set_var("INSTRUMENTOR_HTTP_ENDPOINT", "/internal/metrics");
        std::env::set_var("INSTRUMENTOR_PREFIXES", "app, api,,");

        let cfg = InstrumentorConfig::from_env()?;
        assert_eq!(cfg.kind, MetricsKind::Prometheus);
        assert_eq!(cfg.http_endpoint, "/internal/metrics");
        assert_eq!(cfg.prefixes, vec!["app".to_string(), "api".to_string()]);

        clear_env();
        Ok(())
    }

    #[test]
    #[serial]
    fn unknown_kind_fails() {
        // ---
        clear_env();
        std::env::set_var("INSTRUMENTOR_KIND", "statsd");

        assert_invalid_config!(InstrumentorConfig::from_env(), "kind must be one of");

        clear_env();
    }

    #[test]
    #[serial]
    fn relative_endpoint_fails() {
        // ---
        clear_env();
        std::env::set_var("INSTRUMENTOR_HTTP_ENDPOINT", "metrics");

        assert_invalid_config!(InstrumentorConfig::from_env(), "must start with `/`");

        clear_env();
    }

    #[test]
    fn validate_rejects_empty_endpoint_and_prefix() {
        // ---
        let cfg = InstrumentorConfig::default().with_http_endpoint("");
        assert_invalid_config!(cfg.validate(), "must not be empty");

        let cfg = InstrumentorConfig::default().with_prefixes(["app", ""]);
        assert_invalid_config!(cfg.validate(), "empty segments");
    }

    #[test]
    fn endpoint_syntax_axum_refuses_is_rejected() {
        // ---
        assert_invalid_config!(validate_http_endpoint("/:scrape"), "must not start with `:`");
        assert_invalid_config!(validate_http_endpoint("/files/*rest"), "must not start with `:`");
        assert_invalid_config!(validate_http_endpoint("/metrics/{id"), "unmatched `{`");
        assert_invalid_config!(validate_http_endpoint("/metrics/id}"), "unmatched `}`");
        assert_invalid_config!(validate_http_endpoint("/{{id}}"), "nested `{`");
        assert_invalid_config!(validate_http_endpoint("/{}"), "unnamed capture");
        assert_invalid_config!(validate_http_endpoint("/{a}{b}"), "more than one capture");
        assert_invalid_config!(validate_http_endpoint("/{*rest}/metrics"), "before the last segment");
    }

    #[test]
    fn endpoint_syntax_axum_accepts_passes() -> Result<()> {
        // ---
        for endpoint in ["/", "/metrics", "/internal/metrics/", "/{tenant}/metrics", "/raw/{*rest}"] {
            validate_http_endpoint(endpoint)?;
        }
        Ok(())
    }

    #[test]
    fn kind_round_trips_through_serde() -> Result<()> {
        // ---
        assert_eq!(serde_json::to_string(&MetricsKind::Prometheus)?, r#""prometheus""#);
        let kind: MetricsKind = serde_json::from_str(r#""memory""#)?;
        assert_eq!(kind, MetricsKind::Memory);
        assert_eq!(
            "".parse::<MetricsKind>().unwrap_err().to_string(),
            "invalid config: kind must not be empty"
        );
        Ok(())
    }
}
