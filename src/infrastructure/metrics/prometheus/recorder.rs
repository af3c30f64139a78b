use crate::error::Error;
use prometheus::{Encoder, Registry, TextEncoder};

/// Render every metric family gathered from `registry` in Prometheus text format.
pub fn render_metrics(registry: &Registry) -> Result<String, Error> {
    // ---
    let families = registry.gather();
    let encoder = TextEncoder::new();

    let mut buffer = Vec::new();
    encoder.encode(&families, &mut buffer)?;

    String::from_utf8(buffer)
        .map_err(|err| Error::Backend(prometheus::Error::Msg(err.to_string())))
}
