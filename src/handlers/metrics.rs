use crate::domain::HttpHandler;
use crate::error::Error;
use axum::{http::StatusCode, response::IntoResponse, routing::get};

/// Content type of the Prometheus text exposition format.
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Builds a `GET` handler that serves whatever `render` produces.
///
/// Backends pass a closure over their own registry, so the handler stays
/// valid for as long as the router holding it.
pub(crate) fn exposition_handler<R>(render: R) -> HttpHandler
where
    R: Fn() -> Result<String, Error> + Clone + Send + Sync + 'static,
{
    // ---
    get(move || {
        let render = render.clone();
        async move { metrics_response(render()) }
    })
}

/// Turns a rendered exposition into the `/metrics` response.
///
/// Render failures are logged and answered with `500`.
fn metrics_response(rendered: Result<String, Error>) -> Result<impl IntoResponse, StatusCode> {
    // ---
    let metrics_text = rendered.map_err(|err| {
        tracing::error!("Failed to render metrics: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((
        StatusCode::OK,
        [("content-type", EXPOSITION_CONTENT_TYPE)],
        metrics_text,
    ))
}
