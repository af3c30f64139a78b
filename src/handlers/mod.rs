// Gateway module - controls the HTTP surface exposed to an external server
// Modules are private, only exported symbols are public

mod metrics;

pub(crate) use metrics::exposition_handler;
