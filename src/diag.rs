//! Replaceable diagnostic sink.
//!
//! The reader reports structural problems (corrupt sizes, illegal ids,
//! stray bytes) through a sink together with the position at which they
//! were noticed. The default sink forwards to `tracing`; `NullSink`
//! suppresses output entirely.

use tracing::warn;

/// Receives structural diagnostics from a reader.
pub trait DiagSink {
    fn report(&mut self, pos: u64, msg: &str);
}

/// Default sink: forwards diagnostics to `tracing::warn!`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagSink for TracingSink {
    fn report(&mut self, pos: u64, msg: &str) {
        warn!(pos, "{msg}");
    }
}

/// Sink that discards all diagnostics.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagSink for NullSink {
    fn report(&mut self, _pos: u64, _msg: &str) {}
}
