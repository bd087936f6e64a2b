//! Tracing setup shared by the `server`, `gateway` and `client` binaries.
//!
//! `RUST_LOG` always wins. Without it, our own crates log at `info` while
//! the MongoDB driver and the HTTP/2 stack under tonic stay at `warn`.

use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const QUIET_DEPS: &str = "info,mongodb=warn,h2=warn,tower=warn";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(QUIET_DEPS))
}

/// One compact line per event, for the demo client and local runs.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(filter())
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// JSON events carrying the `rpc`, `event` and `service_id` fields as keys,
/// for the long-running services.
pub fn init_logging_json() {
    // RUST_LOG=info,server::grpc=debug surfaces per-request spans
    let _ = fmt()
        .with_env_filter(filter())
        .with_target(true)
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_writer(io::stdout)
        .try_init();
}
