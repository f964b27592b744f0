#![forbid(unsafe_code)]

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Installs the global subscriber. Filter comes from `TODO_LOG`
/// (e.g. `TODO_LOG=todo_server=debug,todo_storage=debug`), default `info`.
/// Logs go to stderr so `stats` output on stdout stays machine-readable.
pub(crate) fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("TODO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
