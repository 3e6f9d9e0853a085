//! Common test utilities and logging infrastructure.
//!
//! Import this module in integration tests and call `init_test_logging()`
//! at the start of tests that need logging. Enable output with
//! `RUST_LOG=debug` (or e.g. `RUST_LOG=color_palette::state=trace`).

#![allow(dead_code)]

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Initialize test logging infrastructure.
///
/// Output goes through the test writer so `cargo test` captures it unless
/// `--nocapture` is used. Idempotent.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("color_palette=debug,test=info"));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_test_writer()
                    .with_ansi(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .compact(),
            )
            .try_init()
            .ok();
    });
}
