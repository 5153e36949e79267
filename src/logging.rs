//! Process-wide diagnostics.
//!
//! Events go to stderr, which the host routes to its error log. The
//! subscriber is installed once; the fmt layer writes each event with a
//! single locked write, so concurrent rows never interleave within a line.

use std::sync::Once;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::core::config::{self, LogFormat, UdfConfig};
use crate::errors::UdfError;

static INIT: Once = Once::new();

/// Installs the global subscriber described by `config`.
///
/// Does nothing if a global subscriber is already installed.
pub fn setup_logging(config: &UdfConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let _ = match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
}

/// Installs logging from the loader environment on first use.
pub fn init_logging() {
    INIT.call_once(|| match config::loaded() {
        Ok(config) => setup_logging(config),
        Err(e) => {
            setup_logging(&UdfConfig::default());
            warn!("Config error, using defaults: {}", e);
        }
    });
}

/// Emits the single diagnostic line for a failed call.
pub fn report_failure(err: &UdfError) {
    error!(
        operation = err.operation(),
        error = %err,
        "sqs_send_message failed"
    );
}
