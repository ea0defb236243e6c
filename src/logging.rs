//! Tracing subscriber setup and result logging
//!
//! The engine only emits `tracing` events. Binaries call [`init`] once to
//! install a subscriber; libraries embedding the engine install their own.

use std::any::Any;

use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::domain::entities::ValidationResult;

/// Filter directive for a verbosity count (`-v`, `-vv`, `-vvv`)
pub fn filter_for(config: &LoggingConfig, verbosity: u8) -> EnvFilter {
    match verbosity {
        0 => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Install the global subscriber. Events go to stderr so stdout stays
/// parseable under `--json`.
///
/// A second call is a no-op.
pub fn init(config: &LoggingConfig, verbosity: u8) {
    let filter = filter_for(config, verbosity);
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(verbosity > 1)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if installed.is_err() {
        debug!("tracing subscriber already installed");
    }
}

/// Report panics as `tracing` events instead of the default stderr printer.
///
/// The validator factory catches validator panics and returns a blocked
/// `validator_error` result. Without this hook the runtime still prints the
/// panic to stderr, interleaved with command output. Embedders that want the
/// same behavior call this once at startup; it replaces any previous hook.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!(reason = %panic_message(info.payload()), %location, "panic");
    }));
}

/// Text of a panic payload (`panic!` produces `&str` or `String`)
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Emit one event summarizing a validation decision
pub fn log_result(component_type: &str, uuid: &str, result: &ValidationResult) {
    let status = result.status;
    if result.is_blocked() {
        let reasons: Vec<String> = result.errors.iter().map(|e| e.kind.to_string()).collect();
        warn!(component_type, uuid, %status, ?reasons, "component blocked");
    } else if !result.warnings.is_empty() {
        info!(
            component_type,
            uuid,
            %status,
            warnings = result.warnings.len(),
            "component allowed with warnings"
        );
    } else {
        debug!(component_type, uuid, %status, "component allowed");
    }
}
