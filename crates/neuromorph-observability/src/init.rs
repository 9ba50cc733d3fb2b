// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::CrateDebugFlags;

/// Keeps logging resources alive (file writers flush on drop)
#[derive(Debug)]
pub struct LoggingGuard {
    installed: bool,
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl LoggingGuard {
    /// False when another global subscriber was already installed
    pub fn installed(&self) -> bool {
        self.installed
    }
}

fn build_filter(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<EnvFilter> {
    let filter = debug_flags.to_filter_string(&default_level.to_lowercase());
    EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter))
}

/// Initialize console logging on stderr
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags
/// * `default_level` - Level for everything not covered by a flag (trace, debug, info, warn, error)
///
/// Calling it again once a subscriber is installed leaves the existing one in place.
pub fn init_logging(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<LoggingGuard> {
    let filter = build_filter(debug_flags, default_level)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();
    Ok(LoggingGuard {
        installed,
        #[cfg(feature = "file-logging")]
        _file_guard: None,
    })
}

/// Initialize console logging plus a `neuromorph.log` file in `log_dir`
#[cfg(feature = "file-logging")]
pub fn init_logging_with_file(
    debug_flags: &CrateDebugFlags,
    default_level: &str,
    log_dir: &std::path::Path,
) -> Result<LoggingGuard> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, "neuromorph.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(build_filter(debug_flags, default_level)?);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_filter(build_filter(debug_flags, default_level)?);

    let installed = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    Ok(LoggingGuard {
        installed,
        _file_guard: Some(guard),
    })
}
