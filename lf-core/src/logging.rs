//! Structured logging for the register.
//!
//! Diagnostics go to stderr so that command output on stdout stays clean
//! for scripting, and to a daily log file under the configured log directory.

use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling;

use crate::constants::LOG_FILE_PREFIX;
use crate::error::{LfError, LfResult};

/// Targets that log every pooled connection checkout; kept at `warn`.
const QUIET_TARGETS: &[&str] = &["r2d2"];

/// Filter directives for a configured level such as "info" or
/// "lf_services=debug". An unparseable level falls back to "info".
pub fn filter_directives(level: &str) -> String {
    let mut directives = if EnvFilter::try_new(level).is_ok() {
        level.to_string()
    } else {
        "info".to_string()
    };
    for target in QUIET_TARGETS {
        if !directives.contains(target) {
            directives.push_str(&format!(",{target}=warn"));
        }
    }
    directives
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::new(filter_directives(level))
}

/// Install the global subscriber: compact stderr output plus a daily log
/// file in `log_dir`, written as JSON lines when `json_output` is set.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_logging(level: &str, log_dir: &Path, json_output: bool) -> LfResult<LogGuard> {
    std::fs::create_dir_all(log_dir)?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE_PREFIX));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let installed = if json_output {
        tracing_subscriber::registry()
            .with(build_filter(level))
            .with(console_layer)
            .with(fmt::layer().with_writer(writer).json().with_target(true))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(build_filter(level))
            .with(console_layer)
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true),
            )
            .try_init()
    };
    installed.map_err(|e| LfError::Config(format!("failed to install log subscriber: {e}")))?;

    tracing::debug!("logging to {}", log_dir.display());
    Ok(LogGuard { _guard: guard })
}

/// Flushes the log file writer on drop.
pub struct LogGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Stderr-only logging, used when the log directory cannot be created.
pub fn init_console_logging(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_quiets_pool_logs() {
        assert_eq!(filter_directives("debug"), "debug,r2d2=warn");
        assert_eq!(filter_directives("info,r2d2=trace"), "info,r2d2=trace");
    }

    #[test]
    fn test_bad_level_falls_back_to_info() {
        assert_eq!(filter_directives("lf_services=loud"), "info,r2d2=warn");
    }

    #[test]
    fn test_console_logging_can_be_called_twice() {
        init_console_logging("debug");
        init_console_logging("info");
    }
}
