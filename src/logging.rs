use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_NAME: &str = "clockveil.log";

/// Append-only log file in `dir`, created if missing.
pub fn file_appender(dir: &Path) -> Result<RollingFileAppender, String> {
    std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)
        .map_err(|e| e.to_string())
}

/// Initialise logging. The default level is `info`; `debug_logging` in the
/// config raises it to `debug` and lets `RUST_LOG` override the filter.
///
/// Release builds have no console, so events also go to
/// `<log_dir>/clockveil.log`. A log file that cannot be opened is reported
/// on the console layer and otherwise ignored.
pub fn init(debug: bool, log_dir: &Path) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let (file_layer, file_error) = match file_appender(log_dir) {
        Ok(appender) => (
            Some(
                fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(false),
            ),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init();

    if let Some(e) = file_error {
        tracing::warn!("log file in {} unavailable: {e}", log_dir.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn appender_writes_to_named_file_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("Clockveil");

        let mut appender = file_appender(&log_dir).unwrap();
        appender.write_all(b"overlay#1 closed\n").unwrap();
        appender.flush().unwrap();

        let written = std::fs::read_to_string(log_dir.join(LOG_FILE_NAME)).unwrap();
        assert!(written.contains("overlay#1 closed"));
    }
}
