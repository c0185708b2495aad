//! Stderr logging bootstrap
//!
//! Library code only uses the `log` macros; the binary starts the backend
//! once. `RUST_LOG` overrides the level chosen from the command line. Lines
//! are written with the progress bars suspended so the two never interleave.

use crate::io::error::{FusionError, Result};
use flexi_logger::writers::LogWriter;
use flexi_logger::{DeferredNow, Logger, LoggerHandle, default_format};
use indicatif::MultiProgress;
use log::Record;
use std::io::Write;

/// Log sink that clears progress bars around each stderr line
pub struct ProgressLogWriter {
    multi_progress: MultiProgress,
}

impl ProgressLogWriter {
    /// Write through the bars managed by `multi_progress`
    pub const fn new(multi_progress: MultiProgress) -> Self {
        Self { multi_progress }
    }
}

impl LogWriter for ProgressLogWriter {
    fn write(&self, now: &mut DeferredNow, record: &Record<'_>) -> std::io::Result<()> {
        let mut line = Vec::new();
        default_format(&mut line, now, record)?;
        line.push(b'\n');
        self.multi_progress
            .suspend(|| std::io::stderr().lock().write_all(&line))
    }

    fn flush(&self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}

/// Start logging to stderr with `level` unless `RUST_LOG` is set
///
/// `multi_progress` must be the display any progress bars are added to. The
/// returned handle must stay alive for the rest of the run.
///
/// # Errors
///
/// Returns [`FusionError::Logging`] if the log filter is invalid or a
/// logger is already installed
pub fn init_logging(level: &str, multi_progress: MultiProgress) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(level)
        .and_then(|logger| {
            logger
                .log_to_writer(Box::new(ProgressLogWriter::new(multi_progress)))
                .start()
        })
        .map_err(|e| FusionError::Logging {
            reason: e.to_string(),
        })
}
