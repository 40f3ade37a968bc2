//! Thin structured logger used by command handlers.
use std::path::PathBuf;

use super::subscriber::STAGE_TARGET;
use super::utils::log_file_path;

/// Structured logger for command handlers.
///
/// All messages are written to a persistent log file at
/// `$XDG_CACHE_HOME/deskutil/<command>.log` (default `~/.cache/deskutil/<command>.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
/// Callers must never pass secret values to any of these methods.
#[derive(Debug)]
pub struct Logger {
    command: String,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// The log file itself is created by
    /// [`init_subscriber`](super::subscriber::init_subscriber); this
    /// constructor only remembers its path.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            log_file: log_file_path(command),
        }
    }

    /// Name of the command being logged.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!(command = %self.command, "{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!(command = %self.command, "{msg}");
    }

    /// Log a stage header (major step of a command).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, command = %self.command, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!(command = %self.command, "{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!(command = %self.command, "{msg}");
    }
}
