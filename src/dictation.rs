//! Client for the speech dictation daemon.
//!
//! The daemon listens on a Unix stream socket for a single upper-case
//! command per connection and publishes its state as JSON.
use std::fmt;
use std::io::Write as _;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DictationError;

/// Default daemon socket.
pub const DEFAULT_SOCKET: &str = "/tmp/dictation_daemon.sock";
/// Default status file written by the daemon.
pub const DEFAULT_STATUS_FILE: &str = "/tmp/dictation_status.json";

/// A command understood by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationCommand {
    /// Begin recording.
    Start,
    /// Stop recording.
    Stop,
    /// Flip between recording and idle.
    Toggle,
}

impl fmt::Display for DictationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "START"),
            Self::Stop => write!(f, "STOP"),
            Self::Toggle => write!(f, "TOGGLE"),
        }
    }
}

/// Daemon state as published in the status file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictationStatus {
    /// Whether the daemon is recording.
    #[serde(default)]
    pub active: bool,
    /// Most recent transcribed text.
    #[serde(default)]
    pub text: String,
    /// Last error reported by the daemon.
    #[serde(default)]
    pub error: Option<String>,
}

/// Send `command` to the daemon listening on `socket`.
///
/// # Errors
///
/// Returns [`DictationError::Connect`] if the socket cannot be reached or
/// written.
pub fn send(socket: &Path, command: DictationCommand) -> Result<(), DictationError> {
    let connect_error = |source| DictationError::Connect {
        socket: socket.to_path_buf(),
        source,
    };
    let mut stream = UnixStream::connect(socket).map_err(connect_error)?;
    stream
        .write_all(command.to_string().as_bytes())
        .map_err(connect_error)?;
    tracing::debug!("sent {command} to {}", socket.display());
    Ok(())
}

/// Read the daemon status file.
///
/// # Errors
///
/// Returns [`DictationError::Status`] if the file is missing or not valid
/// status JSON.
pub fn status(path: &Path) -> Result<DictationStatus, DictationError> {
    let status_error = |reason: String| DictationError::Status {
        path: PathBuf::from(path),
        reason,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| status_error(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| status_error(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::io::Read as _;
    use std::os::unix::net::UnixListener;

    #[test]
    fn commands_are_upper_case() {
        assert_eq!(DictationCommand::Start.to_string(), "START");
        assert_eq!(DictationCommand::Stop.to_string(), "STOP");
        assert_eq!(DictationCommand::Toggle.to_string(), "TOGGLE");
    }

    #[test]
    fn send_writes_command_to_socket() {
        let tmp = tempfile::tempdir().unwrap();
        let socket = tmp.path().join("d.sock");
        let listener = UnixListener::bind(&socket).unwrap();

        let reader = std::thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut buf = String::new();
            conn.read_to_string(&mut buf).unwrap();
            buf
        });
        send(&socket, DictationCommand::Toggle).unwrap();
        assert_eq!(reader.join().unwrap(), "TOGGLE");
    }

    #[test]
    fn send_without_daemon_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = send(&tmp.path().join("missing.sock"), DictationCommand::Start).unwrap_err();
        assert!(err.to_string().starts_with("Failed to connect to daemon"));
    }

    #[test]
    fn status_reads_daemon_json() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("status.json");
        std::fs::write(&path, r#"{"active": true, "text": "hello world", "error": null}"#)
            .unwrap();
        let status = status(&path).unwrap();
        assert!(status.active);
        assert_eq!(status.text, "hello world");
        assert_eq!(status.error, None);
    }

    #[test]
    fn status_tolerates_missing_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("status.json");
        std::fs::write(&path, r#"{"error": "model failed"}"#).unwrap();
        let status = status(&path).unwrap();
        assert!(!status.active);
        assert_eq!(status.error.as_deref(), Some("model failed"));
    }

    #[test]
    fn status_missing_file_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            status(&tmp.path().join("nope.json")),
            Err(DictationError::Status { .. })
        ));
    }
}
