//! Domain-specific error types for deskutil.
//!
//! Library modules return these typed errors; command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DeskError
//! ├── Tool(ToolError)      : no menu/clipboard/type/tab tool available
//! ├── Store(StoreError)    : credential store access
//! ├── Otp(OtpError)        : otpauth URI parsing and code generation
//! ├── Mail(MailError)      : temporary mailbox provisioning API
//! ├── Toggle(ToggleError)  : PID/lock files for toggle daemons
//! ├── Dictation(DictationError): dictation daemon socket and status
//! └── Config(ConfigError)  : config file loading
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::tools::ToolKind;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum DeskError {
    /// Tool selection error.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Credential store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// One-time password error.
    #[error(transparent)]
    Otp(#[from] OtpError),

    /// Temporary mail error.
    #[error(transparent)]
    Mail(#[from] MailError),

    /// Toggle daemon error.
    #[error(transparent)]
    Toggle(#[from] ToggleError),

    /// Dictation client error.
    #[error(transparent)]
    Dictation(#[from] DictationError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from the ordered tool fallback selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// None of the candidate programs were found on PATH.
    #[error("{kind} tool not found (tried: {})", .tried.join(", "))]
    NotFound {
        /// Which capability was being resolved.
        kind: ToolKind,
        /// Programs probed, in priority order.
        tried: Vec<String>,
    },

    /// A configured command string was empty.
    #[error("empty {kind} command")]
    EmptyCommand {
        /// Which capability the command was configured for.
        kind: ToolKind,
    },
}

/// Errors from the credential store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store directory does not exist.
    #[error("password store not found at {}", .path.display())]
    Missing {
        /// Expected store directory.
        path: PathBuf,
    },

    /// Decrypting an entry failed.
    #[error("failed to retrieve password for '{path}': {reason}")]
    Show {
        /// Entry path.
        path: String,
        /// Message reported by the store tool.
        reason: String,
    },

    /// Writing an entry failed.
    #[error("failed to insert '{path}': {reason}")]
    Insert {
        /// Entry path.
        path: String,
        /// Message reported by the store tool.
        reason: String,
    },

    /// Removing an entry failed.
    #[error("failed to remove '{path}': {reason}")]
    Remove {
        /// Entry path.
        path: String,
        /// Message reported by the store tool.
        reason: String,
    },

    /// The entry already exists and overwriting was not requested.
    #[error("entry '{0}' already exists")]
    Exists(String),

    /// Walking the store directory failed.
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        /// Directory being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors from otpauth URI parsing and code generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    /// The string is not an `otpauth://totp` or `otpauth://hotp` URI.
    #[error("invalid otpauth URI")]
    InvalidUri,
    /// The `secret` parameter is absent.
    #[error("otpauth URI has no secret")]
    MissingSecret,
    /// The secret is not valid base32.
    #[error("secret is not valid base32")]
    InvalidSecret,
    /// Digits other than 6 or 8.
    #[error("digits must be 6 or 8, got {0}")]
    UnsupportedDigits(u32),
    /// Unknown HMAC algorithm.
    #[error("unsupported algorithm '{0}'")]
    UnsupportedAlgorithm(String),
    /// Zero or unparsable period.
    #[error("period must be a positive number of seconds")]
    InvalidPeriod,
}

/// Errors from the temporary mailbox API.
#[derive(Error, Debug)]
pub enum MailError {
    /// Transport or HTTP status failure.
    #[error("request to {url} failed: {reason}")]
    Request {
        /// Requested URL.
        url: String,
        /// Transport or status message.
        reason: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder message.
        reason: String,
    },

    /// The provider offers no active domains.
    #[error("mail provider returned no domains")]
    NoDomains,

    /// A temp-mail entry lacks a field needed to talk to the API.
    #[error("temp mail entry '{path}' has no '{field}' field")]
    MissingField {
        /// Entry path.
        path: String,
        /// Missing field name.
        field: &'static str,
    },
}

/// Errors from toggle daemon bookkeeping.
#[derive(Error, Debug)]
pub enum ToggleError {
    /// The daemon name has no built-in or configured command.
    #[error("unknown toggle daemon '{0}'")]
    Unknown(String),

    /// The configured command is empty.
    #[error("toggle daemon '{0}' has an empty command")]
    EmptyCommand(String),

    /// Reading or writing the state directory failed.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors talking to the dictation daemon.
#[derive(Error, Debug)]
pub enum DictationError {
    /// The daemon socket refused the connection or the write failed.
    #[error("Failed to connect to daemon: {source}")]
    Connect {
        /// Socket path.
        socket: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The status file could not be read or decoded.
    #[error("failed to read dictation status {}: {reason}", .path.display())]
    Status {
        /// Status file path.
        path: PathBuf,
        /// Reader or decoder message.
        reason: String,
    },
}

/// Errors that arise from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML file failed to parse.
    #[error("invalid config {}: {message}", .path.display())]
    InvalidSyntax {
        /// Config file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
