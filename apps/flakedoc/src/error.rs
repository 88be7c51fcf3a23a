//! Error types for flakedoc.
//!
//! Per-file flake8 failures are carried as values inside a batch; everything
//! else (configuration, IO, bad patterns) aborts the command.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for flakedoc operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// A config file exists but could not be parsed.
    #[error("failed to parse config {path}: {message}")]
    ConfigParse {
        /// Path to the offending config file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A configured or CLI-provided value is not acceptable.
    #[error("invalid value for {key}: '{value}' (expected {expected})")]
    InvalidValue {
        /// Name of the setting.
        key: &'static str,
        /// The rejected value.
        value: String,
        /// Human readable list of accepted values.
        expected: &'static str,
    },

    /// A glob pattern from `patterns` or `exclude` is malformed.
    #[error("invalid glob pattern '{pattern}': {message}")]
    Pattern {
        /// The pattern as written.
        pattern: String,
        /// Why glob rejected it.
        message: String,
    },

    // === Input Errors ===
    /// A file named on the command line does not exist.
    #[error("no such file: {0}")]
    MissingFile(PathBuf),

    /// Two outputs would be written to the same file in the report directory.
    #[error("report name clash: '{first}' and '{second}' both map to {name}")]
    ReportNameClash {
        /// Flattened file name inside the output directory.
        name: String,
        /// Source (or output) that claimed the name first.
        first: String,
        /// Source that collided with it.
        second: String,
    },

    // === Tool Errors ===
    /// The flake8 executable could not be spawned.
    #[error("could not run '{bin}': {source}. Is flake8 installed and on PATH?")]
    ToolMissing {
        /// Executable that was attempted.
        bin: String,
        /// The spawn error.
        #[source]
        source: std::io::Error,
    },

    /// flake8 exited with a status other than 0 (clean) or 1 (findings).
    #[error("flake8 failed on {file} (status {status}): {stderr}")]
    ToolFailed {
        /// File being analysed.
        file: String,
        /// Exit status as printed, or "signal" when killed.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    // === I/O Errors ===
    /// File system operation on a known path failed.
    #[error("I/O error on {path}: {source}")]
    PathIo {
        /// Path involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for flakedoc operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an IO error with the path it concerns.
    #[must_use]
    pub fn path_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathIo {
            path: path.into(),
            source,
        }
    }

    /// Check if this error comes from the flake8 process rather than from flakedoc.
    #[must_use]
    pub fn is_tool_error(&self) -> bool {
        matches!(self, Self::ToolMissing { .. } | Self::ToolFailed { .. })
    }
}
