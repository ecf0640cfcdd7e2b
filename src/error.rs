//! Error types for topic-cards operations.
//!
//! This module provides the error hierarchy using `thiserror` for parsing,
//! resilient invocation, model clients, I/O, and CLI commands.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for topic-cards operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a caller-supplied `perform` callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Resilient invocation errors (rate gate, retries).
    #[error("invocation error: {0}")]
    Invoke(#[from] InvokeError),

    /// Response parsing errors (strict policy only).
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Model client errors.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Terminal failures of a resilient invocation.
///
/// Transient attempt failures never appear here; they are retried
/// internally and only the last one survives inside `ExhaustedRetries`.
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Called again before the minimum interval elapsed.
    #[error("operation '{operation}' rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Operation key that was gated.
        operation: String,
        /// Remaining time until the gate reopens.
        retry_after: Duration,
    },

    /// Every allowed attempt failed.
    #[error("operation '{operation}' failed after {attempts} attempts: {source}")]
    ExhaustedRetries {
        /// Operation key that was invoked.
        operation: String,
        /// Number of attempts performed.
        attempts: u32,
        /// Error from the final attempt.
        source: BoxError,
    },

    /// Retry or rate-limit settings are unusable.
    #[error("invalid invocation config: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },
}

/// Parsing errors. Only raised under the strict malformed-section policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A heading opened with `**Topic` but never closed with `**`.
    #[error("malformed section {index} at byte offset {offset}: missing closing '**'")]
    MalformedSection {
        /// Zero-based index of the section among all headings.
        index: usize,
        /// Byte offset of the opening token.
        offset: usize,
    },

    /// Unknown malformed-section policy name.
    #[error("unknown malformed-section policy: {name}")]
    UnknownPolicy {
        /// Name of the unknown policy.
        name: String,
    },
}

/// Model client errors.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server answered with a non-success status.
    #[error("model server returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("unreadable model response: {0}")]
    Decode(String),

    /// Scripted client has no replies left.
    #[error("no scripted reply available")]
    Exhausted,

    /// Scripted failure.
    #[error("scripted failure: {0}")]
    Scripted(String),
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "ollama")]
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}
