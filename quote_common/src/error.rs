//! Error types shared between the stream library and the client.
//!
//! The `QuoteError` enum unifies transport, decoding, configuration and
//! internal logic failures, allowing crates to propagate a single error type.
//! It is `Send` so it can travel from the fetch worker to the consumer.
use std::io;

use thiserror::Error;

/// Unified error type shared by every crate in the workspace.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from the standard library (files, thread spawning).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP transport failure: connect, TLS, timeout or a non-success status.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure while decoding JSON via serde_json (payload or config file).
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Payload is valid JSON but does not have the expected envelope.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Error while parsing a symbols file.
    #[error("Parse symbols file error: {0}")]
    ParseSymbolsFile(String),

    /// A fetch was started while the single-flight guard denied it.
    #[error("Internal Logic Error: single-flight guard violated: {0}")]
    GuardViolation(String),

    /// The fetch worker went away without reporting completion.
    #[error("Fetch worker exited without a completion signal")]
    FetchAborted,
}
