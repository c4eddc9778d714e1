//! Stream configuration.
//!
//! `StreamConfig` is immutable once a stream is built. Partial JSON documents
//! are merged with the defaults, so `{"frequencyMs": 1000}` is a valid config.
use std::io::Read;
use std::time::Duration;

use quote_common::net::{DEFAULT_ENDPOINT, DEFAULT_FREQUENCY_MS, DEFAULT_REQUEST_TIMEOUT_MS};
use quote_common::{QuoteError, Result};
use serde::{Deserialize, Serialize};

/// Records that may wait for the consumer before a push is rejected.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1;

/// Options recognized by [`crate::QuoteStream`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamConfig {
    /// Delay between polls, in milliseconds. Must be positive.
    pub frequency_ms: u64,
    /// Base URL of the YQL endpoint.
    pub endpoint: String,
    /// Records buffered for the consumer before backpressure kicks in.
    pub buffer_capacity: usize,
    /// HTTP request timeout in milliseconds; `0` disables it.
    pub request_timeout_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            frequency_ms: DEFAULT_FREQUENCY_MS,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl StreamConfig {
    /// Parse a JSON document, filling absent keys with defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a JSON document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Set the polling frequency.
    pub fn with_frequency_ms(mut self, frequency_ms: u64) -> Self {
        self.frequency_ms = frequency_ms;
        self
    }

    /// Set the endpoint base URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the consumer buffer capacity.
    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.frequency_ms == 0 {
            return Err(QuoteError::Config("frequencyMs must be greater than 0".into()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(QuoteError::Config("endpoint must not be empty".into()));
        }
        if self.buffer_capacity == 0 {
            return Err(QuoteError::Config("bufferCapacity must be greater than 0".into()));
        }
        Ok(())
    }

    /// Polling frequency as a `Duration`.
    pub fn frequency(&self) -> Duration {
        Duration::from_millis(self.frequency_ms)
    }

    /// Request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}
