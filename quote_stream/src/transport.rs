//! Transport collaborator: executes a request URL and yields raw records.
//!
//! The production loop only depends on the [`Transport`] trait. Retry, TLS and
//! timeouts belong to the implementation; the loop adds no deadline of its own.
use log::debug;
use quote_common::{RawRecord, Result};
use reqwest::blocking::Client;

use crate::config::StreamConfig;
use crate::decode::decode_payload;

/// Fetches and decodes one response. Called from the fetch worker thread.
pub trait Transport: Send + Sync + 'static {
    /// Execute `url` and return its records in payload order.
    fn fetch(&self, url: &str) -> Result<Vec<RawRecord>>;
}

/// Blocking HTTP transport backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a client honoring the configured request timeout.
    pub fn new(config: &StreamConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<Vec<RawRecord>> {
        debug!("GET {}", url);
        let body = self.client.get(url).send()?.error_for_status()?.bytes()?;
        decode_payload(&body)
    }
}
