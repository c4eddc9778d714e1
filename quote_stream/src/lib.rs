//! Pull-driven stream of standardized stock quotes polled from a YQL endpoint.
//!
//! A [`QuoteStream`] owns one background loop thread. The consumer pulls
//! records (each pull is one unit of demand), adds symbols with
//! [`QuoteStream::watch`] and shuts down with [`QuoteStream::close`]. The loop
//! polls the endpoint on a fixed frequency, never runs two fetches at once,
//! re-polls immediately when the watch list changes, and drains an in-flight
//! fetch before ending the stream.
//!
//! Modules:
//! - `config` — `StreamConfig` and its defaults.
//! - `watch_list` — ordered list of watched symbols.
//! - `scheduler` — cancellable timer with the sticky immediate flag.
//! - `flight` — single-flight guard and the fetch worker.
//! - `transport` / `decode` — HTTP collaborator and payload decoding.
//! - `producer` — the production loop state machine.
//! - `stream` — consumer-facing handle.
#![warn(missing_docs)]
pub mod config;
pub mod decode;
pub mod flight;
pub mod producer;
pub mod scheduler;
pub mod stream;
pub mod transport;
pub mod watch_list;

pub use config::StreamConfig;
pub use stream::{QuoteStream, StreamEvent, StreamHandle};
pub use transport::{HttpTransport, Transport};
