//!
//! Common types and utilities shared by the quote stream and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `symbols` — upper-cased symbol type and symbol-file parsing.
//! - `record` — raw and standardized quote records plus the normalizer.
//! - `query` — YQL request URL builder for the quote endpoint.
//! - `net` — endpoint constants and polling defaults.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod query;
pub mod record;
pub mod result;
pub mod symbols;

pub use error::QuoteError;
pub use record::{RawRecord, StandardizedRecord};
pub use result::Result;
pub use symbols::Symbol;
