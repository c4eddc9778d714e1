//! Endpoint constants and polling defaults shared by the stream and client.

/// Public YQL endpoint queried when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://query.yahooapis.com/v1/public/yql";
/// Default delay between two polls, in milliseconds.
pub const DEFAULT_FREQUENCY_MS: u64 = 60_000;
/// Default HTTP request timeout, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// YQL table holding the quotes.
pub const QUOTE_TABLE: &str = "yahoo.finance.quotes";
/// Community table store the quote table lives in.
pub const STORE_ENV: &str = "store://datatables.org/alltableswithkeys";
