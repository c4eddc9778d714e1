//! Decoding of the YQL JSON envelope into raw records.
//!
//! The endpoint answers `{"query":{"results":{"quote": ...}}}` where `quote`
//! is a single object for one symbol and an array for several. Both shapes
//! decode to a list. `results` is `null` when nothing matched.
use log::warn;
use quote_common::{QuoteError, RawRecord, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Envelope {
    query: QueryBlock,
}

#[derive(Debug, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    results: Option<Results>,
}

#[derive(Debug, Deserialize)]
struct Results {
    #[serde(default)]
    quote: Option<OneOrMany>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Value>),
    One(Value),
}

/// Decode a response body into raw records, in payload order.
///
/// Entries that are not JSON objects are skipped with a warning.
pub fn decode_payload(body: &[u8]) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_slice(body)?;
    if value.get("query").is_none() {
        return Err(QuoteError::Decode("response has no `query` member".into()));
    }
    let envelope: Envelope = serde_json::from_value(value)?;

    let entries = match envelope.query.results.and_then(|r| r.quote) {
        None => Vec::new(),
        Some(OneOrMany::One(v)) => vec![v],
        Some(OneOrMany::Many(vs)) => vs,
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(record) => Some(record),
            other => {
                warn!("Skipping malformed quote entry: {}", other);
                None
            }
        })
        .collect())
}
