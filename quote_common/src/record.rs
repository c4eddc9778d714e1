//! Quote records and the normalizer that standardizes them.
//!
//! A `RawRecord` is one quote object exactly as the endpoint delivered it, with
//! PascalCase keys (`YearHigh`) and string values (`"110.09"`, `"+0.07%"`).
//! [`standardize`] turns it into a `StandardizedRecord`:
//!
//! - keys are re-cased to camelCase (`YearHigh` -> `yearHigh`);
//! - strings matching `^[+-]?[0-9.]+$` become numbers;
//! - strings matching `^[+-]?[0-9.]+%$` become fractions (`"0.07%"` -> `0.0007`);
//! - everything else, including strings that look numeric but fail to parse
//!   (`"1.2.3"`), is kept unchanged.
//!
//! The untouched raw record travels with the standardized one and serializes
//! under the reserved `_quote` key. Camel-casing strips underscores, so no
//! standardized field can collide with it.
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Reserved key under which the raw record is serialized.
pub const RAW_KEY: &str = "_quote";

/// One quote object as delivered by the endpoint.
pub type RawRecord = Map<String, Value>;

/// Re-keyed, re-typed view of a [`RawRecord`] that keeps the original.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardizedRecord {
    #[serde(flatten)]
    fields: Map<String, Value>,
    #[serde(rename = "_quote")]
    raw: RawRecord,
}

impl StandardizedRecord {
    /// Standardized value for a camelCase key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Numeric value for a camelCase key, if it was standardized to a number.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    /// String value for a camelCase key, if it stayed a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// The `symbol` field, when the endpoint provided one.
    pub fn symbol(&self) -> Option<&str> {
        self.get_str("symbol")
    }

    /// All standardized fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The original record, untouched.
    pub fn raw(&self) -> &RawRecord {
        &self.raw
    }

    /// Consume the record and return the original.
    pub fn into_raw(self) -> RawRecord {
        self.raw
    }
}

impl From<RawRecord> for StandardizedRecord {
    fn from(raw: RawRecord) -> Self {
        standardize(raw)
    }
}

/// Standardize one raw record. Never fails.
pub fn standardize(raw: RawRecord) -> StandardizedRecord {
    let fields = raw
        .iter()
        .map(|(key, value)| (camel_case(key), standardize_value(value)))
        .collect();
    StandardizedRecord { fields, raw }
}

/// Re-type a single value; non-string and non-numeric values pass through.
pub fn standardize_value(value: &Value) -> Value {
    match value {
        Value::String(s) => parse_numeric(s)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

fn parse_numeric(s: &str) -> Option<f64> {
    if is_numeric_literal(s) {
        return s.parse().ok();
    }
    match s.strip_suffix('%') {
        Some(body) if is_numeric_literal(body) => body.parse::<f64>().ok().map(|v| v / 100.0),
        _ => None,
    }
}

/// `^[+-]?[0-9.]+$`
fn is_numeric_literal(s: &str) -> bool {
    let body = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    !body.is_empty() && body.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Convert a field name to camelCase.
///
/// Words are split on non-alphanumeric characters, on lower-to-upper and
/// digit-to-upper transitions, and before the last capital of an acronym
/// (`PERatio` -> `peRatio`). Already camelCased keys are returned unchanged.
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, word) in split_words(key).iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn split_words(key: &str) -> Vec<String> {
    let chars: Vec<char> = key.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
