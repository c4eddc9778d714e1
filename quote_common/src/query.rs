//! YQL request URL builder.
//!
//! The endpoint is asked for
//! `select * from yahoo.finance.quotes where symbol in ("VTI","VXUS")`
//! with JSON output, the community table store and an empty JSONP callback.
//! Output is a pure function of the endpoint and the symbol list.
//!
//! Values are percent-encoded except for the unreserved marks `!'()*`, so the
//! statement reads `select%20*%20from%20...%20in%20(%22VTI%22)`.
use serde_json::Value;

use crate::net::{QUOTE_TABLE, STORE_ENV};

/// Build the YQL statement selecting every symbol, in the given order.
///
/// Each symbol is JSON-quoted, so embedded quotes are escaped.
pub fn yql_statement<S: AsRef<str>>(symbols: &[S]) -> String {
    let quoted: Vec<String> = symbols
        .iter()
        .map(|s| Value::String(s.as_ref().to_string()).to_string())
        .collect();
    format!(
        "select * from {} where symbol in ({})",
        QUOTE_TABLE,
        quoted.join(",")
    )
}

/// Build the full request URL for `endpoint` and `symbols`.
pub fn build_url<S: AsRef<str>>(endpoint: &str, symbols: &[S]) -> String {
    let params = [
        ("q", yql_statement(symbols)),
        ("format", "json".to_string()),
        ("env", STORE_ENV.to_string()),
        ("callback", String::new()),
    ];
    let query: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, escape(value)))
        .collect();
    format!("{}?{}", endpoint, query.join("&"))
}

const UNRESERVED_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

fn escape(value: &str) -> String {
    UNRESERVED_MARKS
        .iter()
        .fold(urlencoding::encode(value).into_owned(), |acc, &(encoded, mark)| {
            acc.replace(encoded, mark)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "http://localhost:23493";
    const ENV: &str = "store%3A%2F%2Fdatatables.org%2Falltableswithkeys";

    fn query_param(url: &str) -> String {
        let encoded = url
            .split_once("?q=")
            .and_then(|(_, rest)| rest.split('&').next())
            .unwrap();
        urlencoding::decode(encoded).unwrap().into_owned()
    }

    #[test]
    fn builds_url_for_a_single_symbol() {
        let url = build_url(ENDPOINT, &["VTI"]);
        let expected = format!(
            "{}?q=select%20*%20from%20yahoo.finance.quotes%20where%20symbol%20in%20(%22VTI%22)\
             &format=json&env={}&callback=",
            ENDPOINT, ENV
        );
        assert_eq!(url, expected);
        assert_eq!(
            query_param(&url),
            r#"select * from yahoo.finance.quotes where symbol in ("VTI")"#
        );
    }

    #[test]
    fn builds_url_for_multiple_symbols_in_order() {
        let url = build_url(ENDPOINT, &["VTI", "VXUS"]);
        assert!(url.contains("in%20(%22VTI%22%2C%22VXUS%22)&format"));
        assert_eq!(
            query_param(&url),
            r#"select * from yahoo.finance.quotes where symbol in ("VTI","VXUS")"#
        );
        assert!(url.ends_with("&format=json&env=store%3A%2F%2Fdatatables.org%2Falltableswithkeys&callback="));
    }

    #[test]
    fn repeated_builds_are_identical() {
        let symbols = vec!["VTI".to_string(), "VXUS".to_string(), "VTI".to_string()];
        assert_eq!(build_url(ENDPOINT, &symbols), build_url(ENDPOINT, &symbols));
    }

    #[test]
    fn keeps_marks_but_escapes_percent() {
        assert_eq!(escape("a*b(c)!'"), "a*b(c)!'");
        assert_eq!(escape("%2A %"), "%252A%20%25");
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(
            yql_statement(&["A\"B"]),
            r#"select * from yahoo.finance.quotes where symbol in ("A\"B")"#
        );
    }
}
