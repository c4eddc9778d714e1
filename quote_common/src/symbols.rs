//! Ticker symbols and helpers shared between the stream and client.
use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// Trait providing file parsing for symbols.
pub trait SymbolParser {
    /// Parses symbols from a buffered reader.
    ///
    /// Symbols may be separated by commas, whitespace or new lines. Empty
    /// entries are skipped and lines starting with `#` are comments. Order and
    /// duplicates are kept as written.
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<Symbol>, QuoteError>;
}

impl SymbolParser for Symbol {
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<Self>, QuoteError> {
        let mut symbols = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(|e| QuoteError::ParseSymbolsFile(e.to_string()))?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            symbols.extend(
                trimmed_line
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|s| !s.is_empty())
                    .map(Symbol::new),
            );
        }
        Ok(symbols)
    }
}

/// An upper-cased ticker symbol such as `VTI`.
///
/// Construction never fails; any input is accepted and normalized to upper case.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol, upper-casing the input.
    pub fn new(raw: &str) -> Self {
        Symbol(raw.to_uppercase())
    }

    /// Borrow the symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(raw: &str) -> Self {
        Symbol::new(raw)
    }
}

impl From<String> for Symbol {
    fn from(raw: String) -> Self {
        Symbol::new(&raw)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn symbols_are_upper_cased() {
        assert_eq!(Symbol::new("vti").as_str(), "VTI");
        assert_eq!(Symbol::from("Vxus".to_string()).to_string(), "VXUS");
    }

    #[test]
    fn parses_mixed_separators_in_order() {
        let input = "vti, vxus\n# bonds below\n\nbnd  vti\n";
        let symbols = Symbol::parse_from_reader(Cursor::new(input)).unwrap();
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["VTI", "VXUS", "BND", "VTI"]);
    }

    #[test]
    fn empty_input_yields_no_symbols() {
        let symbols = Symbol::parse_from_reader(Cursor::new("\n  \n")).unwrap();
        assert!(symbols.is_empty());
    }
}
