//! Command-line arguments for the Quote Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, ValueEnum};
use strum_macros::Display;

/// How each received quote is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable log line per quote.
    Text,
    /// One JSON document per line, including the raw quote.
    Json,
}

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Symbols to watch, comma separated. May be repeated.
    #[clap(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Path to a text file with symbols to watch.
    /// Symbols may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub path: Option<String>,

    /// JSON stream configuration; flags below override its values.
    #[clap(long)]
    pub config: Option<String>,

    /// Polling frequency in milliseconds.
    #[clap(long)]
    pub frequency_ms: Option<u64>,

    /// Base URL of the YQL endpoint.
    #[clap(long)]
    pub endpoint: Option<String>,

    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Close the stream after this many quotes.
    #[clap(long)]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbol_lists_and_overrides() {
        let args = Args::parse_from([
            "quote_client",
            "--symbols",
            "vti,vxus",
            "--symbols",
            "bnd",
            "--frequency-ms",
            "1000",
            "--format",
            "json",
            "--limit",
            "3",
        ]);
        assert_eq!(args.symbols, vec!["vti", "vxus", "bnd"]);
        assert_eq!(args.frequency_ms, Some(1000));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.limit, Some(3));
        assert!(args.path.is_none());
    }

    #[test]
    fn defaults_to_text_output() {
        let args = Args::parse_from(["quote_client", "--symbols", "vti"]);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.format.to_string(), "text");
    }
}
