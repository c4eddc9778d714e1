//! Quote Client — polls a YQL quote endpoint for a list of symbols and prints
//! each standardized quote as it arrives. Symbols come from `--symbols` and/or
//! a text file, the stream is configured from an optional JSON file plus CLI
//! overrides, and Ctrl+C closes the stream gracefully so an in-flight fetch is
//! still printed before exit.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --symbols vti,vxus --frequency-ms 5000 --format json
//! quote_client --path ./symbols.txt --limit 10
//! ```
#![warn(missing_docs)]
mod args;

use crate::args::{Args, OutputFormat};
use chrono::Local;
use clap::Parser;
use log::{error, info, warn};
use quote_common::symbols::{Symbol, SymbolParser};
use quote_common::{QuoteError, Result, StandardizedRecord};
use quote_stream::{QuoteStream, StreamConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let config = load_config(&args)?;
    let symbols = collect_symbols(&args)?;
    if symbols.is_empty() {
        return Err(QuoteError::Format(
            "no symbols to watch: pass --symbols or --path".to_string(),
        ));
    }
    info!("Symbols: {:?}", symbols);

    let mut stream = QuoteStream::new(config)?;
    for symbol in &symbols {
        stream.watch(symbol.as_str());
    }

    {
        let handle = stream.handle();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Closing stream...");
            handle.close();
        })
        .map_err(|e| QuoteError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    info!("Client is running. Press Ctrl+C to exit.");
    let mut received = 0usize;
    while let Some(item) = stream.next() {
        match item {
            Ok(record) => {
                print_record(&record, args.format)?;
                received += 1;
                if args.limit == Some(received) {
                    info!("Limit of {} quotes reached, closing stream", received);
                    stream.close();
                }
            }
            Err(e) => {
                error!("Quote stream failed: {}", e);
                return Err(e);
            }
        }
    }
    info!("Stream ended after {} quotes", received);
    Ok(())
}

/// Build the stream configuration from `--config` and the CLI overrides.
fn load_config(args: &Args) -> Result<StreamConfig> {
    let mut config = match &args.config {
        Some(path) => StreamConfig::from_reader(BufReader::new(File::open(normalize_path(path))?))?,
        None => StreamConfig::default(),
    };
    if let Some(frequency_ms) = args.frequency_ms {
        config = config.with_frequency_ms(frequency_ms);
    }
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.as_str());
    }
    config.validate()?;
    Ok(config)
}

/// Symbols from `--symbols` first, then from `--path`, in order.
fn collect_symbols(args: &Args) -> Result<Vec<Symbol>> {
    let mut symbols: Vec<Symbol> = args
        .symbols
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(Symbol::new)
        .collect();

    if let Some(raw_path) = &args.path {
        let file_path = normalize_path(raw_path);
        if !is_file_exist(&file_path) {
            warn!("Symbols file {} not found, skipping", file_path.display());
        } else {
            let file = File::open(&file_path)?;
            symbols.extend(Symbol::parse_from_reader(BufReader::new(file))?);
        }
    }
    Ok(symbols)
}

fn print_record(record: &StandardizedRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(record)?),
        OutputFormat::Text => info!(
            "QUOTE: {} Last={} Change={} Time={}",
            record.symbol().unwrap_or("?"),
            record
                .get_f64("lastTradePriceOnly")
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| "n/a".to_string()),
            record
                .get_f64("percentChange")
                .map(|c| format!("{:+.2}%", c * 100.0))
                .unwrap_or_else(|| "n/a".to_string()),
            Local::now().format("%H:%M:%S"),
        ),
    }
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &PathBuf) -> bool {
    path.exists() && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quotes_from_paths() {
        assert_eq!(normalize_path("  \"./symbols.txt\" "), PathBuf::from("./symbols.txt"));
        assert_eq!(normalize_path("symbols.txt"), PathBuf::from("symbols.txt"));
    }

    #[test]
    fn cli_overrides_config_defaults() {
        let args = Args::parse_from([
            "quote_client",
            "--symbols",
            "vti",
            "--frequency-ms",
            "250",
            "--endpoint",
            "http://localhost:23493",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.frequency_ms, 250);
        assert_eq!(config.endpoint, "http://localhost:23493");
    }

    #[test]
    fn rejects_zero_frequency() {
        let args = Args::parse_from(["quote_client", "--frequency-ms", "0"]);
        assert!(matches!(load_config(&args), Err(QuoteError::Config(_))));
    }

    #[test]
    fn collects_symbols_upper_cased_in_order() {
        let args = Args::parse_from(["quote_client", "--symbols", "vti, ,vxus"]);
        let symbols = collect_symbols(&args).unwrap();
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, vec!["VTI", "VXUS"]);
    }
}
