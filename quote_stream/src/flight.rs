//! Single-flight guard: at most one fetch outstanding, none while the watch
//! list is empty.
//!
//! A fetch runs on its own worker thread so the loop keeps serving watch,
//! demand and close messages while the request is in the air. The worker
//! reports through a channel:
//!
//! - `FetchEvent::Record` — one decoded raw record, in payload order;
//! - `FetchEvent::Finished` — the fetch completed (possibly with zero records);
//! - `FetchEvent::Failed` — transport or decode failure.
//!
//! The loop must call [`SingleFlight::complete`] on the terminal event, or on
//! channel disconnect if the worker died, so the guard is released exactly
//! once per fetch.
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, never, unbounded};
use log::debug;
use quote_common::query::build_url;
use quote_common::{QuoteError, RawRecord, Result};

use crate::transport::Transport;
use crate::watch_list::WatchList;

/// Message sent by the fetch worker to the production loop.
#[derive(Debug)]
pub enum FetchEvent {
    /// One decoded record.
    Record(RawRecord),
    /// The fetch ended normally.
    Finished,
    /// The fetch failed.
    Failed(QuoteError),
}

/// The single outstanding fetch.
#[derive(Debug)]
pub struct RequestHandle {
    url: String,
    started_at: Instant,
    events: Receiver<FetchEvent>,
}

impl RequestHandle {
    /// URL fixed when the fetch started.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// When the fetch started.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Owns the transport and the optional outstanding request.
pub struct SingleFlight {
    transport: Arc<dyn Transport>,
    request: Option<RequestHandle>,
}

impl SingleFlight {
    /// Create an idle guard over `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            request: None,
        }
    }

    /// True iff nothing is in flight and something is watched.
    pub fn can_run(&self, watch_list: &WatchList) -> bool {
        self.request.is_none() && !watch_list.is_empty()
    }

    /// True while a fetch is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.request.is_some()
    }

    /// The outstanding request, if any.
    pub fn request(&self) -> Option<&RequestHandle> {
        self.request.as_ref()
    }

    /// Start a fetch for the current watch list.
    ///
    /// Calling this while [`Self::can_run`] is false is a logic error and
    /// returns `QuoteError::GuardViolation`.
    pub fn run(&mut self, watch_list: &WatchList, endpoint: &str) -> Result<&RequestHandle> {
        if !self.can_run(watch_list) {
            return Err(QuoteError::GuardViolation(format!(
                "run requested with request_in_flight={} watched={}",
                self.request.is_some(),
                watch_list.len()
            )));
        }

        let url = build_url(endpoint, watch_list.symbols());
        let (tx, rx) = unbounded::<FetchEvent>();
        let transport = Arc::clone(&self.transport);
        let worker_url = url.clone();

        thread::Builder::new()
            .name("quote-fetch".into())
            .spawn(move || match transport.fetch(&worker_url) {
                Ok(records) => {
                    debug!("Fetch returned {} records", records.len());
                    for record in records {
                        if tx.send(FetchEvent::Record(record)).is_err() {
                            return;
                        }
                    }
                    let _ = tx.send(FetchEvent::Finished);
                }
                Err(e) => {
                    let _ = tx.send(FetchEvent::Failed(e));
                }
            })?;

        Ok(&*self.request.insert(RequestHandle {
            url,
            started_at: Instant::now(),
            events: rx,
        }))
    }

    /// Receiver for the outstanding fetch's events, or never.
    pub fn events(&self) -> Receiver<FetchEvent> {
        self.request
            .as_ref()
            .map(|r| r.events.clone())
            .unwrap_or_else(never)
    }

    /// Release the guard after the fetch's terminal event.
    pub fn complete(&mut self) -> Option<RequestHandle> {
        self.request.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::Symbol;
    use serde_json::json;
    use std::time::Duration;

    struct OneRecord;

    impl Transport for OneRecord {
        fn fetch(&self, _url: &str) -> Result<Vec<RawRecord>> {
            match json!({ "Symbol": "VTI" }) {
                serde_json::Value::Object(map) => Ok(vec![map]),
                _ => unreachable!(),
            }
        }
    }

    struct Broken;

    impl Transport for Broken {
        fn fetch(&self, _url: &str) -> Result<Vec<RawRecord>> {
            Err(QuoteError::Decode("boom".into()))
        }
    }

    fn watching(symbol: &str) -> WatchList {
        let mut list = WatchList::new();
        list.push(Symbol::new(symbol));
        list
    }

    fn next(events: &Receiver<FetchEvent>) -> FetchEvent {
        events.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn denies_empty_watch_list() {
        let mut flight = SingleFlight::new(Arc::new(OneRecord));
        let empty = WatchList::new();
        assert!(!flight.can_run(&empty));
        assert!(matches!(
            flight.run(&empty, "http://localhost"),
            Err(QuoteError::GuardViolation(_))
        ));
        assert!(!flight.is_in_flight());
    }

    #[test]
    fn denies_second_fetch_while_one_is_outstanding() {
        let mut flight = SingleFlight::new(Arc::new(OneRecord));
        let list = watching("vti");
        flight.run(&list, "http://localhost").unwrap();
        assert!(!flight.can_run(&list));
        assert!(matches!(
            flight.run(&list, "http://localhost"),
            Err(QuoteError::GuardViolation(_))
        ));
    }

    #[test]
    fn streams_records_then_finishes() {
        let mut flight = SingleFlight::new(Arc::new(OneRecord));
        let list = watching("vti");
        let url = flight.run(&list, "http://localhost").unwrap().url().to_string();
        assert!(url.contains("%22VTI%22"));

        let events = flight.events();
        assert!(matches!(next(&events), FetchEvent::Record(_)));
        assert!(matches!(next(&events), FetchEvent::Finished));

        assert!(flight.complete().is_some());
        assert!(flight.can_run(&list));
        assert!(flight.complete().is_none());
    }

    #[test]
    fn reports_failures() {
        let mut flight = SingleFlight::new(Arc::new(Broken));
        flight.run(&watching("vti"), "http://localhost").unwrap();
        assert!(matches!(next(&flight.events()), FetchEvent::Failed(_)));
    }
}
