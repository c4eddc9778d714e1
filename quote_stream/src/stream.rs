//! Consumer-facing handle over the production loop.
//!
//! Each [`QuoteStream`] spawns its own loop thread; instances share nothing.
//! Pulling (`next_event` or `Iterator::next`) signals one unit of demand and
//! blocks for the next event. `End` or `Error` is always the last event.
//!
//! ```no_run
//! use quote_stream::{QuoteStream, StreamConfig};
//!
//! let mut stream = QuoteStream::new(StreamConfig::default())?;
//! stream.watch("vti");
//! for record in stream.by_ref().take(3) {
//!     let record = record?;
//!     println!("{:?} {:?}", record.symbol(), record.get_f64("lastTradePriceOnly"));
//! }
//! stream.close();
//! # Ok::<(), quote_common::QuoteError>(())
//! ```
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::debug;
use quote_common::{QuoteError, Result, StandardizedRecord, Symbol};

use crate::config::StreamConfig;
use crate::flight::SingleFlight;
use crate::producer::{Control, ProductionLoop};
use crate::transport::{HttpTransport, Transport};

/// Signal delivered to the consumer.
#[derive(Debug)]
pub enum StreamEvent {
    /// One standardized quote.
    Record(StandardizedRecord),
    /// The stream failed; nothing follows.
    Error(QuoteError),
    /// The stream closed normally; nothing follows.
    End,
}

/// Cloneable handle to watch symbols or close the stream from any thread.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    control_tx: Sender<Control>,
}

impl StreamHandle {
    /// Watch `symbol` (case-insensitive) and poll as soon as possible.
    pub fn watch(&self, symbol: &str) {
        self.send(Control::Watch(Symbol::new(symbol)));
    }

    /// Request shutdown. Any in-flight fetch is delivered before the end.
    pub fn close(&self) {
        self.send(Control::Close);
    }

    fn send(&self, control: Control) {
        if let Err(e) = self.control_tx.send(control) {
            debug!("Stream already closed, ignoring {:?}", e.into_inner());
        }
    }
}

/// Pull-driven stream of standardized quotes.
pub struct QuoteStream {
    handle: StreamHandle,
    events_rx: Receiver<StreamEvent>,
    finished: bool,
}

impl QuoteStream {
    /// Create a stream that polls over HTTP.
    pub fn new(config: StreamConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }

    /// Create a stream over a custom transport.
    pub fn with_transport<T: Transport>(config: StreamConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let (control_tx, control_rx) = unbounded::<Control>();
        let (events_tx, events_rx) = unbounded::<StreamEvent>();
        let flight = SingleFlight::new(Arc::new(transport));
        let production = ProductionLoop::new(config, flight, control_rx, events_tx);

        thread::Builder::new()
            .name("quote-stream".into())
            .spawn(move || production.run())?;

        Ok(Self {
            handle: StreamHandle { control_tx },
            events_rx,
            finished: false,
        })
    }

    /// Watch `symbol` (case-insensitive) and poll as soon as possible.
    pub fn watch(&self, symbol: &str) {
        self.handle.watch(symbol);
    }

    /// Request shutdown. Any in-flight fetch is delivered before the end.
    pub fn close(&self) {
        self.handle.close();
    }

    /// A handle usable from other threads.
    pub fn handle(&self) -> StreamHandle {
        self.handle.clone()
    }

    /// Signal demand and block for the next event.
    ///
    /// Returns `None` once `End` or `Error` has been observed.
    pub fn next_event(&mut self) -> Option<StreamEvent> {
        if self.finished {
            return None;
        }
        self.handle.send(Control::Demand);
        match self.events_rx.recv() {
            Ok(event) => {
                if !matches!(event, StreamEvent::Record(_)) {
                    self.finished = true;
                }
                Some(event)
            }
            Err(_) => {
                self.finished = true;
                None
            }
        }
    }

    /// True once the terminal event has been observed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Iterator for QuoteStream {
    type Item = Result<StandardizedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event()? {
            StreamEvent::Record(record) => Some(Ok(record)),
            StreamEvent::Error(e) => Some(Err(e)),
            StreamEvent::End => None,
        }
    }
}

impl Drop for QuoteStream {
    fn drop(&mut self) {
        if !self.finished {
            self.handle.close();
        }
    }
}
