//! Production loop: the polling state machine behind a `QuoteStream`.
//!
//! One thread owns the watch list, the scheduler, the single-flight guard and
//! the consumer buffer, so no locking is needed. Crossbeam `select!`
//! multiplexes the three inputs:
//!
//! - `Control` messages from the consumer handles (watch, demand, close);
//! - the scheduler's timer;
//! - events from the outstanding fetch worker.
//!
//! State progression:
//!
//! ```text
//! Idle --demand--> Running --timer + guard--> Requesting --finished--> Running
//!   \                 \                           \
//!    close             close                      close (deferred until finished)
//!     v                 v                           v
//!   Closed <---------- Closing <------------------- Closing
//! ```
//!
//! Backpressure works on two levels. A fetch only starts while the consumer
//! is waiting for a record; a timer that fires while the consumer is busy
//! marks the poll as due and pauses the loop, and the next unmet demand polls
//! at once. A push is also rejected once `buffer_capacity` records wait for
//! the consumer (the current fetch still runs to completion); polling then
//! resumes on the next unmet demand at the normal frequency.
//! A demand answered from the buffer never starts a poll.
//!
//! A fetch failure or a guard violation ends the stream with a single
//! `StreamEvent::Error`; no `End` follows it.
use std::collections::VecDeque;

use crossbeam_channel::{Receiver, RecvError, Sender, never, select};
use log::{debug, error, info, warn};
use quote_common::record::standardize;
use quote_common::{QuoteError, Symbol};
use strum_macros::Display;

use crate::config::StreamConfig;
use crate::flight::{FetchEvent, SingleFlight};
use crate::scheduler::Scheduler;
use crate::stream::StreamEvent;
use crate::watch_list::WatchList;

/// Message sent by a consumer handle to the loop.
#[derive(Debug, Clone)]
pub enum Control {
    /// Append a symbol and poll as soon as possible.
    Watch(Symbol),
    /// The consumer wants one more event.
    Demand,
    /// Stop polling, drain the in-flight fetch, then end.
    Close,
}

/// Observable state of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LoopState {
    /// No consumer demand (yet, or since backpressure).
    Idle,
    /// Demand present, waiting for the timer.
    Running,
    /// A fetch is outstanding.
    Requesting,
    /// Close requested, waiting for the in-flight fetch.
    Closing,
    /// Terminal.
    Closed,
}

/// The polling state machine. Consumed by [`ProductionLoop::run`].
pub struct ProductionLoop {
    config: StreamConfig,
    watch_list: WatchList,
    scheduler: Scheduler,
    flight: SingleFlight,
    running: bool,
    closing: bool,
    closed: bool,
    buffer: VecDeque<StreamEvent>,
    demand: usize,
    started: bool,
    poll_due: bool,
    fetches: u64,
    control_rx: Receiver<Control>,
    events_tx: Sender<StreamEvent>,
}

impl ProductionLoop {
    /// Build an idle loop.
    pub fn new(
        config: StreamConfig,
        flight: SingleFlight,
        control_rx: Receiver<Control>,
        events_tx: Sender<StreamEvent>,
    ) -> Self {
        Self {
            scheduler: Scheduler::new(config.frequency()),
            config,
            watch_list: WatchList::new(),
            flight,
            running: false,
            closing: false,
            closed: false,
            buffer: VecDeque::new(),
            demand: 0,
            started: false,
            poll_due: false,
            fetches: 0,
            control_rx,
            events_tx,
        }
    }

    /// Current state.
    pub fn state(&self) -> LoopState {
        if self.closed {
            LoopState::Closed
        } else if self.closing {
            LoopState::Closing
        } else if self.flight.is_in_flight() {
            LoopState::Requesting
        } else if self.running {
            LoopState::Running
        } else {
            LoopState::Idle
        }
    }

    /// Serve inputs until closed, then hand every pending event to the consumer.
    pub fn run(mut self) {
        info!(
            "Quote stream started: endpoint={} frequency={}ms",
            self.config.endpoint, self.config.frequency_ms
        );

        while !self.closed {
            let before = self.state();
            let control = self.control_rx.clone();
            let timer = self.scheduler.timer();
            let fetch = self.flight.events();
            select! {
                recv(control) -> msg => match msg {
                    Ok(control) => self.on_control(control),
                    Err(_) => self.on_handles_dropped(),
                },
                recv(timer) -> _ => self.on_timer(),
                recv(fetch) -> event => self.on_fetch_event(event),
            }
            let after = self.state();
            if after != before {
                debug!("State {} -> {}", before, after);
            }
        }

        for event in self.buffer.drain(..) {
            if self.events_tx.send(event).is_err() {
                break;
            }
        }
        info!("Quote stream closed after {} fetches", self.fetches);
    }

    fn on_control(&mut self, control: Control) {
        match control {
            Control::Watch(symbol) => self.watch(symbol),
            Control::Demand => self.on_demand(),
            Control::Close => self.close(),
        }
    }

    fn watch(&mut self, symbol: Symbol) {
        debug!("Watching {}", symbol);
        self.watch_list.push(symbol);
        self.schedule(true);
    }

    fn on_demand(&mut self) {
        self.demand += 1;
        self.flush();
        if self.closing || self.running || self.demand == 0 {
            return;
        }
        // Immediate on the very first demand, or when a poll came due while
        // the consumer was busy.
        let immediate = !self.started || self.poll_due;
        self.started = true;
        self.running = true;
        self.schedule(immediate);
    }

    fn on_handles_dropped(&mut self) {
        debug!("All stream handles dropped, closing");
        self.control_rx = never();
        self.close();
    }

    fn on_timer(&mut self) {
        self.scheduler.fired();
        if self.closing {
            return;
        }
        if self.demand == 0 {
            debug!("Consumer busy, poll deferred until next demand");
            self.running = false;
            self.poll_due = true;
            return;
        }
        if !self.flight.can_run(&self.watch_list) {
            debug!(
                "Poll skipped: in_flight={} watched={}",
                self.flight.is_in_flight(),
                self.watch_list.len()
            );
            return;
        }
        self.start_fetch();
    }

    fn start_fetch(&mut self) {
        match self.flight.run(&self.watch_list, &self.config.endpoint) {
            Ok(request) => {
                self.fetches += 1;
                info!(
                    "Fetch #{} started for {} symbols",
                    self.fetches,
                    self.watch_list.len()
                );
                debug!("Fetch URL: {}", request.url());
                self.scheduler.fetch_started();
                self.poll_due = false;
            }
            Err(e) => self.fail(e),
        }
    }

    fn on_fetch_event(&mut self, event: Result<FetchEvent, RecvError>) {
        match event {
            Ok(FetchEvent::Record(raw)) => {
                if !self.push(StreamEvent::Record(standardize(raw))) {
                    debug!("Consumer buffer full, pausing polls");
                    self.running = false;
                }
            }
            Ok(FetchEvent::Finished) => {
                if let Some(request) = self.flight.complete() {
                    debug!("Fetch finished in {:?}", request.started_at().elapsed());
                }
                if self.closing {
                    self.finish();
                } else {
                    self.schedule(false);
                }
            }
            Ok(FetchEvent::Failed(e)) => {
                self.flight.complete();
                self.fail(e);
            }
            Err(RecvError) => {
                self.flight.complete();
                self.fail(QuoteError::FetchAborted);
            }
        }
    }

    fn schedule(&mut self, immediate: bool) {
        let active = self.running && !self.closing;
        if let Some(delay) = self.scheduler.schedule(immediate, active) {
            debug!("Next poll in {:?}", delay);
        }
    }

    fn close(&mut self) {
        if self.closing {
            return;
        }
        self.closing = true;
        self.scheduler.cancel();
        if self.flight.is_in_flight() {
            info!("Close requested, draining in-flight fetch");
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.running = false;
        self.scheduler.cancel();
        self.buffer.push_back(StreamEvent::End);
        self.closed = true;
    }

    fn fail(&mut self, e: QuoteError) {
        error!("Quote stream failed: {}", e);
        self.running = false;
        self.closing = true;
        self.scheduler.cancel();
        self.buffer.push_back(StreamEvent::Error(e));
        self.closed = true;
    }

    /// Queue an event for the consumer. Returns false when the consumer has
    /// no room for more.
    fn push(&mut self, event: StreamEvent) -> bool {
        if self.closed {
            warn!("Dropping event pushed after close");
            return false;
        }
        self.buffer.push_back(event);
        self.flush();
        self.buffer.len() < self.config.buffer_capacity
    }

    fn flush(&mut self) {
        while self.demand > 0 {
            let Some(event) = self.buffer.pop_front() else {
                break;
            };
            self.demand -= 1;
            if self.events_tx.send(event).is_err() {
                debug!("Consumer receiver dropped");
            }
        }
    }
}
