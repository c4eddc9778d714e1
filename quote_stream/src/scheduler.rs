//! Poll scheduler with a cancellable timer and a sticky immediate flag.
//!
//! The timer is a `crossbeam_channel::after` receiver: arming creates one,
//! cancelling drops it. The production loop selects on [`Scheduler::timer`].
//!
//! Once an immediate poll is requested it stays pending across any number of
//! `schedule` calls until [`Scheduler::fetch_started`] clears it.
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, after, never};

/// Decides when the next fetch attempt may happen.
#[derive(Debug)]
pub struct Scheduler {
    frequency: Duration,
    timer: Option<Receiver<Instant>>,
    immediate_pending: bool,
}

impl Scheduler {
    /// Create a disarmed scheduler polling every `frequency`.
    pub fn new(frequency: Duration) -> Self {
        Self {
            frequency,
            timer: None,
            immediate_pending: false,
        }
    }

    /// Replace any armed timer.
    ///
    /// `immediate` is merged into the sticky flag. Nothing is armed unless
    /// `running`. Returns the delay of the armed timer.
    pub fn schedule(&mut self, immediate: bool, running: bool) -> Option<Duration> {
        self.immediate_pending |= immediate;
        self.cancel();
        if !running {
            return None;
        }
        let delay = if self.immediate_pending {
            Duration::ZERO
        } else {
            self.frequency
        };
        self.timer = Some(after(delay));
        Some(delay)
    }

    /// Disarm the timer. The sticky flag is kept.
    pub fn cancel(&mut self) {
        self.timer = None;
    }

    /// Receiver that fires when the armed timer expires, or never.
    pub fn timer(&self) -> Receiver<Instant> {
        self.timer.clone().unwrap_or_else(never)
    }

    /// Mark the armed timer as consumed.
    pub fn fired(&mut self) {
        self.timer = None;
    }

    /// A fetch began; the immediate request has been honored.
    pub fn fetch_started(&mut self) {
        self.immediate_pending = false;
    }

    /// True while a timer is armed.
    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// True while an immediate poll is owed.
    pub fn is_immediate_pending(&self) -> bool {
        self.immediate_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FREQUENCY: Duration = Duration::from_secs(60);

    #[test]
    fn arms_nothing_until_running() {
        let mut scheduler = Scheduler::new(FREQUENCY);
        assert_eq!(scheduler.schedule(true, false), None);
        assert!(!scheduler.is_armed());
        assert!(scheduler.is_immediate_pending());
    }

    #[test]
    fn immediate_flag_sticks_until_fetch_starts() {
        let mut scheduler = Scheduler::new(FREQUENCY);
        assert_eq!(scheduler.schedule(true, true), Some(Duration::ZERO));
        assert_eq!(scheduler.schedule(false, true), Some(Duration::ZERO));
        assert_eq!(scheduler.schedule(false, true), Some(Duration::ZERO));

        scheduler.fetch_started();
        assert!(!scheduler.is_immediate_pending());
        assert_eq!(scheduler.schedule(false, true), Some(FREQUENCY));
    }

    #[test]
    fn cancel_keeps_the_sticky_flag() {
        let mut scheduler = Scheduler::new(FREQUENCY);
        scheduler.schedule(true, true);
        scheduler.cancel();
        assert!(!scheduler.is_armed());
        assert_eq!(scheduler.schedule(false, true), Some(Duration::ZERO));
    }

    #[test]
    fn zero_delay_timer_fires() {
        let mut scheduler = Scheduler::new(FREQUENCY);
        scheduler.schedule(true, true);
        assert!(scheduler.timer().recv_timeout(Duration::from_secs(1)).is_ok());
        scheduler.fired();
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn disarmed_timer_never_fires() {
        let scheduler = Scheduler::new(Duration::from_millis(1));
        assert!(scheduler.timer().recv_timeout(Duration::from_millis(20)).is_err());
    }
}
