//! Wall-clock round timers
//!
//! `Stopwatch` counts up with pause-resistant accounting: on every start
//! it records a synthetic start instant `now - already_elapsed`, so a
//! pause of any length leaves the reported elapsed time unchanged.
//! `Countdown` counts whole seconds down and fires completion exactly
//! once, no matter how many late ticks arrive.

use serde::{Deserialize, Serialize};

/// Elapsed-time tracker with start/pause/resume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    /// Synthetic start instant while running (`now - elapsed` at start)
    start_ms: Option<f64>,
    /// Elapsed time banked across pauses
    banked_ms: f64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.start_ms.is_some()
    }

    /// Start or resume counting from `now`.
    pub fn start(&mut self, now_ms: f64) {
        if self.start_ms.is_none() {
            self.start_ms = Some(now_ms - self.banked_ms);
        }
    }

    /// Stop counting; elapsed time is banked until the next start.
    pub fn pause(&mut self, now_ms: f64) {
        if let Some(start) = self.start_ms.take() {
            self.banked_ms = now_ms - start;
        }
    }

    /// Elapsed milliseconds as of `now`.
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        match self.start_ms {
            Some(start) => now_ms - start,
            None => self.banked_ms,
        }
    }

    pub fn reset(&mut self) {
        self.start_ms = None;
        self.banked_ms = 0.0;
    }
}

/// Per-round countdown in whole seconds.
///
/// `tick()` is called once per second by the shell; it returns `true`
/// exactly once, on the tick that reaches zero. Further ticks are inert,
/// which guards the completion handler against double invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    remaining_secs: u32,
    finished: bool,
}

impl Countdown {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            remaining_secs: duration_secs,
            finished: duration_secs == 0,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance one second. Returns `true` only on the finishing tick.
    pub fn tick(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.finished = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn stopwatch_counts_while_running() {
        let mut sw = Stopwatch::new();
        sw.start(1000.0);
        assert_eq!(sw.elapsed_ms(1250.0), 250.0);
        assert_eq!(sw.elapsed_ms(2000.0), 1000.0);
    }

    #[test]
    fn stopwatch_pause_freezes_elapsed() {
        let mut sw = Stopwatch::new();
        sw.start(0.0);
        sw.pause(400.0);
        assert_eq!(sw.elapsed_ms(10_000.0), 400.0);
    }

    #[test]
    fn stopwatch_double_start_is_inert() {
        let mut sw = Stopwatch::new();
        sw.start(0.0);
        sw.start(500.0);
        assert_eq!(sw.elapsed_ms(600.0), 600.0);
    }

    #[test]
    fn countdown_fires_exactly_once() {
        let mut cd = Countdown::new(2);
        assert!(!cd.tick());
        assert!(cd.tick());
        assert!(cd.is_finished());
        assert!(!cd.tick());
        assert_eq!(cd.remaining_secs(), 0);
    }

    #[test]
    fn zero_duration_countdown_starts_finished() {
        let mut cd = Countdown::new(0);
        assert!(cd.is_finished());
        assert!(!cd.tick());
    }

    proptest! {
        /// Pausing for any duration and resuming leaves elapsed time as
        /// if the pause never happened.
        #[test]
        fn pause_resume_round_trip(
            run1 in 0.0f64..1e6,
            pause in 0.0f64..1e6,
            run2 in 0.0f64..1e6,
        ) {
            let mut sw = Stopwatch::new();
            sw.start(0.0);
            sw.pause(run1);
            sw.start(run1 + pause);
            let elapsed = sw.elapsed_ms(run1 + pause + run2);
            prop_assert!((elapsed - (run1 + run2)).abs() < 1e-6);
        }
    }
}
