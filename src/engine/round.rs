//! Round lifecycle primitives

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Current phase of a play-through.
///
/// At most one live round exists per mounted game page; starting a new
/// game discards the previous round wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for the player to press start
    #[default]
    Idle,
    /// Pre-round setup (sequence playback, image loading)
    Preparing,
    /// Active gameplay
    Playing,
    /// Round ended; result reported, modal shown
    Finished,
}

/// One-shot completion latch.
///
/// A countdown hitting zero and a final user action can race to end the
/// same round. The first `trigger()` wins and returns `true`; every
/// later call returns `false`, so completion side effects (result POST,
/// modal) run exactly once.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CompletionLatch {
    fired: bool,
}

impl CompletionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the first caller.
    pub fn trigger(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    pub fn fired(&self) -> bool {
        self.fired
    }
}

/// Liveness guard for one round's deferred callbacks.
///
/// A round start can outlive its round: a text fetch resolves after the
/// player restarted, or after the page was torn down entirely. Each
/// started round owns a fresh guard; deferred work captures a
/// [`RoundToken`] and bails if the token is stale. Dropping the guard
/// (restart or teardown) invalidates every token handed out for that
/// round, so a stale callback can never drive the current game.
#[derive(Debug)]
pub struct RoundGuard {
    alive: Rc<Cell<bool>>,
}

/// Cheap handle checked by deferred callbacks before touching the round.
#[derive(Debug, Clone)]
pub struct RoundToken {
    alive: Rc<Cell<bool>>,
}

impl RoundGuard {
    pub fn new() -> Self {
        Self {
            alive: Rc::new(Cell::new(true)),
        }
    }

    pub fn token(&self) -> RoundToken {
        RoundToken {
            alive: self.alive.clone(),
        }
    }
}

impl Default for RoundGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RoundGuard {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

impl RoundToken {
    pub fn is_live(&self) -> bool {
        self.alive.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_fires_once() {
        let mut latch = CompletionLatch::new();
        assert!(latch.trigger());
        assert!(!latch.trigger());
        assert!(!latch.trigger());
        assert!(latch.fired());
    }

    #[test]
    fn tokens_go_stale_when_guard_drops() {
        let guard = RoundGuard::new();
        let token = guard.token();
        let clone = token.clone();
        assert!(token.is_live());

        drop(guard);
        assert!(!token.is_live());
        assert!(!clone.is_live());
    }

    #[test]
    fn fresh_guard_does_not_revive_old_tokens() {
        let first = RoundGuard::new();
        let stale = first.token();
        drop(first);

        let second = RoundGuard::new();
        assert!(!stale.is_live());
        assert!(second.token().is_live());
    }
}
