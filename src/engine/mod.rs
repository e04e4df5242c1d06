//! Shared round machinery
//!
//! Everything here is pure and deterministic: no timers, no DOM, no I/O.
//! The shell samples wall-clock time and feeds it in as `now_ms`; tests
//! feed synthetic clocks. Entity resolution is idempotent
//! (first-resolution-wins) so interleaved timer and input callbacks can
//! never double-count.

pub mod arena;
pub mod clock;
pub mod round;
pub mod score;
pub mod spawner;

pub use arena::{Entity, EntityArena, Outcome};
pub use clock::{Countdown, Stopwatch};
pub use round::{CompletionLatch, RoundGuard, RoundPhase, RoundToken};
pub use score::{accuracy_percent, typing_accuracy, words_per_minute};
pub use spawner::SpawnScheduler;
