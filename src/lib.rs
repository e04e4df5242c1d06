//! Brain Gym - browser-based brain training mini-games
//!
//! Core modules:
//! - `engine`: Shared round machinery (clocks, entity arena, spawner, scoring)
//! - `games`: One state machine per mini-game, headless and deterministic
//! - `tuning`: Data-driven difficulty tables
//! - `api`: Backend request/response types and the wasm fetch client
//! - `auth`: Session state machine
//! - `app`: Browser DOM shell (wasm only)

pub mod api;
pub mod auth;
pub mod best_times;
pub mod engine;
pub mod games;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod app;

pub use auth::{AuthContext, AuthState};
pub use tuning::Difficulty;

/// Shared timing constants
pub mod consts {
    /// Reference frame interval for delta-time animation (60 Hz)
    pub const FRAME_INTERVAL_MS: f64 = 16.67;
    /// Largest delta applied in one animation step, in frames.
    /// Caps the jump after a backgrounded tab resumes.
    pub const MAX_FRAME_DELTA: f64 = 3.0;

    /// Stopwatch sampling interval
    pub const STOPWATCH_TICK_MS: i32 = 10;
    /// Countdown sampling interval
    pub const COUNTDOWN_TICK_MS: i32 = 1000;

    /// Falling letters: horizontal spawn band, percent of play-area width
    pub const LETTER_MIN_X: f64 = 15.0;
    pub const LETTER_MAX_X: f64 = 85.0;
    /// Letters spawn just above the visible area
    pub const LETTER_SPAWN_Y: f64 = -10.0;
    /// Crossing this line counts the letter as missed
    pub const LETTER_MISS_Y: f64 = 85.0;
    /// Past this line a missed letter is removed from display
    pub const LETTER_DESPAWN_Y: f64 = 100.0;

    /// How long a resolved mole stays in the DOM for its exit animation
    pub const MOLE_LINGER_MS: f64 = 300.0;
    /// Reaction game: pause after a recorded click before the next round
    pub const REACTION_PAUSE_MS: f64 = 1500.0;
    /// Reaction game: penalty delay after a false start
    pub const REACTION_PENALTY_MS: f64 = 1000.0;
    /// Spot-the-difference: click marker display time
    pub const MARKER_LINGER_MS: f64 = 1000.0;
}
