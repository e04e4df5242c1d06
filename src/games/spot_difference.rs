//! Spot-the-difference, driven by the backend.
//!
//! The server generates the image pair, judges every click, and saves
//! the result itself; the client never knows where the differences are.
//! This module only tracks the visible state: click markers awaiting a
//! verdict, the found counter, and the elapsed clock.

use glam::Vec2;

use crate::api::{SpotDifferenceCheckRequest, SpotDifferenceCheckResponse,
    SpotDifferenceStartResponse};
use crate::consts;
use crate::engine::{CompletionLatch, EntityArena, Entity, Outcome, RoundPhase, Stopwatch};

#[derive(Debug, Clone, Copy)]
pub struct Marker {
    /// Click position in percent of image size
    pub pos: Vec2,
}

#[derive(Debug, Default)]
pub struct SpotDifferenceGame {
    phase: RoundPhase,
    latch: CompletionLatch,
    game_id: String,
    image1: String,
    image2: String,
    total_differences: u32,
    found: u32,
    markers: EntityArena<Marker>,
    stopwatch: Stopwatch,
    /// Server-reported completion time, seconds
    time_taken_secs: Option<f64>,
}

impl SpotDifferenceGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a round from the server's start response.
    pub fn begin(&mut self, start: SpotDifferenceStartResponse, now_ms: f64) {
        self.game_id = start.game_id;
        self.image1 = start.image1;
        self.image2 = start.image2;
        self.total_differences = start.total_differences;
        self.found = start.found_count;
        self.markers.clear();
        self.latch = CompletionLatch::new();
        self.time_taken_secs = None;
        self.stopwatch.reset();
        self.stopwatch.start(now_ms);
        self.phase = RoundPhase::Playing;
    }

    /// Register a click. Returns the marker id and the check request
    /// the shell should POST; the verdict comes back via
    /// [`apply_check`](Self::apply_check).
    pub fn register_click(
        &mut self,
        x_percent: f64,
        y_percent: f64,
        now_ms: f64,
    ) -> Option<(u32, SpotDifferenceCheckRequest)> {
        if self.phase != RoundPhase::Playing {
            return None;
        }
        let id = self.markers.spawn(
            Marker {
                pos: Vec2::new(x_percent as f32, y_percent as f32),
            },
            now_ms,
        );
        Some((
            id,
            SpotDifferenceCheckRequest {
                game_id: self.game_id.clone(),
                x_percent,
                y_percent,
            },
        ))
    }

    /// Apply the server's verdict for a click.
    pub fn apply_check(
        &mut self,
        marker_id: u32,
        check: &SpotDifferenceCheckResponse,
        now_ms: f64,
    ) {
        let outcome = if check.correct {
            Outcome::Hit
        } else {
            Outcome::Missed
        };
        self.markers.resolve(marker_id, outcome, now_ms);
        // The server's count is authoritative, whatever we showed.
        self.found = check.found_count;
        if check.completed && self.latch.trigger() {
            self.time_taken_secs = check.time_taken;
            self.stopwatch.pause(now_ms);
            self.phase = RoundPhase::Finished;
        }
    }

    /// Frame step: expire markers that have shown long enough.
    pub fn advance(&mut self, now_ms: f64) {
        self.markers.purge_resolved(now_ms, consts::MARKER_LINGER_MS);
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn images(&self) -> (&str, &str) {
        (&self.image1, &self.image2)
    }

    pub fn found(&self) -> u32 {
        self.found
    }

    pub fn total_differences(&self) -> u32 {
        self.total_differences
    }

    pub fn markers(&self) -> impl Iterator<Item = &Entity<Marker>> {
        self.markers.iter()
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        self.stopwatch.elapsed_ms(now_ms)
    }

    pub fn time_taken_secs(&self) -> Option<f64> {
        self.time_taken_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_response() -> SpotDifferenceStartResponse {
        SpotDifferenceStartResponse {
            game_id: "g-1".to_owned(),
            image1: "aGk=".to_owned(),
            image2: "aG8=".to_owned(),
            total_differences: 5,
            found_count: 0,
        }
    }

    fn verdict(correct: bool, found: u32, completed: bool) -> SpotDifferenceCheckResponse {
        SpotDifferenceCheckResponse {
            correct,
            found_count: found,
            completed,
            time_taken: completed.then_some(42.5),
        }
    }

    #[test]
    fn click_produces_check_request_with_game_id() {
        let mut game = SpotDifferenceGame::new();
        game.begin(start_response(), 0.0);
        let (id, req) = game.register_click(30.0, 60.0, 100.0).unwrap();
        assert_eq!(req.game_id, "g-1");
        assert_eq!(req.x_percent, 30.0);
        assert!(game.markers.get(id).unwrap().is_pending());
    }

    #[test]
    fn server_found_count_is_authoritative() {
        let mut game = SpotDifferenceGame::new();
        game.begin(start_response(), 0.0);
        let (id, _) = game.register_click(10.0, 10.0, 100.0).unwrap();
        game.apply_check(id, &verdict(true, 3, false), 200.0);
        assert_eq!(game.found(), 3);
        assert_eq!(
            game.markers.get(id).unwrap().outcome(),
            Some(Outcome::Hit)
        );
    }

    #[test]
    fn completion_comes_from_the_server() {
        let mut game = SpotDifferenceGame::new();
        game.begin(start_response(), 0.0);
        let (id, _) = game.register_click(10.0, 10.0, 100.0).unwrap();
        game.apply_check(id, &verdict(true, 5, true), 42_500.0);
        assert_eq!(game.phase(), RoundPhase::Finished);
        assert_eq!(game.time_taken_secs(), Some(42.5));
        // No more clicks once finished.
        assert!(game.register_click(1.0, 1.0, 43_000.0).is_none());
    }

    #[test]
    fn markers_expire_after_display_window() {
        let mut game = SpotDifferenceGame::new();
        game.begin(start_response(), 0.0);
        let (id, _) = game.register_click(10.0, 10.0, 100.0).unwrap();
        game.apply_check(id, &verdict(false, 0, false), 200.0);
        game.advance(900.0);
        assert_eq!(game.markers().count(), 1);
        game.advance(1300.0);
        assert_eq!(game.markers().count(), 0);
    }

    #[test]
    fn late_duplicate_verdict_does_not_refinish() {
        let mut game = SpotDifferenceGame::new();
        game.begin(start_response(), 0.0);
        let (id, _) = game.register_click(10.0, 10.0, 100.0).unwrap();
        game.apply_check(id, &verdict(true, 5, true), 1000.0);
        let t1 = game.time_taken_secs();
        game.apply_check(id, &verdict(true, 5, true), 2000.0);
        assert_eq!(game.time_taken_secs(), t1);
    }
}
