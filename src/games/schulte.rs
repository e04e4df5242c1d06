//! Schulte table: find 1..n² in order on a shuffled grid as fast as
//! possible.
//!
//! Configured by grid size, not difficulty tier. The stopwatch is
//! pausable; pausing hides the table so pause time never improves the
//! recorded result.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::api::GameResult;
use crate::engine::{CompletionLatch, RoundPhase, Stopwatch};

/// Result of one cell click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Correct,
    Wrong,
    Completed,
}

#[derive(Debug)]
pub struct SchulteGame {
    grid_size: usize,
    phase: RoundPhase,
    latch: CompletionLatch,
    cells: Vec<u32>,
    next_expected: u32,
    stopwatch: Stopwatch,
    final_time_ms: f64,
    rng: Pcg32,
}

impl SchulteGame {
    pub fn new(grid_size: usize, seed: u64) -> Self {
        Self {
            grid_size,
            phase: RoundPhase::Idle,
            latch: CompletionLatch::new(),
            cells: Vec::new(),
            next_expected: 1,
            stopwatch: Stopwatch::new(),
            final_time_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn total(&self) -> u32 {
        (self.grid_size * self.grid_size) as u32
    }

    pub fn start(&mut self, now_ms: f64) {
        self.cells = (1..=self.total()).collect();
        self.cells.shuffle(&mut self.rng);
        self.next_expected = 1;
        self.latch = CompletionLatch::new();
        self.final_time_ms = 0.0;
        self.stopwatch.reset();
        self.stopwatch.start(now_ms);
        self.phase = RoundPhase::Playing;
    }

    pub fn pause(&mut self, now_ms: f64) {
        if self.phase == RoundPhase::Playing {
            self.stopwatch.pause(now_ms);
        }
    }

    pub fn resume(&mut self, now_ms: f64) {
        if self.phase == RoundPhase::Playing {
            self.stopwatch.start(now_ms);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RoundPhase::Playing && !self.stopwatch.is_running()
    }

    /// Click the cell showing `number`.
    pub fn click(&mut self, number: u32, now_ms: f64) -> Option<Click> {
        if self.phase != RoundPhase::Playing || self.is_paused() {
            return None;
        }
        if number != self.next_expected {
            return Some(Click::Wrong);
        }
        self.next_expected += 1;
        if self.next_expected > self.total() {
            if self.latch.trigger() {
                self.final_time_ms = self.stopwatch.elapsed_ms(now_ms);
                self.stopwatch.pause(now_ms);
                self.phase = RoundPhase::Finished;
            }
            return Some(Click::Completed);
        }
        Some(Click::Correct)
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn next_expected(&self) -> u32 {
        self.next_expected
    }

    /// Whether `number` has already been found.
    pub fn is_found(&self, number: u32) -> bool {
        number < self.next_expected
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        if self.phase == RoundPhase::Finished {
            self.final_time_ms
        } else {
            self.stopwatch.elapsed_ms(now_ms)
        }
    }

    pub fn result(&self) -> Option<GameResult> {
        if self.phase != RoundPhase::Finished {
            return None;
        }
        Some(GameResult::Schulte {
            grid_size: self.grid_size as u32,
            time_ms: self.final_time_ms.round() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_a_permutation() {
        let mut game = SchulteGame::new(5, 9);
        game.start(0.0);
        let mut sorted = game.cells().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=25).collect::<Vec<u32>>());
    }

    #[test]
    fn wrong_click_has_no_effect_on_progress() {
        let mut game = SchulteGame::new(4, 9);
        game.start(0.0);
        assert_eq!(game.click(7, 100.0), Some(Click::Wrong));
        assert_eq!(game.next_expected(), 1);
        // The wrong-clicked cell is not consumed: it keeps its pending
        // display state and stays clickable in its own turn.
        assert!(!game.is_found(7));
        assert_eq!(game.click(1, 200.0), Some(Click::Correct));
        assert_eq!(game.next_expected(), 2);
        // No time penalty either.
        assert_eq!(game.elapsed_ms(200.0), 200.0);
    }

    #[test]
    fn completing_the_table_records_elapsed_time() {
        let mut game = SchulteGame::new(4, 9);
        game.start(1000.0);
        for n in 1..16 {
            assert_eq!(game.click(n, 1000.0 + n as f64 * 500.0), Some(Click::Correct));
        }
        assert_eq!(game.click(16, 9000.0), Some(Click::Completed));
        assert_eq!(game.phase(), RoundPhase::Finished);
        match game.result() {
            Some(GameResult::Schulte { grid_size, time_ms }) => {
                assert_eq!(grid_size, 4);
                assert_eq!(time_ms, 8000);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn pause_excludes_time_from_the_result() {
        let mut game = SchulteGame::new(4, 9);
        game.start(0.0);
        game.pause(2000.0);
        assert!(game.is_paused());
        // Clicks while paused are ignored.
        assert_eq!(game.click(1, 3000.0), None);
        game.resume(60_000.0);
        for n in 1..=16 {
            game.click(n, 61_000.0);
        }
        // 2 s before the pause plus 1 s after.
        assert_eq!(game.result().and_then(|r| match r {
            GameResult::Schulte { time_ms, .. } => Some(time_ms),
            _ => None,
        }), Some(3000));
    }

    #[test]
    fn finished_elapsed_time_is_frozen() {
        let mut game = SchulteGame::new(4, 9);
        game.start(0.0);
        for n in 1..=16 {
            game.click(n, 5000.0);
        }
        assert_eq!(game.elapsed_ms(99_000.0), 5000.0);
        // Extra clicks after completion change nothing.
        assert_eq!(game.click(16, 99_000.0), None);
    }
}
