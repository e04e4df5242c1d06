//! Sequence memory: a sequence of grid cells flashes, the player
//! repeats it; each completed level grows the sequence by one.
//!
//! Playback is time-based, not timer-callback based: the shell feeds
//! frames and asks which cell is currently lit, so a stalled tab never
//! desynchronizes the flash schedule from the input phase.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::api::GameResult;
use crate::engine::{CompletionLatch, RoundPhase};
use crate::tuning::{Difficulty, SequenceSettings};

/// Gap between completing a level and the next playback.
const LEVEL_UP_DELAY_MS: f64 = 1000.0;

#[derive(Debug)]
pub struct SequenceGame {
    difficulty: Difficulty,
    settings: SequenceSettings,
    phase: RoundPhase,
    latch: CompletionLatch,
    sequence: Vec<usize>,
    level: u32,
    input_index: usize,
    show_start_ms: f64,
    rng: Pcg32,
}

impl SequenceGame {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let settings = SequenceSettings::for_difficulty(difficulty);
        Self {
            difficulty,
            settings,
            phase: RoundPhase::Idle,
            latch: CompletionLatch::new(),
            sequence: Vec::new(),
            level: 1,
            input_index: 0,
            show_start_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &SequenceSettings {
        &self.settings
    }

    fn sequence_len(&self) -> usize {
        self.settings.start_length + self.level as usize - 1
    }

    fn generate_sequence(&mut self) {
        let cells = self.settings.cells();
        let len = self.sequence_len();
        self.sequence = (0..len).map(|_| self.rng.random_range(0..cells)).collect();
    }

    pub fn start(&mut self, now_ms: f64) {
        self.level = 1;
        self.latch = CompletionLatch::new();
        self.input_index = 0;
        self.generate_sequence();
        self.show_start_ms = now_ms;
        self.phase = RoundPhase::Preparing;
    }

    /// Total playback duration for the current sequence.
    fn playback_ms(&self) -> f64 {
        let per = self.settings.show_time_ms + self.settings.pause_between_ms;
        self.sequence.len() as f64 * per
    }

    /// Frame step: transitions from playback to input when the flash
    /// schedule has run out.
    pub fn advance(&mut self, now_ms: f64) {
        if self.phase == RoundPhase::Preparing
            && now_ms - self.show_start_ms >= self.playback_ms()
        {
            self.input_index = 0;
            self.phase = RoundPhase::Playing;
        }
    }

    /// Cell currently lit during playback, if any.
    pub fn highlighted(&self, now_ms: f64) -> Option<usize> {
        if self.phase != RoundPhase::Preparing {
            return None;
        }
        let elapsed = now_ms - self.show_start_ms;
        if elapsed < 0.0 {
            return None;
        }
        let per = self.settings.show_time_ms + self.settings.pause_between_ms;
        let index = (elapsed / per) as usize;
        if index >= self.sequence.len() {
            return None;
        }
        if elapsed % per < self.settings.show_time_ms {
            Some(self.sequence[index])
        } else {
            None
        }
    }

    /// Press a cell during the input phase. `Some(false)` ends the
    /// round; a completed sequence advances to the next level.
    pub fn press(&mut self, cell: usize, now_ms: f64) -> Option<bool> {
        if self.phase != RoundPhase::Playing {
            return None;
        }
        if self.sequence.get(self.input_index) != Some(&cell) {
            self.finish();
            return Some(false);
        }
        self.input_index += 1;
        if self.input_index >= self.sequence.len() {
            self.level += 1;
            self.generate_sequence();
            self.show_start_ms = now_ms + LEVEL_UP_DELAY_MS;
            self.phase = RoundPhase::Preparing;
        }
        Some(true)
    }

    fn finish(&mut self) -> bool {
        if !self.latch.trigger() {
            return false;
        }
        self.phase = RoundPhase::Finished;
        true
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.input_index, self.sequence.len())
    }

    pub fn result(&self) -> Option<GameResult> {
        if self.phase != RoundPhase::Finished {
            return None;
        }
        Some(GameResult::Sequence {
            difficulty: self.difficulty,
            level_reached: self.level,
            max_sequence_length: self.sequence_len() as u32,
            grid_size: self.settings.grid_size as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_back(game: &mut SequenceGame, from_ms: f64) -> f64 {
        let end = from_ms + game.playback_ms();
        game.advance(end);
        assert_eq!(game.phase(), RoundPhase::Playing);
        end
    }

    #[test]
    fn playback_lights_cells_in_order() {
        let mut game = SequenceGame::new(Difficulty::Easy, 21);
        game.start(0.0);
        // Easy: 2 cells, 800 ms on / 400 ms off.
        let seq = game.sequence.clone();
        assert_eq!(seq.len(), 2);
        assert_eq!(game.highlighted(100.0), Some(seq[0]));
        assert_eq!(game.highlighted(900.0), None);
        assert_eq!(game.highlighted(1300.0), Some(seq[1]));
        assert_eq!(game.highlighted(2300.0), None);
    }

    #[test]
    fn completing_a_level_grows_the_sequence() {
        let mut game = SequenceGame::new(Difficulty::Easy, 21);
        game.start(0.0);
        let seq = game.sequence.clone();
        let t = play_back(&mut game, 0.0);
        for cell in seq {
            assert_eq!(game.press(cell, t), Some(true));
        }
        assert_eq!(game.level(), 2);
        assert_eq!(game.phase(), RoundPhase::Preparing);
        assert_eq!(game.sequence.len(), 3);
        // Playback waits out the level-up delay.
        assert_eq!(game.highlighted(t + 500.0), None);
    }

    #[test]
    fn first_mismatch_ends_the_round() {
        let mut game = SequenceGame::new(Difficulty::Medium, 5);
        game.start(0.0);
        let seq = game.sequence.clone();
        let t = play_back(&mut game, 0.0);
        let wrong = (seq[0] + 1) % game.settings.cells();
        assert_eq!(game.press(wrong, t), Some(false));
        assert_eq!(game.phase(), RoundPhase::Finished);
        match game.result() {
            Some(GameResult::Sequence {
                level_reached,
                max_sequence_length,
                grid_size,
                ..
            }) => {
                assert_eq!(level_reached, 1);
                assert_eq!(max_sequence_length, 3);
                assert_eq!(grid_size, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn level_reached_is_the_level_being_attempted() {
        let mut game = SequenceGame::new(Difficulty::Easy, 21);
        game.start(0.0);
        let mut t = 0.0;
        // Clear two levels, fail on the third.
        for _ in 0..2 {
            let seq = game.sequence.clone();
            t = play_back(&mut game, t);
            for cell in seq {
                game.press(cell, t);
            }
            t += LEVEL_UP_DELAY_MS;
        }
        let seq = game.sequence.clone();
        t = play_back(&mut game, t);
        let wrong = (seq[0] + 1) % game.settings.cells();
        game.press(wrong, t);
        match game.result() {
            Some(GameResult::Sequence {
                level_reached,
                max_sequence_length,
                ..
            }) => {
                assert_eq!(level_reached, 3);
                // start 2 + level 3 - 1
                assert_eq!(max_sequence_length, 4);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn input_during_playback_is_ignored() {
        let mut game = SequenceGame::new(Difficulty::Easy, 21);
        game.start(0.0);
        assert_eq!(game.press(0, 100.0), None);
        assert_eq!(game.phase(), RoundPhase::Preparing);
    }
}
