//! Catch-the-letter: letters fall down the play area, the player types
//! them before they reach the bottom.
//!
//! Motion runs on animation frames with delta-time scaling so fall
//! speed is frame-rate independent. The delta is clamped to a few
//! reference frames: after a backgrounded tab resumes, letters step a
//! bounded distance instead of teleporting past the miss line.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::api::GameResult;
use crate::consts;
use crate::engine::{
    CompletionLatch, Countdown, Entity, EntityArena, Outcome, RoundPhase, SpawnScheduler,
};
use crate::tuning::{CatchLetterSettings, Difficulty};

/// How long a caught letter stays visible for its catch flash.
const CATCH_FLASH_MS: f64 = 300.0;

#[derive(Debug, Clone)]
pub struct Letter {
    pub ch: char,
    /// Position in percent of play-area size
    pub pos: Vec2,
}

#[derive(Debug)]
pub struct CatchLetterGame {
    difficulty: Difficulty,
    settings: CatchLetterSettings,
    phase: RoundPhase,
    letters: EntityArena<Letter>,
    spawner: SpawnScheduler,
    countdown: Countdown,
    latch: CompletionLatch,
    caught: u32,
    missed: u32,
    last_frame_ms: Option<f64>,
    rng: Pcg32,
}

impl CatchLetterGame {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let settings = CatchLetterSettings::for_difficulty(difficulty);
        Self {
            difficulty,
            settings,
            phase: RoundPhase::Idle,
            letters: EntityArena::new(),
            spawner: SpawnScheduler::new(settings.spawn_interval_ms, settings.max_letters),
            countdown: Countdown::new(settings.duration_secs),
            latch: CompletionLatch::new(),
            caught: 0,
            missed: 0,
            last_frame_ms: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.letters.clear();
        self.caught = 0;
        self.missed = 0;
        self.countdown = Countdown::new(self.settings.duration_secs);
        self.latch = CompletionLatch::new();
        self.spawner.arm(now_ms);
        self.last_frame_ms = Some(now_ms);
        self.phase = RoundPhase::Playing;
    }

    /// One-second countdown tick. Returns `true` on the tick that ends
    /// the round.
    pub fn tick_second(&mut self) -> bool {
        if self.phase != RoundPhase::Playing {
            return false;
        }
        if self.countdown.tick() {
            return self.finish();
        }
        false
    }

    /// Animation-frame step: move letters, detect misses, spawn.
    pub fn advance(&mut self, now_ms: f64) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        let last = self.last_frame_ms.replace(now_ms).unwrap_or(now_ms);
        let delta = ((now_ms - last) / consts::FRAME_INTERVAL_MS).min(consts::MAX_FRAME_DELTA);
        let dy = (self.settings.speed * 0.5 * delta) as f32;

        let mut crossed = Vec::new();
        for e in self.letters.entities_mut() {
            if e.outcome() == Some(Outcome::Hit) {
                continue;
            }
            e.payload.pos.y += dy;
            if e.is_pending() && f64::from(e.payload.pos.y) >= consts::LETTER_MISS_Y {
                crossed.push(e.id);
            }
        }
        for id in crossed {
            if self.letters.resolve(id, Outcome::Missed, now_ms) {
                self.missed += 1;
            }
        }

        // Caught letters clear after their flash; missed ones keep
        // falling until they leave the visible area.
        self.letters.retain(|e| match e.outcome() {
            Some(Outcome::Hit) => now_ms - e.resolved_at_ms().unwrap_or(now_ms) < CATCH_FLASH_MS,
            Some(_) => f64::from(e.payload.pos.y) < consts::LETTER_DESPAWN_Y,
            None => true,
        });

        if self.spawner.poll(now_ms, self.letters.pending_count()) {
            let ch = self.settings.letters[self.rng.random_range(0..self.settings.letters.len())];
            let x = self
                .rng
                .random_range(consts::LETTER_MIN_X..consts::LETTER_MAX_X) as f32;
            self.letters.spawn(
                Letter {
                    ch,
                    pos: Vec2::new(x, consts::LETTER_SPAWN_Y as f32),
                },
                now_ms,
            );
        }
    }

    /// Key press: catches the earliest-spawned pending letter matching
    /// the (uppercased) key. Returns `true` on a catch.
    pub fn press_key(&mut self, key: char, now_ms: f64) -> bool {
        if self.phase != RoundPhase::Playing {
            return false;
        }
        let upper = key.to_uppercase().next().unwrap_or(key);
        match self
            .letters
            .resolve_first(|l| l.ch == upper, Outcome::Hit, now_ms)
        {
            Some(_) => {
                self.caught += 1;
                true
            }
            None => false,
        }
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

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn caught(&self) -> u32 {
        self.caught
    }

    pub fn missed(&self) -> u32 {
        self.missed
    }

    pub fn letters(&self) -> impl Iterator<Item = &Entity<Letter>> {
        self.letters.iter()
    }

    pub fn result(&self) -> Option<GameResult> {
        if self.phase != RoundPhase::Finished {
            return None;
        }
        Some(GameResult::CatchLetter {
            difficulty: self.difficulty,
            caught_letters: self.caught,
            missed_letters: self.missed,
            total_time: self.settings.duration_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive_frames(game: &mut CatchLetterGame, from_ms: f64, to_ms: f64, step_ms: f64) {
        let mut t = from_ms;
        while t <= to_ms {
            game.advance(t);
            t += step_ms;
        }
    }

    #[test]
    fn spawns_on_cadence_up_to_cap() {
        let mut game = CatchLetterGame::new(Difficulty::Easy, 7);
        game.start(0.0);
        // Easy: 2000 ms interval, cap 1.
        drive_frames(&mut game, 16.0, 1999.0, 16.0);
        assert_eq!(game.letters().count(), 0);
        game.advance(2000.0);
        assert_eq!(game.letters().count(), 1);
        // Cap reached: the next attempt is consumed without a spawn.
        game.advance(4000.0);
        assert_eq!(game.letters.pending_count(), 1);
    }

    #[test]
    fn key_press_catches_matching_letter() {
        let mut game = CatchLetterGame::new(Difficulty::Easy, 7);
        game.start(0.0);
        game.advance(2000.0);
        let ch = game.letters().next().unwrap().payload.ch;
        assert!(game.press_key(ch.to_lowercase().next().unwrap(), 2100.0));
        assert_eq!(game.caught(), 1);
        // Same key again: nothing pending matches.
        assert!(!game.press_key(ch, 2110.0));
        assert_eq!(game.caught(), 1);
    }

    #[test]
    fn letter_crossing_miss_line_counts_once() {
        let mut game = CatchLetterGame::new(Difficulty::Easy, 7);
        game.start(0.0);
        game.advance(2000.0);
        // Easy speed 2.0: 1 %/frame. 97 frames take the letter from -10
        // past the miss line at 85.
        drive_frames(&mut game, 2016.0, 2016.0 + 97.0 * 16.67, 16.67);
        assert_eq!(game.missed(), 1);
        // A late key press cannot catch a missed letter.
        let ch = game.letters().next().unwrap().payload.ch;
        assert!(!game.press_key(ch, 3700.0));
        assert_eq!(game.caught(), 0);
        assert_eq!(game.missed(), 1);
    }

    #[test]
    fn missed_letter_leaves_display_past_bottom() {
        let mut game = CatchLetterGame::new(Difficulty::Easy, 7);
        game.start(0.0);
        game.advance(2000.0);
        drive_frames(&mut game, 2016.0, 2016.0 + 150.0 * 16.67, 16.67);
        assert_eq!(game.missed(), 1);
        // The missed letter fell past the bottom and is gone; only a
        // freshly spawned pending letter may remain.
        assert!(game.letters().all(|e| e.is_pending()));
    }

    #[test]
    fn frame_delta_is_clamped() {
        let mut game = CatchLetterGame::new(Difficulty::Easy, 7);
        game.start(0.0);
        game.advance(2000.0);
        let y0 = game.letters().next().unwrap().payload.pos.y;
        // A 10-second stall advances at most 3 reference frames.
        game.advance(12_000.0);
        let y1 = game.letters().next().unwrap().payload.pos.y;
        assert!(f64::from(y1 - y0) <= 2.0 * 0.5 * 3.0 + 1e-6);
    }

    #[test]
    fn countdown_ends_round_exactly_once() {
        let mut game = CatchLetterGame::new(Difficulty::Easy, 7);
        game.start(0.0);
        let mut completions = 0;
        for _ in 0..40 {
            if game.tick_second() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(game.phase(), RoundPhase::Finished);
        let result = game.result().unwrap();
        assert_eq!(result.save_path(), "/api/catch-letter/save");
    }

    #[test]
    fn input_after_finish_is_ignored() {
        let mut game = CatchLetterGame::new(Difficulty::Easy, 7);
        game.start(0.0);
        for _ in 0..30 {
            game.tick_second();
        }
        assert!(!game.press_key('А', 31_000.0));
        game.advance(31_000.0);
        assert_eq!(game.caught(), 0);
    }
}
