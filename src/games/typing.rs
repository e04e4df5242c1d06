//! Typing test against a target text.
//!
//! The target comes from the backend text generator; when that call
//! fails the shell falls back to a built-in text for the tier. The
//! round ends when the countdown runs out or the player reproduces the
//! whole text exactly, whichever happens first.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::api::GameResult;
use crate::engine::{typing_accuracy, words_per_minute, CompletionLatch, Countdown, RoundPhase,
    Stopwatch};
use crate::tuning::{Difficulty, TypingSettings};

#[derive(Debug)]
pub struct TypingGame {
    difficulty: Difficulty,
    settings: TypingSettings,
    phase: RoundPhase,
    countdown: Countdown,
    latch: CompletionLatch,
    stopwatch: Stopwatch,
    target: String,
    typed: String,
    final_elapsed_secs: f64,
    rng: Pcg32,
}

impl TypingGame {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let settings = TypingSettings::for_difficulty(difficulty);
        Self {
            difficulty,
            settings,
            phase: RoundPhase::Idle,
            countdown: Countdown::new(settings.duration_secs),
            latch: CompletionLatch::new(),
            stopwatch: Stopwatch::new(),
            target: String::new(),
            typed: String::new(),
            final_elapsed_secs: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &TypingSettings {
        &self.settings
    }

    /// Built-in target for when the generator endpoint is unavailable.
    pub fn fallback_text(&mut self) -> &'static str {
        let texts = self.settings.fallback_texts;
        texts[self.rng.random_range(0..texts.len())]
    }

    /// Begin a round against `target`.
    pub fn start(&mut self, target: String, now_ms: f64) {
        self.target = target;
        self.typed.clear();
        self.countdown = Countdown::new(self.settings.duration_secs);
        self.latch = CompletionLatch::new();
        self.final_elapsed_secs = 0.0;
        self.stopwatch.reset();
        self.stopwatch.start(now_ms);
        self.phase = RoundPhase::Playing;
    }

    pub fn tick_second(&mut self) -> bool {
        if self.phase != RoundPhase::Playing {
            return false;
        }
        if self.countdown.tick() {
            // A full countdown means the whole duration elapsed.
            return self.finish(f64::from(self.settings.duration_secs));
        }
        false
    }

    /// Replace the typed buffer with the input field's current value.
    /// Returns `true` when this input completed the text.
    pub fn set_input(&mut self, typed: &str, now_ms: f64) -> bool {
        if self.phase != RoundPhase::Playing {
            return false;
        }
        self.typed = typed.to_owned();
        if !self.target.is_empty() && self.typed == self.target {
            return self.finish(self.stopwatch.elapsed_ms(now_ms) / 1000.0);
        }
        false
    }

    fn finish(&mut self, elapsed_secs: f64) -> bool {
        if !self.latch.trigger() {
            return false;
        }
        self.final_elapsed_secs = elapsed_secs;
        self.phase = RoundPhase::Finished;
        true
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn wpm(&self, elapsed_secs: f64) -> u32 {
        words_per_minute(&self.typed, elapsed_secs)
    }

    pub fn accuracy(&self) -> u32 {
        typing_accuracy(&self.typed, &self.target)
    }

    pub fn result(&self) -> Option<GameResult> {
        if self.phase != RoundPhase::Finished {
            return None;
        }
        Some(GameResult::Typing {
            difficulty: self.difficulty,
            wpm: words_per_minute(&self.typed, self.final_elapsed_secs),
            accuracy: typing_accuracy(&self.typed, &self.target),
            total_time: self.final_elapsed_secs.round() as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_ends_the_round_early() {
        let mut game = TypingGame::new(Difficulty::Easy, 2);
        game.start("кот и пёс".to_owned(), 0.0);
        assert!(!game.set_input("кот и", 5_000.0));
        assert!(game.set_input("кот и пёс", 15_000.0));
        assert_eq!(game.phase(), RoundPhase::Finished);
        match game.result() {
            Some(GameResult::Typing {
                wpm,
                accuracy,
                total_time,
                ..
            }) => {
                // 3 words in 15 s.
                assert_eq!(wpm, 12);
                assert_eq!(accuracy, 100);
                assert_eq!(total_time, 15);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn prefix_match_does_not_complete() {
        let mut game = TypingGame::new(Difficulty::Easy, 2);
        game.start("abc".to_owned(), 0.0);
        assert!(!game.set_input("ab", 1000.0));
        assert_eq!(game.phase(), RoundPhase::Playing);
    }

    #[test]
    fn countdown_ends_round_and_scores_typed_content() {
        let mut game = TypingGame::new(Difficulty::Easy, 2);
        game.start("the quick brown fox jumps".to_owned(), 0.0);
        game.set_input("the quick brown fox", 10_000.0);
        let mut completions = 0;
        for _ in 0..40 {
            if game.tick_second() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        match game.result() {
            Some(GameResult::Typing { accuracy, .. }) => assert_eq!(accuracy, 100),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn fallback_text_comes_from_the_tier_pool() {
        let mut game = TypingGame::new(Difficulty::Medium, 8);
        let text = game.fallback_text();
        assert!(game.settings().fallback_texts.contains(&text));
    }

    #[test]
    fn stale_driver_does_not_speed_up_the_countdown() {
        use crate::engine::RoundGuard;

        // A restart replaces the game but a timer from the old round
        // may still be pending. Gated on its round's token, the old
        // driver must contribute no ticks: the new round runs its full
        // 30 seconds instead of finishing at 15.
        let mut game = TypingGame::new(Difficulty::Easy, 2);
        game.start("первый".to_owned(), 0.0);
        let first = RoundGuard::new();
        let stale = first.token();

        drop(first);
        game = TypingGame::new(Difficulty::Easy, 3);
        game.start("второй".to_owned(), 0.0);
        let second = RoundGuard::new();
        let live = second.token();

        let mut seconds = 0;
        while game.phase() == RoundPhase::Playing {
            seconds += 1;
            if live.is_live() {
                game.tick_second();
            }
            if stale.is_live() {
                game.tick_second();
            }
            assert!(seconds <= 30, "countdown ticked more than once per second");
        }
        assert_eq!(seconds, 30);
    }

    #[test]
    fn input_after_finish_is_ignored() {
        let mut game = TypingGame::new(Difficulty::Easy, 2);
        game.start("ab".to_owned(), 0.0);
        game.set_input("ab", 4_000.0);
        assert!(!game.set_input("abc", 5_000.0));
        assert_eq!(game.typed(), "ab");
    }
}
