//! Stroop color test: the word names one color, the ink shows another,
//! the player must answer the ink.
//!
//! Questions are pre-generated for the whole round. A wrong answer does
//! not end the round; the round ends when every question is answered or
//! the countdown runs out, whichever comes first.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::api::GameResult;
use crate::engine::{CompletionLatch, Countdown, RoundPhase};
use crate::tuning::{Difficulty, StroopSettings};

/// Palette shared by the word and the ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StroopColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Brown,
}

impl StroopColor {
    /// Color name as displayed (and read) by the player.
    pub fn word(&self) -> &'static str {
        match self {
            StroopColor::Red => "красный",
            StroopColor::Blue => "синий",
            StroopColor::Green => "зелёный",
            StroopColor::Yellow => "жёлтый",
            StroopColor::Purple => "фиолетовый",
            StroopColor::Orange => "оранжевый",
            StroopColor::Pink => "розовый",
            StroopColor::Brown => "коричневый",
        }
    }

    /// CSS ink color.
    pub fn hex(&self) -> &'static str {
        match self {
            StroopColor::Red => "#ef4444",
            StroopColor::Blue => "#3b82f6",
            StroopColor::Green => "#10b981",
            StroopColor::Yellow => "#eab308",
            StroopColor::Purple => "#a855f7",
            StroopColor::Orange => "#f97316",
            StroopColor::Pink => "#ec4899",
            StroopColor::Brown => "#92400e",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    /// Color the text spells out
    pub word: StroopColor,
    /// Color the text is painted in; this is the correct answer
    pub ink: StroopColor,
}

#[derive(Debug)]
pub struct StroopGame {
    difficulty: Difficulty,
    settings: StroopSettings,
    phase: RoundPhase,
    countdown: Countdown,
    latch: CompletionLatch,
    questions: Vec<Question>,
    current: usize,
    correct: u32,
    question_times_secs: Vec<f64>,
    question_start_ms: f64,
    rng: Pcg32,
}

impl StroopGame {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let settings = StroopSettings::for_difficulty(difficulty);
        Self {
            difficulty,
            settings,
            phase: RoundPhase::Idle,
            countdown: Countdown::new(settings.time_limit_secs),
            latch: CompletionLatch::new(),
            questions: Vec::new(),
            current: 0,
            correct: 0,
            question_times_secs: Vec::new(),
            question_start_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &StroopSettings {
        &self.settings
    }

    pub fn start(&mut self, now_ms: f64) {
        let colors = self.settings.colors;
        self.questions = (0..self.settings.questions)
            .map(|_| Question {
                word: colors[self.rng.random_range(0..colors.len())],
                ink: colors[self.rng.random_range(0..colors.len())],
            })
            .collect();
        self.current = 0;
        self.correct = 0;
        self.question_times_secs.clear();
        self.countdown = Countdown::new(self.settings.time_limit_secs);
        self.latch = CompletionLatch::new();
        self.question_start_ms = now_ms;
        self.phase = RoundPhase::Playing;
    }

    pub fn tick_second(&mut self) -> bool {
        if self.phase != RoundPhase::Playing {
            return false;
        }
        if self.countdown.tick() {
            return self.finish();
        }
        false
    }

    /// Answer the current question with an ink color. Returns whether
    /// the answer was correct, or `None` outside an active round.
    pub fn answer(&mut self, color: StroopColor, now_ms: f64) -> Option<bool> {
        if self.phase != RoundPhase::Playing {
            return None;
        }
        let question = *self.questions.get(self.current)?;
        let is_correct = color == question.ink;
        self.question_times_secs
            .push((now_ms - self.question_start_ms) / 1000.0);
        if is_correct {
            self.correct += 1;
        }
        self.current += 1;
        if self.current >= self.questions.len() {
            self.finish();
        } else {
            self.question_start_ms = now_ms;
        }
        Some(is_correct)
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

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn question_number(&self) -> usize {
        self.current + 1
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    fn average_time_secs(&self) -> f64 {
        if self.question_times_secs.is_empty() {
            return 0.0;
        }
        self.question_times_secs.iter().sum::<f64>() / self.question_times_secs.len() as f64
    }

    pub fn result(&self) -> Option<GameResult> {
        if self.phase != RoundPhase::Finished {
            return None;
        }
        Some(GameResult::Stroop {
            difficulty: self.difficulty,
            correct_answers: self.correct,
            total_questions: self.settings.questions as u32,
            average_time: self.average_time_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_answer_does_not_end_round() {
        let mut game = StroopGame::new(Difficulty::Easy, 1);
        game.start(0.0);
        let ink = game.current_question().unwrap().ink;
        let wrong = if ink == StroopColor::Red {
            StroopColor::Blue
        } else {
            StroopColor::Red
        };
        assert_eq!(game.answer(wrong, 800.0), Some(false));
        assert_eq!(game.phase(), RoundPhase::Playing);
        assert_eq!(game.question_number(), 2);
    }

    #[test]
    fn round_ends_after_last_question() {
        let mut game = StroopGame::new(Difficulty::Easy, 1);
        game.start(0.0);
        for i in 0..10 {
            let ink = game.current_question().unwrap().ink;
            game.answer(ink, (i + 1) as f64 * 1000.0);
        }
        assert_eq!(game.phase(), RoundPhase::Finished);
        match game.result() {
            Some(GameResult::Stroop {
                correct_answers,
                total_questions,
                average_time,
                ..
            }) => {
                assert_eq!(correct_answers, 10);
                assert_eq!(total_questions, 10);
                assert!((average_time - 1.0).abs() < 1e-9);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn timeout_with_no_answers_reports_zero_average() {
        let mut game = StroopGame::new(Difficulty::Hard, 1);
        game.start(0.0);
        for _ in 0..30 {
            game.tick_second();
        }
        match game.result() {
            Some(GameResult::Stroop {
                correct_answers,
                average_time,
                ..
            }) => {
                assert_eq!(correct_answers, 0);
                assert_eq!(average_time, 0.0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn per_question_time_resets_between_questions() {
        let mut game = StroopGame::new(Difficulty::Easy, 3);
        game.start(0.0);
        let ink = game.current_question().unwrap().ink;
        game.answer(ink, 2000.0);
        let ink = game.current_question().unwrap().ink;
        game.answer(ink, 2500.0);
        assert_eq!(game.question_times_secs, vec![2.0, 0.5]);
    }

    #[test]
    fn answer_after_finish_is_ignored() {
        let mut game = StroopGame::new(Difficulty::Easy, 1);
        game.start(0.0);
        for _ in 0..60 {
            game.tick_second();
        }
        assert_eq!(game.answer(StroopColor::Red, 61_000.0), None);
    }
}
