//! Math drill: arithmetic problems against the clock.
//!
//! Problems are generated so the answer is always a non-negative
//! integer: subtraction orders its operands, division is built from
//! its answer, multiplication caps both factors.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::api::GameResult;
use crate::engine::{accuracy_percent, CompletionLatch, Countdown, RoundPhase};
use crate::tuning::{Difficulty, MathSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "−",
            Op::Mul => "×",
            Op::Div => "÷",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Problem {
    pub a: i32,
    pub b: i32,
    pub op: Op,
    pub answer: i32,
}

impl Problem {
    fn generate(settings: &MathSettings, rng: &mut Pcg32) -> Self {
        let op = settings.operations[rng.random_range(0..settings.operations.len())];
        let (min, max) = (settings.min_number, settings.max_number);
        match op {
            Op::Add => {
                let a = rng.random_range(min..=max);
                let b = rng.random_range(min..=max);
                Problem { a, b, op, answer: a + b }
            }
            Op::Sub => {
                let a = rng.random_range(min..=max);
                let b = rng.random_range(min..=a);
                Problem { a, b, op, answer: a - b }
            }
            Op::Mul => {
                let cap = settings.max_multiplier.min(max);
                let a = rng.random_range(1..=cap);
                let b = rng.random_range(1..=cap);
                Problem { a, b, op, answer: a * b }
            }
            Op::Div => {
                let b = rng.random_range(1..=10);
                let answer = rng.random_range(1..=10);
                Problem { a: b * answer, b, op, answer }
            }
        }
    }
}

#[derive(Debug)]
pub struct MathGame {
    difficulty: Difficulty,
    settings: MathSettings,
    phase: RoundPhase,
    countdown: Countdown,
    latch: CompletionLatch,
    problem: Option<Problem>,
    correct: u32,
    errors: u32,
    answered: u32,
    streak: u32,
    max_streak: u32,
    rng: Pcg32,
}

impl MathGame {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let settings = MathSettings::for_difficulty(difficulty);
        Self {
            difficulty,
            settings,
            phase: RoundPhase::Idle,
            countdown: Countdown::new(settings.duration_secs),
            latch: CompletionLatch::new(),
            problem: None,
            correct: 0,
            errors: 0,
            answered: 0,
            streak: 0,
            max_streak: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn start(&mut self) {
        self.correct = 0;
        self.errors = 0;
        self.answered = 0;
        self.streak = 0;
        self.max_streak = 0;
        self.countdown = Countdown::new(self.settings.duration_secs);
        self.latch = CompletionLatch::new();
        self.problem = Some(Problem::generate(&self.settings, &mut self.rng));
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

    /// Submit an answer to the current problem. Returns whether it was
    /// correct, or `None` outside an active round.
    pub fn submit(&mut self, answer: i32) -> Option<bool> {
        if self.phase != RoundPhase::Playing {
            return None;
        }
        let problem = self.problem?;
        self.answered += 1;
        let correct = answer == problem.answer;
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
        } else {
            self.errors += 1;
            self.streak = 0;
        }
        self.problem = Some(Problem::generate(&self.settings, &mut self.rng));
        Some(correct)
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

    pub fn problem(&self) -> Option<&Problem> {
        self.problem.as_ref()
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    pub fn result(&self) -> Option<GameResult> {
        if self.phase != RoundPhase::Finished {
            return None;
        }
        Some(GameResult::Math {
            difficulty: self.difficulty,
            correct_answers: self.correct,
            total_problems: self.answered,
            errors: self.errors,
            accuracy: accuracy_percent(self.correct, self.answered),
            max_streak: self.max_streak,
            total_time: self.settings.duration_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn problems_have_non_negative_integer_answers() {
        for d in Difficulty::ALL {
            let settings = MathSettings::for_difficulty(d);
            let mut rng = Pcg32::seed_from_u64(99);
            for _ in 0..500 {
                let p = Problem::generate(&settings, &mut rng);
                assert!(p.answer >= 0, "negative answer in {p:?}");
                match p.op {
                    Op::Add => assert_eq!(p.answer, p.a + p.b),
                    Op::Sub => assert_eq!(p.answer, p.a - p.b),
                    Op::Mul => {
                        assert_eq!(p.answer, p.a * p.b);
                        assert!(p.a <= settings.max_multiplier);
                        assert!(p.b <= settings.max_multiplier);
                    }
                    Op::Div => {
                        assert_eq!(p.a % p.b, 0);
                        assert_eq!(p.answer, p.a / p.b);
                    }
                }
            }
        }
    }

    #[test]
    fn easy_tier_has_no_mul_or_div() {
        let settings = MathSettings::for_difficulty(Difficulty::Easy);
        assert!(!settings.operations.contains(&Op::Mul));
        assert!(!settings.operations.contains(&Op::Div));
    }

    #[test]
    fn streak_resets_on_error() {
        let mut game = MathGame::new(Difficulty::Easy, 42);
        game.start();
        let right = game.problem().unwrap().answer;
        assert_eq!(game.submit(right), Some(true));
        let right = game.problem().unwrap().answer;
        assert_eq!(game.submit(right), Some(true));
        assert_eq!(game.streak(), 2);
        let wrong = game.problem().unwrap().answer + 1;
        assert_eq!(game.submit(wrong), Some(false));
        assert_eq!(game.streak(), 0);
        assert_eq!(game.max_streak(), 2);
    }

    #[test]
    fn result_reports_accuracy() {
        let mut game = MathGame::new(Difficulty::Easy, 42);
        game.start();
        for i in 0..5 {
            let answer = game.problem().unwrap().answer;
            // One deliberate error out of five.
            game.submit(if i == 2 { answer + 1 } else { answer });
        }
        for _ in 0..60 {
            game.tick_second();
        }
        match game.result() {
            Some(GameResult::Math {
                correct_answers,
                total_problems,
                errors,
                accuracy,
                ..
            }) => {
                assert_eq!(correct_answers, 4);
                assert_eq!(total_problems, 5);
                assert_eq!(errors, 1);
                assert_eq!(accuracy, 80);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    proptest! {
        /// Every answered problem is exactly one of correct or error.
        #[test]
        fn answered_splits_into_correct_and_errors(
            offsets in proptest::collection::vec(0i32..3, 1..40)
        ) {
            let mut game = MathGame::new(Difficulty::Medium, 7);
            game.start();
            for off in offsets {
                let answer = game.problem().unwrap().answer;
                game.submit(answer + off);
            }
            prop_assert_eq!(game.correct() + game.errors(), game.answered);
        }
    }
}
