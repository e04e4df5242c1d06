//! Reaction test: wait out a random delay, click the target the moment
//! it appears.
//!
//! Clicking before the target shows is a false start: a short penalty
//! screen, then the same round restarts with a fresh delay. Only clean
//! clicks record a reaction time.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::api::GameResult;
use crate::consts;
use crate::engine::{CompletionLatch, RoundPhase};
use crate::tuning::{Difficulty, ReactionSettings};

/// Padding around the play area for random target placement, percent.
const POSITION_PAD: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// Delay running; clicking now is a false start
    Waiting { target_at_ms: f64 },
    /// Target visible
    Target { shown_at_ms: f64, pos: Vec2 },
    /// False-start penalty screen
    Penalty { until_ms: f64 },
    /// Short rest after a recorded click
    Pause { until_ms: f64 },
}

#[derive(Debug)]
pub struct ReactionGame {
    difficulty: Difficulty,
    settings: ReactionSettings,
    phase: RoundPhase,
    latch: CompletionLatch,
    stage: Stage,
    round: usize,
    times_ms: Vec<f64>,
    false_starts: u32,
    rng: Pcg32,
}

impl ReactionGame {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let settings = ReactionSettings::for_difficulty(difficulty);
        Self {
            difficulty,
            settings,
            phase: RoundPhase::Idle,
            latch: CompletionLatch::new(),
            stage: Stage::Penalty { until_ms: 0.0 },
            round: 0,
            times_ms: Vec::new(),
            false_starts: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &ReactionSettings {
        &self.settings
    }

    fn schedule_target(&mut self, now_ms: f64) -> Stage {
        let delay = self
            .rng
            .random_range(self.settings.delay_min_ms..=self.settings.delay_max_ms);
        Stage::Waiting {
            target_at_ms: now_ms + delay,
        }
    }

    fn target_position(&mut self) -> Vec2 {
        if self.settings.random_position {
            let x = self.rng.random_range(POSITION_PAD..(100.0 - POSITION_PAD)) as f32;
            let y = self.rng.random_range(POSITION_PAD..(100.0 - POSITION_PAD)) as f32;
            Vec2::new(x, y)
        } else {
            Vec2::new(50.0, 50.0)
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.round = 1;
        self.times_ms.clear();
        self.false_starts = 0;
        self.latch = CompletionLatch::new();
        self.stage = self.schedule_target(now_ms);
        self.phase = RoundPhase::Playing;
    }

    /// Frame step: show the target, end penalty and pause screens.
    pub fn advance(&mut self, now_ms: f64) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        match self.stage {
            Stage::Waiting { target_at_ms } if now_ms >= target_at_ms => {
                let pos = self.target_position();
                self.stage = Stage::Target {
                    shown_at_ms: now_ms,
                    pos,
                };
            }
            Stage::Penalty { until_ms } if now_ms >= until_ms => {
                self.stage = self.schedule_target(now_ms);
            }
            Stage::Pause { until_ms } if now_ms >= until_ms => {
                if self.round >= self.settings.rounds {
                    self.finish();
                } else {
                    self.round += 1;
                    self.stage = self.schedule_target(now_ms);
                }
            }
            _ => {}
        }
    }

    /// Player click anywhere in the play area.
    pub fn click(&mut self, now_ms: f64) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        match self.stage {
            Stage::Waiting { .. } => {
                self.false_starts += 1;
                self.stage = Stage::Penalty {
                    until_ms: now_ms + consts::REACTION_PENALTY_MS,
                };
            }
            Stage::Target { shown_at_ms, .. } => {
                self.times_ms.push(now_ms - shown_at_ms);
                self.stage = Stage::Pause {
                    until_ms: now_ms + consts::REACTION_PAUSE_MS,
                };
            }
            _ => {}
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

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn false_starts(&self) -> u32 {
        self.false_starts
    }

    pub fn times_ms(&self) -> &[f64] {
        &self.times_ms
    }

    pub fn result(&self) -> Option<GameResult> {
        if self.phase != RoundPhase::Finished || self.times_ms.is_empty() {
            return None;
        }
        let average = self.times_ms.iter().sum::<f64>() / self.times_ms.len() as f64;
        let best = self.times_ms.iter().copied().fold(f64::INFINITY, f64::min);
        Some(GameResult::Reaction {
            difficulty: self.difficulty,
            attempts: self.times_ms.clone(),
            average_time: average,
            best_time: best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive frames until the target shows, then click `reaction_ms`
    /// later. Returns the click time.
    fn play_round(game: &mut ReactionGame, mut t: f64, reaction_ms: f64) -> f64 {
        loop {
            game.advance(t);
            if let Stage::Target { .. } = game.stage() {
                break;
            }
            t += 16.0;
            assert!(t < 1e7, "target never appeared");
        }
        t += reaction_ms;
        game.click(t);
        t
    }

    #[test]
    fn records_one_time_per_round() {
        let mut game = ReactionGame::new(Difficulty::Easy, 17);
        game.start(0.0);
        let mut t = 0.0;
        for _ in 0..5 {
            t = play_round(&mut game, t, 250.0);
            t += consts::REACTION_PAUSE_MS;
        }
        assert_eq!(game.round(), 5);
        game.advance(t);
        assert_eq!(game.phase(), RoundPhase::Finished);
        let times = game.times_ms().to_vec();
        assert_eq!(times.len(), 5);
        assert!(times.iter().all(|&ms| (ms - 250.0).abs() < 20.0));
    }

    #[test]
    fn false_start_restarts_the_round_after_penalty() {
        let mut game = ReactionGame::new(Difficulty::Easy, 17);
        game.start(0.0);
        // Easy delay is at least 1000 ms: clicking at 100 is early.
        game.click(100.0);
        assert_eq!(game.false_starts(), 1);
        assert!(matches!(game.stage(), Stage::Penalty { .. }));
        assert_eq!(game.round(), 1);
        // Penalty screen holds for a second.
        game.advance(900.0);
        assert!(matches!(game.stage(), Stage::Penalty { .. }));
        game.advance(1100.0);
        assert!(matches!(game.stage(), Stage::Waiting { .. }));
        assert!(game.times_ms().is_empty());
    }

    #[test]
    fn clicks_during_pause_are_ignored() {
        let mut game = ReactionGame::new(Difficulty::Easy, 17);
        game.start(0.0);
        let t = play_round(&mut game, 0.0, 200.0);
        assert_eq!(game.times_ms().len(), 1);
        game.click(t + 100.0);
        game.click(t + 200.0);
        assert_eq!(game.times_ms().len(), 1);
        assert_eq!(game.false_starts(), 0);
    }

    #[test]
    fn easy_target_is_centered_hard_target_is_not_clamped_to_center() {
        // Easy uses a fixed center position.
        let mut game = ReactionGame::new(Difficulty::Easy, 17);
        game.start(0.0);
        let mut t = 0.0;
        loop {
            game.advance(t);
            if let Stage::Target { pos, .. } = game.stage() {
                assert_eq!(pos, Vec2::new(50.0, 50.0));
                break;
            }
            t += 16.0;
        }

        let mut game = ReactionGame::new(Difficulty::Hard, 17);
        game.start(0.0);
        let mut t = 0.0;
        loop {
            game.advance(t);
            if let Stage::Target { pos, .. } = game.stage() {
                assert!(pos.x >= 15.0 && pos.x <= 85.0);
                assert!(pos.y >= 15.0 && pos.y <= 85.0);
                break;
            }
            t += 16.0;
        }
    }

    #[test]
    fn average_and_best_come_from_recorded_times() {
        let mut game = ReactionGame::new(Difficulty::Easy, 4);
        game.start(0.0);
        let reactions = [300.0, 200.0, 400.0, 250.0, 350.0];
        let mut t = 0.0;
        for ms in reactions {
            t = play_round(&mut game, t, ms);
            t += consts::REACTION_PAUSE_MS;
        }
        game.advance(t);
        match game.result() {
            Some(GameResult::Reaction {
                attempts,
                average_time,
                best_time,
                ..
            }) => {
                assert_eq!(attempts.len(), 5);
                assert!((best_time - 200.0).abs() < 20.0);
                assert!((average_time - 300.0).abs() < 20.0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
