//! Whack-a-mole: moles pop out of a hole grid and escape after a fixed
//! visible window unless clicked first.
//!
//! A click and the expiry timeout can race on the same mole; arena
//! resolution is first-wins, so the mole counts as exactly one of
//! hit or escaped.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::api::GameResult;
use crate::consts;
use crate::engine::{
    CompletionLatch, Countdown, Entity, EntityArena, Outcome, RoundPhase, SpawnScheduler,
};
use crate::tuning::{Difficulty, WhackMoleSettings};

#[derive(Debug, Clone, Copy)]
pub struct Mole {
    /// Hole index, row-major in the `grid_size x grid_size` grid
    pub hole: usize,
}

#[derive(Debug)]
pub struct WhackMoleGame {
    difficulty: Difficulty,
    settings: WhackMoleSettings,
    phase: RoundPhase,
    moles: EntityArena<Mole>,
    spawner: SpawnScheduler,
    countdown: Countdown,
    latch: CompletionLatch,
    hits: u32,
    misses: u32,
    rng: Pcg32,
}

impl WhackMoleGame {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        let settings = WhackMoleSettings::for_difficulty(difficulty);
        Self {
            difficulty,
            settings,
            phase: RoundPhase::Idle,
            moles: EntityArena::new(),
            spawner: SpawnScheduler::new(settings.spawn_interval_ms, settings.max_moles),
            countdown: Countdown::new(settings.duration_secs),
            latch: CompletionLatch::new(),
            hits: 0,
            misses: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &WhackMoleSettings {
        &self.settings
    }

    pub fn start(&mut self, now_ms: f64) {
        self.moles.clear();
        self.hits = 0;
        self.misses = 0;
        self.countdown = Countdown::new(self.settings.duration_secs);
        self.latch = CompletionLatch::new();
        self.spawner.arm(now_ms);
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

    /// Frame step: expire overdue moles, purge finished animations,
    /// spawn on cadence.
    pub fn advance(&mut self, now_ms: f64) {
        if self.phase != RoundPhase::Playing {
            return;
        }

        let overdue: Vec<u32> = self
            .moles
            .iter_pending()
            .filter(|e| now_ms - e.spawned_at_ms >= self.settings.mole_visible_ms)
            .map(|e| e.id)
            .collect();
        for id in overdue {
            if self.moles.resolve(id, Outcome::Expired, now_ms) {
                self.misses += 1;
            }
        }

        // Resolved moles stay briefly for the shell's pop animation.
        self.moles.purge_resolved(now_ms, consts::MOLE_LINGER_MS);

        if self.spawner.poll(now_ms, self.moles.pending_count()) {
            let occupied: Vec<usize> = self.moles.iter_pending().map(|e| e.payload.hole).collect();
            let free: Vec<usize> = (0..self.settings.holes())
                .filter(|h| !occupied.contains(h))
                .collect();
            if !free.is_empty() {
                let hole = free[self.rng.random_range(0..free.len())];
                self.moles.spawn(Mole { hole }, now_ms);
            }
        }
    }

    /// Click on `hole`. Returns `true` when a pending mole was whacked.
    pub fn whack(&mut self, hole: usize, now_ms: f64) -> bool {
        if self.phase != RoundPhase::Playing {
            return false;
        }
        match self
            .moles
            .resolve_first(|m| m.hole == hole, Outcome::Hit, now_ms)
        {
            Some(_) => {
                self.hits += 1;
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

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn moles(&self) -> impl Iterator<Item = &Entity<Mole>> {
        self.moles.iter()
    }

    pub fn result(&self) -> Option<GameResult> {
        if self.phase != RoundPhase::Finished {
            return None;
        }
        Some(GameResult::WhackMole {
            difficulty: self.difficulty,
            hits: self.hits,
            misses: self.misses,
            total_time: self.settings.duration_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_respects_interval_and_cap() {
        // Easy: cap 1, spawn every 2000 ms, moles visible 2500 ms.
        let mut game = WhackMoleGame::new(Difficulty::Easy, 11);
        game.start(0.0);
        game.advance(1999.0);
        assert_eq!(game.moles.pending_count(), 0);
        game.advance(2000.0);
        assert_eq!(game.moles.pending_count(), 1);
        // At cap: the 4000 ms attempt is consumed, nothing spawns.
        game.advance(4000.0);
        assert_eq!(game.moles.pending_count(), 1);
        assert_eq!(game.moles().count(), 1);
    }

    #[test]
    fn pending_moles_occupy_distinct_holes() {
        // Hard: spawn every 900 ms, so two moles overlap before the
        // first expires at 1200 ms of age.
        let mut game = WhackMoleGame::new(Difficulty::Hard, 3);
        game.start(0.0);
        game.advance(900.0);
        game.advance(1800.0);
        let holes: Vec<usize> = game.moles.iter_pending().map(|e| e.payload.hole).collect();
        assert_eq!(holes.len(), 2);
        assert_ne!(holes[0], holes[1]);
    }

    #[test]
    fn whack_hits_pending_mole() {
        let mut game = WhackMoleGame::new(Difficulty::Easy, 5);
        game.start(0.0);
        game.advance(2000.0);
        let hole = game.moles.iter_pending().next().unwrap().payload.hole;
        assert!(game.whack(hole, 2100.0));
        assert_eq!(game.hits(), 1);
        // Empty hole click is a no-op.
        assert!(!game.whack(hole, 2200.0));
        assert_eq!(game.hits(), 1);
    }

    #[test]
    fn expiry_and_click_race_counts_once() {
        let mut game = WhackMoleGame::new(Difficulty::Easy, 5);
        game.start(0.0);
        game.advance(2000.0);
        let hole = game.moles.iter_pending().next().unwrap().payload.hole;
        // Easy moles live 2500 ms: expire at 4500.
        game.advance(4500.0);
        assert_eq!(game.misses(), 1);
        // The late click loses the race.
        assert!(!game.whack(hole, 4501.0));
        assert_eq!(game.hits(), 0);
        assert_eq!(game.misses(), 1);
    }

    #[test]
    fn resolved_mole_lingers_then_purges() {
        let mut game = WhackMoleGame::new(Difficulty::Easy, 5);
        game.start(0.0);
        game.advance(2000.0);
        let hole = game.moles.iter_pending().next().unwrap().payload.hole;
        game.whack(hole, 2100.0);
        game.advance(2200.0);
        assert_eq!(game.moles().count(), 1);
        game.advance(2500.0);
        assert_eq!(game.moles().count(), 0);
    }

    #[test]
    fn round_finishes_once_with_result() {
        let mut game = WhackMoleGame::new(Difficulty::Easy, 5);
        game.start(0.0);
        let mut completions = 0;
        for _ in 0..35 {
            if game.tick_second() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        match game.result() {
            Some(GameResult::WhackMole { total_time, .. }) => assert_eq!(total_time, 30),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
