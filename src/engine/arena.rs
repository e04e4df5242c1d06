//! Transient game entities with idempotent resolution
//!
//! Every spawned entity (letter, mole, target) resolves to exactly one
//! of hit/missed/expired, first-resolution-wins. A lifetime timeout and
//! a late user click may both try to resolve the same entity; whichever
//! lands first sticks, the other is a no-op. Entities are stored in
//! spawn order with monotonically increasing ids, which makes
//! "earliest-spawned wins" the deterministic tie-break for value-based
//! matching.

use serde::{Deserialize, Serialize};

/// Terminal state of an entity. No entity ever transitions out of a
/// resolved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Hit,
    Missed,
    Expired,
}

/// A live or recently-resolved game entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity<T> {
    pub id: u32,
    pub payload: T,
    pub spawned_at_ms: f64,
    outcome: Option<Outcome>,
    resolved_at_ms: Option<f64>,
}

impl<T> Entity<T> {
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_pending(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn resolved_at_ms(&self) -> Option<f64> {
        self.resolved_at_ms
    }
}

/// Ordered arena of entities owned by one round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityArena<T> {
    entities: Vec<Entity<T>>,
    next_id: u32,
}

impl<T> Default for EntityArena<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T> EntityArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, payload: T, now_ms: f64) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            payload,
            spawned_at_ms: now_ms,
            outcome: None,
            resolved_at_ms: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_pending()).count()
    }

    pub fn get(&self, id: u32) -> Option<&Entity<T>> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity<T>> {
        self.entities.iter()
    }

    pub fn iter_pending(&self) -> impl Iterator<Item = &Entity<T>> {
        self.entities.iter().filter(|e| e.is_pending())
    }

    /// Mutable access to every entity. Resolution state stays read-only,
    /// only the payload can change.
    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity<T>> {
        self.entities.iter_mut()
    }

    /// Mutable access to pending payloads, for per-frame motion updates.
    pub fn pending_payloads_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> {
        self.entities
            .iter_mut()
            .filter(|e| e.outcome.is_none())
            .map(|e| (e.id, &mut e.payload))
    }

    /// Resolve entity `id`. Returns `true` only if this call performed
    /// the resolution; a second attempt, whatever its outcome, loses.
    pub fn resolve(&mut self, id: u32, outcome: Outcome, now_ms: f64) -> bool {
        match self.entities.iter_mut().find(|e| e.id == id) {
            Some(e) if e.outcome.is_none() => {
                e.outcome = Some(outcome);
                e.resolved_at_ms = Some(now_ms);
                true
            }
            _ => false,
        }
    }

    /// Resolve the earliest-spawned pending entity matching `pred`.
    pub fn resolve_first<F>(&mut self, pred: F, outcome: Outcome, now_ms: f64) -> Option<u32>
    where
        F: Fn(&T) -> bool,
    {
        let id = self
            .entities
            .iter()
            .find(|e| e.is_pending() && pred(&e.payload))?
            .id;
        self.resolve(id, outcome, now_ms);
        Some(id)
    }

    /// Remove resolved entities whose linger window has passed.
    pub fn purge_resolved(&mut self, now_ms: f64, linger_ms: f64) {
        self.entities.retain(|e| match e.resolved_at_ms {
            Some(at) => now_ms - at < linger_ms,
            None => true,
        });
    }

    /// Remove entities that fail `keep`, resolved or not.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Entity<T>) -> bool,
    {
        self.entities.retain(keep);
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_resolution_wins() {
        let mut arena = EntityArena::new();
        let id = arena.spawn('a', 0.0);
        assert!(arena.resolve(id, Outcome::Hit, 10.0));
        assert!(!arena.resolve(id, Outcome::Expired, 20.0));
        assert_eq!(arena.get(id).unwrap().outcome(), Some(Outcome::Hit));
        assert_eq!(arena.get(id).unwrap().resolved_at_ms(), Some(10.0));
    }

    #[test]
    fn resolve_first_prefers_earliest_spawn() {
        let mut arena = EntityArena::new();
        let first = arena.spawn('x', 0.0);
        let _second = arena.spawn('x', 5.0);
        let hit = arena.resolve_first(|c| *c == 'x', Outcome::Hit, 10.0);
        assert_eq!(hit, Some(first));
        assert_eq!(arena.pending_count(), 1);
    }

    #[test]
    fn resolve_first_skips_resolved() {
        let mut arena = EntityArena::new();
        let first = arena.spawn('x', 0.0);
        let second = arena.spawn('x', 5.0);
        arena.resolve(first, Outcome::Missed, 8.0);
        let hit = arena.resolve_first(|c| *c == 'x', Outcome::Hit, 10.0);
        assert_eq!(hit, Some(second));
    }

    #[test]
    fn purge_keeps_pending_and_recent() {
        let mut arena = EntityArena::new();
        let a = arena.spawn(1, 0.0);
        let _b = arena.spawn(2, 0.0);
        arena.resolve(a, Outcome::Hit, 100.0);
        arena.purge_resolved(150.0, 300.0);
        assert_eq!(arena.len(), 2);
        arena.purge_resolved(500.0, 300.0);
        assert_eq!(arena.len(), 1);
    }

    proptest! {
        /// Under any interleaving of resolution attempts, each entity
        /// ends with exactly one outcome: the first attempt against it.
        #[test]
        fn resolution_is_idempotent(
            attempts in proptest::collection::vec((0u32..8, 0u8..3), 1..64)
        ) {
            let mut arena = EntityArena::new();
            let ids: Vec<u32> = (0..8).map(|i| arena.spawn(i, 0.0)).collect();

            let mut first_attempt: std::collections::HashMap<u32, Outcome> =
                std::collections::HashMap::new();
            let mut performed = 0usize;

            for (idx, raw) in attempts {
                let id = ids[idx as usize];
                let outcome = match raw {
                    0 => Outcome::Hit,
                    1 => Outcome::Missed,
                    _ => Outcome::Expired,
                };
                if arena.resolve(id, outcome, 1.0) {
                    performed += 1;
                    first_attempt.insert(id, outcome);
                }
            }

            // Exactly one resolution per touched entity, matching the
            // first attempt against it.
            prop_assert_eq!(performed, first_attempt.len());
            for entity in arena.iter() {
                match first_attempt.get(&entity.id) {
                    Some(expected) => prop_assert_eq!(entity.outcome(), Some(*expected)),
                    None => prop_assert!(entity.is_pending()),
                }
            }
        }
    }
}
