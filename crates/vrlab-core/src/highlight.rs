//! Per-entity highlight deadlines.
//!
//! The board keeps at most one deadline per entity. Setting a highlight again
//! replaces the deadline (last write wins), which is what cancels the pending
//! expiry for that entity. Time is [`tokio::time::Instant`] so that paused-clock
//! tests drive expiry deterministically.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;
use vrlab_types::EntityId;

/// Active highlights keyed by entity.
#[derive(Debug, Default, Clone)]
pub struct HighlightBoard {
    deadlines: BTreeMap<EntityId, Instant>,
}

impl HighlightBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight `id` until `now + duration`, replacing any earlier deadline.
    pub fn set(&mut self, id: EntityId, now: Instant, duration: Duration) {
        let expires_at = now.checked_add(duration).unwrap_or(now);
        self.deadlines.insert(id, expires_at);
    }

    /// Whether `id` is highlighted at `now`.
    pub fn is_active(&self, id: &EntityId, now: Instant) -> bool {
        self.deadlines.get(id).is_some_and(|expires_at| *expires_at > now)
    }

    /// Remove every highlight with `expires_at <= now` and return the ids removed.
    ///
    /// Idempotent: a second call with the same `now` removes nothing.
    pub fn clear_expired(&mut self, now: Instant) -> Vec<EntityId> {
        let expired: Vec<EntityId> = self
            .deadlines
            .iter()
            .filter(|(_, expires_at)| **expires_at <= now)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            self.deadlines.remove(id);
        }
        expired
    }

    /// The earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Drop every highlight.
    pub fn clear_all(&mut self) {
        self.deadlines.clear();
    }

    /// Number of entities currently on the board.
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Whether nothing is highlighted.
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn later_set_resets_expiry() {
        let start = Instant::now();
        let fish = EntityId::from("tropical_fish_0");
        let mut board = HighlightBoard::new();

        board.set(fish.clone(), start, ms(2000));
        board.set(fish.clone(), start + ms(500), ms(3000));

        assert!(board.clear_expired(start + ms(2500)).is_empty());
        assert!(board.is_active(&fish, start + ms(2500)));
        assert_eq!(board.clear_expired(start + ms(3500)), vec![fish.clone()]);
        assert!(!board.is_active(&fish, start + ms(3500)));
    }

    #[test]
    fn entities_expire_independently() {
        let start = Instant::now();
        let mut board = HighlightBoard::new();
        board.set(EntityId::from("deer_1"), start, ms(3000));
        board.set(EntityId::from("bird_3"), start + ms(1000), ms(3000));

        assert_eq!(board.next_deadline(), Some(start + ms(3000)));
        assert_eq!(board.clear_expired(start + ms(3000)), vec![EntityId::from("deer_1")]);
        assert_eq!(board.len(), 1);
        assert_eq!(board.next_deadline(), Some(start + ms(4000)));
    }

    #[test]
    fn clear_expired_is_idempotent() {
        let start = Instant::now();
        let mut board = HighlightBoard::new();
        board.set(EntityId::from("laboratory"), start, ms(3000));

        let now = start + ms(3000);
        assert_eq!(board.clear_expired(now).len(), 1);
        assert!(board.clear_expired(now).is_empty());
        assert!(board.is_empty());
    }

    #[test]
    fn clear_all_drops_pending_deadlines() {
        let start = Instant::now();
        let mut board = HighlightBoard::new();
        board.set(EntityId::from("oxygen_tanks"), start, ms(3000));
        board.clear_all();
        assert_eq!(board.next_deadline(), None);
    }
}
