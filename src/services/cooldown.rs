//! Per-user gate enforcing the minimum interval between XP grants.
//!
//! The gate is a bounded in-memory map from user id to the instant the
//! user was last granted XP. Entries expire after a fixed TTL and are
//! pruned lazily. When the map is full, the entry with the oldest
//! marked-at instant is evicted (least recently active, since marking
//! refreshes the instant); an evicted user simply becomes eligible
//! again early, which is acceptable. Nothing here is persisted, so a
//! restart re-opens the gate for everyone.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub struct CooldownGate {
    capacity: usize,
    ttl: Duration,
    entries: HashMap<u64, Instant>,
}

impl CooldownGate {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        CooldownGate {
            capacity,
            ttl,
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Single check-and-mark step: returns `false` if the user is still
    /// cooling down, otherwise marks them active and returns `true`.
    /// Doing both under one call (and one lock at the caller) keeps two
    /// rapid messages from both slipping through the gate.
    pub fn try_pass(&mut self, user_id: u64) -> bool {
        self.try_pass_at(user_id, Instant::now())
    }

    fn try_pass_at(&mut self, user_id: u64, now: Instant) -> bool {
        if self.is_on_cooldown_at(user_id, now) {
            return false;
        }

        self.mark_active_at(user_id, now);
        true
    }

    fn is_on_cooldown_at(&mut self, user_id: u64, now: Instant) -> bool {
        match self.entries.get(&user_id) {
            Some(&marked) if now.duration_since(marked) < self.ttl => true,
            Some(_) => {
                self.entries.remove(&user_id);
                false
            }
            None => false,
        }
    }

    fn mark_active_at(&mut self, user_id: u64, now: Instant) {
        self.entries
            .retain(|_, &mut marked| now.duration_since(marked) < self.ttl);

        if self.entries.len() >= self.capacity && !self.entries.contains_key(&user_id) {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, &marked)| marked)
                .map(|(&id, _)| id);

            if let Some(id) = oldest {
                self.entries.remove(&id);
            }
        }

        self.entries.insert(user_id, now);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(12);

    #[test]
    fn marking_starts_a_cooldown() {
        let mut gate = CooldownGate::new(100, TTL);
        let now = Instant::now();

        assert!(!gate.is_on_cooldown_at(1, now));
        gate.mark_active_at(1, now);
        assert!(gate.is_on_cooldown_at(1, now));
        assert!(gate.is_on_cooldown_at(1, now + Duration::from_secs(11)));
    }

    #[test]
    fn cooldown_expires_after_the_ttl() {
        let mut gate = CooldownGate::new(100, TTL);
        let now = Instant::now();

        gate.mark_active_at(7, now);
        assert!(!gate.is_on_cooldown_at(7, now + TTL));
        // The expired entry is dropped, not just ignored.
        assert_eq!(gate.len(), 0);
    }

    #[test]
    fn passing_closes_the_gate_in_the_same_step() {
        let mut gate = CooldownGate::new(100, TTL);
        let now = Instant::now();

        // Back-to-back messages: only the first may earn XP.
        assert!(gate.try_pass_at(5, now));
        assert!(!gate.try_pass_at(5, now));
        assert!(!gate.try_pass_at(5, now + Duration::from_secs(11)));
        assert!(gate.try_pass_at(5, now + TTL));
    }

    #[test]
    fn users_do_not_interfere() {
        let mut gate = CooldownGate::new(100, TTL);
        let now = Instant::now();

        gate.mark_active_at(1, now);
        assert!(!gate.is_on_cooldown_at(2, now));
    }

    #[test]
    fn capacity_evicts_the_least_recently_active() {
        let mut gate = CooldownGate::new(3, TTL);
        let now = Instant::now();

        gate.mark_active_at(1, now);
        gate.mark_active_at(2, now + Duration::from_secs(1));
        gate.mark_active_at(3, now + Duration::from_secs(2));
        // Refresh user 1 so user 2 becomes the oldest.
        gate.mark_active_at(1, now + Duration::from_secs(3));

        gate.mark_active_at(4, now + Duration::from_secs(4));

        assert_eq!(gate.len(), 3);
        assert!(gate.is_on_cooldown_at(1, now + Duration::from_secs(4)));
        assert!(!gate.is_on_cooldown_at(2, now + Duration::from_secs(4)));
        assert!(gate.is_on_cooldown_at(3, now + Duration::from_secs(4)));
        assert!(gate.is_on_cooldown_at(4, now + Duration::from_secs(4)));
    }

    #[test]
    fn remarking_an_existing_user_does_not_evict() {
        let mut gate = CooldownGate::new(2, TTL);
        let now = Instant::now();

        gate.mark_active_at(1, now);
        gate.mark_active_at(2, now + Duration::from_secs(1));
        gate.mark_active_at(1, now + Duration::from_secs(2));

        assert!(gate.is_on_cooldown_at(2, now + Duration::from_secs(2)));
    }

    #[test]
    fn expired_entries_free_capacity_before_eviction() {
        let mut gate = CooldownGate::new(2, TTL);
        let now = Instant::now();

        gate.mark_active_at(1, now);
        gate.mark_active_at(2, now + Duration::from_secs(1));
        // Both expire; the new mark should prune rather than evict.
        gate.mark_active_at(3, now + Duration::from_secs(30));

        assert_eq!(gate.len(), 1);
        assert!(gate.is_on_cooldown_at(3, now + Duration::from_secs(30)));
    }
}
