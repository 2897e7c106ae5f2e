//! In-memory holdings implementation
//!
//! A capacity-bounded, in-memory [`Holdings`] used by the REPL binary and
//! the test suite. Real hosts implement [`Holdings`] over their own
//! storage model.

use crate::core::traits::Holdings;
use crate::types::ActorId;
use std::collections::HashMap;

/// Default per-actor storage capacity, in total units
pub const DEFAULT_CAPACITY: u64 = 2304;

/// In-memory item storage with a flat per-actor unit capacity
pub struct MemoryHoldings {
    capacity: u64,
    items: HashMap<(ActorId, String), u64>,
}

impl MemoryHoldings {
    /// Create storage with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create storage holding at most `capacity` total units per actor
    pub fn with_capacity(capacity: u64) -> Self {
        MemoryHoldings {
            capacity,
            items: HashMap::new(),
        }
    }

    /// Put units into storage regardless of capacity (test/setup helper)
    pub fn grant(&mut self, actor: ActorId, item: &str, quantity: u64) {
        *self.items.entry((actor, item.to_string())).or_insert(0) += quantity;
    }

    fn total_held(&self, actor: ActorId) -> u64 {
        self.items
            .iter()
            .filter(|((owner, _), _)| *owner == actor)
            .map(|(_, quantity)| quantity)
            .sum()
    }
}

impl Default for MemoryHoldings {
    fn default() -> Self {
        Self::new()
    }
}

impl Holdings for MemoryHoldings {
    fn held_quantity(&self, actor: ActorId, item: &str) -> u64 {
        self.items
            .get(&(actor, item.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn remove(&mut self, actor: ActorId, item: &str, quantity: u64) -> u64 {
        let key = (actor, item.to_string());
        let Some(held) = self.items.get_mut(&key) else {
            return 0;
        };

        let removed = quantity.min(*held);
        *held -= removed;
        if *held == 0 {
            self.items.remove(&key);
        }
        removed
    }

    fn deliver(&mut self, actor: ActorId, item: &str, quantity: u64) -> u64 {
        let free = self.capacity.saturating_sub(self.total_held(actor));
        let accepted = quantity.min(free);
        if accepted > 0 {
            *self.items.entry((actor, item.to_string())).or_insert(0) += accepted;
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deliver_and_query() {
        let mut holdings = MemoryHoldings::new();

        assert_eq!(holdings.deliver(1, "stone", 10), 10);
        assert_eq!(holdings.held_quantity(1, "stone"), 10);
        assert_eq!(holdings.held_quantity(2, "stone"), 0);
    }

    #[test]
    fn test_deliver_stops_at_capacity() {
        let mut holdings = MemoryHoldings::with_capacity(16);

        assert_eq!(holdings.deliver(1, "stone", 10), 10);
        assert_eq!(holdings.deliver(1, "dirt", 10), 6);
        assert_eq!(holdings.deliver(1, "glass", 5), 0);
    }

    #[test]
    fn test_capacity_is_per_actor() {
        let mut holdings = MemoryHoldings::with_capacity(8);

        assert_eq!(holdings.deliver(1, "stone", 8), 8);
        assert_eq!(holdings.deliver(2, "stone", 8), 8);
    }

    #[test]
    fn test_remove_caps_at_held() {
        let mut holdings = MemoryHoldings::new();
        holdings.grant(1, "stone", 5);

        assert_eq!(holdings.remove(1, "stone", 8), 5);
        assert_eq!(holdings.held_quantity(1, "stone"), 0);
    }
}
