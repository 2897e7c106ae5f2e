//! Account-related types for the marketplace engine
//!
//! This module defines the per-actor currency account and the overflow
//! stash that receives items which could not be delivered to the actor's
//! storage.

use super::listing::ItemId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Actor identifier
///
/// One account exists per actor, created on first observation.
pub type ActorId = u64;

/// Fixed starting grant credited to every newly observed actor
pub fn starting_balance() -> Decimal {
    Decimal::new(40_000_00, 2)
}

/// A batch of items of one type held in the overflow stash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBatch {
    /// The item the batch consists of
    pub item_id: ItemId,

    /// Number of units in the batch
    pub quantity: u64,
}

/// Per-actor currency account state
///
/// Balances carry 2-decimal precision. The stash holds item batches that
/// could not be delivered because the actor's storage was full; actors
/// retrieve them one unit at a time once they have space again.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The actor this account belongs to
    pub actor: ActorId,

    /// Current currency balance
    pub balance: Decimal,

    /// Item batches awaiting delivery
    pub stash: Vec<ItemBatch>,
}

impl Account {
    /// Create a new account holding the starting grant and an empty stash
    pub fn new(actor: ActorId) -> Self {
        Account {
            actor,
            balance: starting_balance(),
            stash: Vec::new(),
        }
    }
}
