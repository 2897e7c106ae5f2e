//! Collaborator traits at the engine's external boundaries
//!
//! The engine owns pricing and the two ledgers; everything it needs from
//! the host application comes in through these traits: the actor's item
//! storage, the display refresh hook, and the backing container of a
//! player stall.

use crate::types::ActorId;
use rust_decimal::Decimal;

/// An actor's item storage, owned by the host application
///
/// The engine verifies holdings before sells and delivers bought items
/// through this trait; delivery may partially fail when storage is full,
/// in which case the remainder is routed to the account's overflow stash.
pub trait Holdings {
    /// Units of `item` the actor currently holds
    fn held_quantity(&self, actor: ActorId, item: &str) -> u64;

    /// Remove `quantity` units of `item` from the actor's storage
    ///
    /// Returns the number of units actually removed; callers verify
    /// holdings first and treat a shortfall as a failed precondition.
    fn remove(&mut self, actor: ActorId, item: &str, quantity: u64) -> u64;

    /// Deliver `quantity` units of `item` into the actor's storage
    ///
    /// Returns the number of units accepted; the rest did not fit.
    fn deliver(&mut self, actor: ActorId, item: &str, quantity: u64) -> u64;
}

/// Display-refresh hook raised on every balance change
///
/// The host typically re-renders a HUD or scoreboard here. The engine
/// calls it after the mutation has been applied.
pub trait BalanceListener {
    /// The actor's balance changed to `balance`
    fn balance_changed(&mut self, actor: ActorId, balance: Decimal);
}

/// The backing container of a player stall, owned by the host world
pub trait StallContainer {
    /// Units of `item` available in the container
    fn available(&self, item: &str) -> u64;

    /// Take `quantity` units of `item` out of the container
    ///
    /// Returns false (and takes nothing) when fewer than `quantity` units
    /// are present.
    fn take(&mut self, item: &str, quantity: u64) -> bool;
}
