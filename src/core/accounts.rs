//! Account ledger
//!
//! This module provides the `AccountRegistry` which maintains the state of
//! all actor accounts and provides funds-guarded balance operations plus
//! the overflow stash.
//!
//! The AccountRegistry is responsible for:
//! - Creating accounts on first observation (with the starting grant)
//! - Adjusting balances with checked arithmetic
//! - Guarding buy-path debits against insufficient funds
//! - Stashing item batches that could not be delivered
//! - Raising the display-refresh event on every balance change

use crate::core::traits::BalanceListener;
use crate::types::{Account, ActorId, ItemBatch, MarketError};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Manages all actor accounts and their balances
pub struct AccountRegistry {
    accounts: HashMap<ActorId, Account>,
    listener: Option<Box<dyn BalanceListener + Send>>,
}

impl AccountRegistry {
    /// Create a new AccountRegistry with no accounts
    pub fn new() -> Self {
        AccountRegistry {
            accounts: HashMap::new(),
            listener: None,
        }
    }

    /// Install the display-refresh hook
    ///
    /// Called with the new balance after every credit or debit.
    pub fn set_listener(&mut self, listener: Box<dyn BalanceListener + Send>) {
        self.listener = Some(listener);
    }

    /// Get or create the account for the specified actor
    ///
    /// New accounts hold the fixed starting grant.
    pub fn get_or_create(&mut self, actor: ActorId) -> &mut Account {
        self.accounts.entry(actor).or_insert_with(|| Account::new(actor))
    }

    /// The actor's current balance, creating the account if needed
    pub fn balance(&mut self, actor: ActorId) -> Decimal {
        self.get_or_create(actor).balance
    }

    /// Read-only view of an existing account
    pub fn get(&self, actor: ActorId) -> Option<&Account> {
        self.accounts.get(&actor)
    }

    /// All accounts sorted by actor ID, for deterministic output
    pub fn all_accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by_key(|account| account.actor);
        accounts
    }

    /// Restore an account during state load
    pub(crate) fn restore(&mut self, account: Account) {
        self.accounts.insert(account.actor, account);
    }

    /// Credit the actor's balance
    ///
    /// # Errors
    ///
    /// Returns an error if adding the amount would overflow.
    pub fn credit(&mut self, actor: ActorId, amount: Decimal) -> Result<(), MarketError> {
        let account = self.get_or_create(actor);

        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| MarketError::arithmetic_overflow("credit", actor))?;

        self.notify(actor);
        Ok(())
    }

    /// Debit the actor's balance unconditionally
    ///
    /// The balance may go negative on this path; every buy path uses
    /// [`secure_debit`](Self::secure_debit) instead.
    pub fn debit(&mut self, actor: ActorId, amount: Decimal) -> Result<(), MarketError> {
        let account = self.get_or_create(actor);

        account.balance = account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| MarketError::arithmetic_overflow("debit", actor))?;

        self.notify(actor);
        Ok(())
    }

    /// Funds-guarded debit used by every buy path
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` and performs no mutation when the
    /// balance is smaller than the amount.
    pub fn secure_debit(&mut self, actor: ActorId, amount: Decimal) -> Result<(), MarketError> {
        let balance = self.balance(actor);

        if balance < amount {
            return Err(MarketError::insufficient_funds(actor, balance, amount));
        }

        self.debit(actor, amount)
    }

    /// Stash an item batch that could not be delivered
    ///
    /// Batches of the same item merge into one.
    pub fn stash(&mut self, actor: ActorId, batch: ItemBatch) {
        let account = self.get_or_create(actor);

        if let Some(existing) = account
            .stash
            .iter_mut()
            .find(|b| b.item_id == batch.item_id)
        {
            existing.quantity += batch.quantity;
        } else {
            account.stash.push(batch);
        }
    }

    /// Remove one unit of `item` from the actor's stash
    ///
    /// The batch is dropped entirely when its last unit is taken.
    ///
    /// # Errors
    ///
    /// Returns `StashMiss` when no batch of the item exists.
    pub fn unstash(&mut self, actor: ActorId, item: &str) -> Result<(), MarketError> {
        let account = self.get_or_create(actor);

        let position = account
            .stash
            .iter()
            .position(|batch| batch.item_id == item)
            .ok_or_else(|| MarketError::stash_miss(actor, item))?;

        if account.stash[position].quantity > 1 {
            account.stash[position].quantity -= 1;
        } else {
            account.stash.remove(position);
        }

        Ok(())
    }

    fn notify(&mut self, actor: ActorId) {
        let balance = self.accounts[&actor].balance;
        if let Some(listener) = self.listener.as_mut() {
            listener.balance_changed(actor, balance);
        }
    }
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::starting_balance;
    use std::sync::mpsc;

    #[test]
    fn test_first_observation_grants_starting_balance() {
        let mut registry = AccountRegistry::new();

        assert_eq!(registry.balance(7), starting_balance());
    }

    #[test]
    fn test_credit_increases_balance() {
        let mut registry = AccountRegistry::new();

        registry.credit(1, Decimal::new(1050, 2)).unwrap();

        assert_eq!(registry.balance(1), starting_balance() + Decimal::new(1050, 2));
    }

    #[test]
    fn test_debit_decreases_balance() {
        let mut registry = AccountRegistry::new();

        registry.debit(1, Decimal::new(2500, 2)).unwrap();

        assert_eq!(registry.balance(1), starting_balance() - Decimal::new(2500, 2));
    }

    #[test]
    fn test_secure_debit_succeeds_with_sufficient_funds() {
        let mut registry = AccountRegistry::new();

        let result = registry.secure_debit(1, Decimal::from(100));

        assert!(result.is_ok());
        assert_eq!(registry.balance(1), starting_balance() - Decimal::from(100));
    }

    #[test]
    fn test_secure_debit_never_mutates_on_insufficient_funds() {
        let mut registry = AccountRegistry::new();
        let over = starting_balance() + Decimal::ONE;

        let result = registry.secure_debit(1, over);

        assert!(matches!(
            result,
            Err(MarketError::InsufficientFunds { .. })
        ));
        assert_eq!(registry.balance(1), starting_balance());
    }

    #[test]
    fn test_balance_listener_fires_on_changes() {
        struct Recorder(mpsc::Sender<(ActorId, Decimal)>);
        impl BalanceListener for Recorder {
            fn balance_changed(&mut self, actor: ActorId, balance: Decimal) {
                self.0.send((actor, balance)).unwrap();
            }
        }

        let (tx, rx) = mpsc::channel();
        let mut registry = AccountRegistry::new();
        registry.set_listener(Box::new(Recorder(tx)));

        registry.credit(3, Decimal::from(10)).unwrap();
        registry.debit(3, Decimal::from(4)).unwrap();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                (3, starting_balance() + Decimal::from(10)),
                (3, starting_balance() + Decimal::from(6)),
            ]
        );
    }

    #[test]
    fn test_stash_merges_batches_of_same_item() {
        let mut registry = AccountRegistry::new();

        registry.stash(
            1,
            ItemBatch {
                item_id: "stone".to_string(),
                quantity: 3,
            },
        );
        registry.stash(
            1,
            ItemBatch {
                item_id: "stone".to_string(),
                quantity: 2,
            },
        );

        let account = registry.get(1).unwrap();
        assert_eq!(account.stash.len(), 1);
        assert_eq!(account.stash[0].quantity, 5);
    }

    #[test]
    fn test_unstash_removes_single_units_then_the_batch() {
        let mut registry = AccountRegistry::new();
        registry.stash(
            1,
            ItemBatch {
                item_id: "stone".to_string(),
                quantity: 2,
            },
        );

        registry.unstash(1, "stone").unwrap();
        assert_eq!(registry.get(1).unwrap().stash[0].quantity, 1);

        registry.unstash(1, "stone").unwrap();
        assert!(registry.get(1).unwrap().stash.is_empty());

        assert!(matches!(
            registry.unstash(1, "stone"),
            Err(MarketError::StashMiss { .. })
        ));
    }
}
