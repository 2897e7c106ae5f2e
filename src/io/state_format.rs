//! CSV format handling for persisted market and account state
//!
//! This module centralizes the persistence format concerns: flat row
//! structures for listings, trades, accounts, and stash batches, plus the
//! pure conversions between rows and domain types. Actual file placement
//! lives in [`super::store`].

use crate::core::accounts::AccountRegistry;
use crate::core::market::Market;
use crate::types::{Account, ItemCategory, Listing, Trade, TradeKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One catalog listing, without its history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRow {
    /// The listed identifier
    pub item_id: String,
    /// Category the identifier was classified into
    pub category: ItemCategory,
    /// Immutable reference price
    pub base_price: Decimal,
    /// Units on the market at save time
    pub quantity_on_market: i64,
}

/// One historical trade, keyed by its listing
///
/// File order is history order; rows of one listing reload in the order
/// they were written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRow {
    /// The listing this trade belongs to
    pub item_id: String,
    /// Kind of the trade
    pub kind: TradeKind,
    /// Units moved
    pub quantity: u64,
    /// The committing actor
    pub actor: u64,
    /// Total paid or received
    pub total_price: Decimal,
}

/// One actor account, without its stash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRow {
    /// The account's actor
    pub actor: u64,
    /// Balance at save time
    pub balance: Decimal,
}

/// One stashed item batch, keyed by its account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StashRow {
    /// The account the batch belongs to
    pub actor: u64,
    /// The stashed item
    pub item_id: String,
    /// Units awaiting delivery
    pub quantity: u64,
}

/// Flatten the market's listings into rows
pub fn listing_rows(market: &Market) -> Vec<ListingRow> {
    market
        .listings()
        .iter()
        .map(|listing| ListingRow {
            item_id: listing.item_id().to_string(),
            category: listing.category(),
            base_price: listing.base_price(),
            quantity_on_market: listing.quantity_on_market(),
        })
        .collect()
}

/// Flatten all trade history into rows, listing by listing
pub fn trade_rows(market: &Market) -> Vec<TradeRow> {
    market
        .listings()
        .iter()
        .flat_map(|listing| {
            let item_id = listing.item_id().to_string();
            listing.trade_history().map(move |trade| TradeRow {
                item_id: item_id.clone(),
                kind: trade.kind,
                quantity: trade.quantity,
                actor: trade.actor,
                total_price: trade.total_price,
            })
        })
        .collect()
}

/// Rebuild a listing from its row
pub fn listing_from_row(row: ListingRow) -> Listing {
    Listing::new(
        row.item_id,
        row.category,
        row.base_price,
        row.quantity_on_market,
    )
}

/// Re-append a historical trade onto its reloaded listing
pub fn apply_trade_row(market: &mut Market, row: TradeRow) {
    if let Some(listing) = market.get_listing_mut(&row.item_id) {
        listing.push_trade(Trade {
            kind: row.kind,
            quantity: row.quantity,
            actor: row.actor,
            total_price: row.total_price,
        });
    }
}

/// Flatten the account registry into account and stash rows
pub fn account_rows(accounts: &AccountRegistry) -> (Vec<AccountRow>, Vec<StashRow>) {
    let mut account_rows = Vec::new();
    let mut stash_rows = Vec::new();

    for account in accounts.all_accounts() {
        account_rows.push(AccountRow {
            actor: account.actor,
            balance: account.balance,
        });
        for batch in &account.stash {
            stash_rows.push(StashRow {
                actor: account.actor,
                item_id: batch.item_id.clone(),
                quantity: batch.quantity,
            });
        }
    }

    (account_rows, stash_rows)
}

/// Rebuild an account from its row, stash attached separately
pub fn account_from_row(row: AccountRow) -> Account {
    Account {
        actor: row.actor,
        balance: row.balance,
        stash: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemBatch;

    #[test]
    fn test_listing_rows_round_trip() {
        let mut market = Market::new();
        market.initialize_catalog(["stone", "bread"], 200);
        market.commit_buy("stone", 1, 5).unwrap();

        let rows = listing_rows(&market);

        assert_eq!(rows.len(), 2);
        let stone = rows.iter().find(|row| row.item_id == "stone").unwrap();
        assert_eq!(stone.quantity_on_market, 195);

        let rebuilt = listing_from_row(stone.clone());
        assert_eq!(rebuilt.quantity_on_market(), 195);
        assert_eq!(rebuilt.base_price(), Decimal::from(50));
        assert_eq!(rebuilt.category(), ItemCategory::Block);
    }

    #[test]
    fn test_trade_rows_cover_all_history() {
        let mut market = Market::new();
        market.initialize_catalog(["stone", "bread"], 200);
        market.commit_buy("stone", 1, 5).unwrap();
        market.commit_sell("bread", 2, 3).unwrap();

        let rows = trade_rows(&market);

        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .any(|row| row.item_id == "stone" && row.kind == TradeKind::BuyMany));
        assert!(rows
            .iter()
            .any(|row| row.item_id == "bread" && row.kind == TradeKind::SellMany));
    }

    #[test]
    fn test_account_rows_split_stash() {
        let mut accounts = AccountRegistry::new();
        accounts.credit(1, Decimal::from(10)).unwrap();
        accounts.stash(
            1,
            ItemBatch {
                item_id: "stone".to_string(),
                quantity: 4,
            },
        );
        accounts.balance(2);

        let (account_rows, stash_rows) = account_rows(&accounts);

        assert_eq!(account_rows.len(), 2);
        assert_eq!(stash_rows.len(), 1);
        assert_eq!(stash_rows[0].actor, 1);
        assert_eq!(stash_rows[0].quantity, 4);
    }
}
