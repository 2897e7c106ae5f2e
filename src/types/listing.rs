//! Listing-related types for the marketplace engine
//!
//! This module defines the catalog entry for a tradeable item: its category,
//! its immutable base price, the quantity currently on the market, and the
//! bounded history of committed trades.

use super::account::ActorId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Item identifier
///
/// Items are identified by their lowercase snake_case name
/// (e.g. `"cobblestone"`, `"golden_apple"`).
pub type ItemId = String;

/// Maximum number of trades retained per listing
///
/// Trade history would otherwise grow without bound over a long process
/// lifetime; older trades are dropped once this many are recorded.
pub const HISTORY_CAP: usize = 128;

/// Category a tradeable item belongs to
///
/// The category decides which price table an identifier is matched against
/// at catalog-initialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// Building blocks (stone, planks, glass, ...)
    Block,
    /// Raw ores and gems (coal, diamond, ...)
    Ore,
    /// Miscellaneous items (stick, paper, pearl, ...)
    Item,
    /// Edible items (bread, cooked meats, ...)
    Food,
    /// Decorative blocks and items (flowers, paintings, ...)
    Decorative,
}

/// Kind of a committed trade
///
/// Single-unit and multi-unit variants are recorded separately so the
/// history can be rendered the way the shop UI distinguishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeKind {
    /// A single unit bought from the market
    BuyOne,
    /// More than one unit bought from the market
    BuyMany,
    /// A single unit sold onto the market
    SellOne,
    /// More than one unit sold onto the market
    SellMany,
}

impl TradeKind {
    /// The buy kind matching the given quantity
    pub fn for_buy(quantity: u64) -> Self {
        if quantity == 1 {
            TradeKind::BuyOne
        } else {
            TradeKind::BuyMany
        }
    }

    /// The sell kind matching the given quantity
    pub fn for_sell(quantity: u64) -> Self {
        if quantity == 1 {
            TradeKind::SellOne
        } else {
            TradeKind::SellMany
        }
    }

    /// Whether this kind takes units off the market
    pub fn is_buy(self) -> bool {
        matches!(self, TradeKind::BuyOne | TradeKind::BuyMany)
    }
}

/// A committed trade, immutable once recorded
///
/// Exactly one `Trade` is appended to the owning listing's history per
/// commit, regardless of the traded quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    /// Kind of the trade (buy/sell, single/multi)
    pub kind: TradeKind,

    /// Number of units moved by this trade
    pub quantity: u64,

    /// The actor that committed the trade
    pub actor: ActorId,

    /// Total price paid (buy) or received (sell), already rounded
    pub total_price: Decimal,
}

/// A tradeable item's catalog entry
///
/// One listing exists per distinct item identifier, created at
/// catalog-initialization time and never deleted during normal operation.
/// `quantity_on_market` changes only through committed trades; quotes never
/// touch it.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    item_id: ItemId,
    category: ItemCategory,
    base_price: Decimal,
    quantity_on_market: i64,
    trade_history: VecDeque<Trade>,
}

impl Listing {
    /// Create a new listing with the given starting quantity and no history
    pub fn new(
        item_id: impl Into<ItemId>,
        category: ItemCategory,
        base_price: Decimal,
        starting_quantity: i64,
    ) -> Self {
        Listing {
            item_id: item_id.into(),
            category,
            base_price,
            quantity_on_market: starting_quantity,
            trade_history: VecDeque::new(),
        }
    }

    /// The identifier this listing is keyed by
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// The category the identifier was classified into
    pub fn category(&self) -> ItemCategory {
        self.category
    }

    /// The immutable reference price the elastic price is derived from
    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    /// Units of this item currently on the market
    pub fn quantity_on_market(&self) -> i64 {
        self.quantity_on_market
    }

    /// Committed trades, oldest first, bounded by [`HISTORY_CAP`]
    pub fn trade_history(&self) -> impl Iterator<Item = &Trade> {
        self.trade_history.iter()
    }

    /// Number of trades currently retained
    pub fn history_len(&self) -> usize {
        self.trade_history.len()
    }

    /// Record a committed buy: quantity leaves the market
    ///
    /// Callers must have validated stock; the quantity never goes negative
    /// through this path.
    pub(crate) fn apply_buy(&mut self, actor: ActorId, quantity: u64, total_price: Decimal) {
        self.quantity_on_market -= quantity as i64;
        self.push_trade(Trade {
            kind: TradeKind::for_buy(quantity),
            quantity,
            actor,
            total_price,
        });
    }

    /// Record a committed sell: quantity enters the market
    pub(crate) fn apply_sell(&mut self, actor: ActorId, quantity: u64, total_price: Decimal) {
        self.quantity_on_market += quantity as i64;
        self.push_trade(Trade {
            kind: TradeKind::for_sell(quantity),
            quantity,
            actor,
            total_price,
        });
    }

    /// Re-append a historical trade during state restore
    pub(crate) fn push_trade(&mut self, trade: Trade) {
        if self.trade_history.len() == HISTORY_CAP {
            self.trade_history.pop_front();
        }
        self.trade_history.push_back(trade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn listing() -> Listing {
        Listing::new("stone", ItemCategory::Block, Decimal::from(50), 200)
    }

    #[rstest]
    #[case::buy_one(1, TradeKind::BuyOne)]
    #[case::buy_many(64, TradeKind::BuyMany)]
    fn test_buy_kind_for_quantity(#[case] quantity: u64, #[case] expected: TradeKind) {
        assert_eq!(TradeKind::for_buy(quantity), expected);
    }

    #[rstest]
    #[case::sell_one(1, TradeKind::SellOne)]
    #[case::sell_many(10, TradeKind::SellMany)]
    fn test_sell_kind_for_quantity(#[case] quantity: u64, #[case] expected: TradeKind) {
        assert_eq!(TradeKind::for_sell(quantity), expected);
    }

    #[test]
    fn test_apply_buy_decrements_quantity_and_appends_one_trade() {
        let mut listing = listing();

        listing.apply_buy(1, 5, Decimal::new(31250, 2));

        assert_eq!(listing.quantity_on_market(), 195);
        assert_eq!(listing.history_len(), 1);
        let trade = listing.trade_history().next().unwrap();
        assert_eq!(trade.kind, TradeKind::BuyMany);
        assert_eq!(trade.quantity, 5);
    }

    #[test]
    fn test_apply_sell_increments_quantity_and_appends_one_trade() {
        let mut listing = listing();

        listing.apply_sell(2, 3, Decimal::new(4800, 2));

        assert_eq!(listing.quantity_on_market(), 203);
        assert_eq!(listing.history_len(), 1);
        assert_eq!(
            listing.trade_history().next().unwrap().kind,
            TradeKind::SellMany
        );
    }

    #[test]
    fn test_history_is_bounded() {
        let mut listing = listing();

        for i in 0..(HISTORY_CAP as u64 + 10) {
            listing.apply_sell(1, 1, Decimal::from(i));
        }

        assert_eq!(listing.history_len(), HISTORY_CAP);
        // Oldest entries were dropped first
        assert_eq!(
            listing.trade_history().next().unwrap().total_price,
            Decimal::from(10)
        );
    }
}
