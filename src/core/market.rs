//! Market ledger
//!
//! This module provides the `Market` struct: the catalog of listings, the
//! commit operations that mutate listed quantities, and identifier
//! resolution with fuzzy suggestions.
//!
//! Commits are the only operations that change a listing's quantity; price
//! quotes go through the pricing engine and never persist anything.

use crate::catalog;
use crate::core::resolver;
use crate::pricing;
use crate::types::{ActorId, Listing, MarketError, TradeKind};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info};

/// The catalog of listings and their trade history
///
/// Listings keep their catalog insertion order, which is also the stable
/// candidate order of the fuzzy resolver.
pub struct Market {
    listings: Vec<Listing>,
    index: HashMap<String, usize>,
}

impl Market {
    /// Create an empty market
    pub fn new() -> Self {
        Market {
            listings: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create listings for every sellable identifier not yet present
    ///
    /// Each identifier in `universe` is classified against the keyword
    /// price tables; deny-listed and unclassifiable identifiers are
    /// skipped. New listings start with `starting_quantity` units on the
    /// market.
    pub fn initialize_catalog<'a>(
        &mut self,
        universe: impl IntoIterator<Item = &'a str>,
        starting_quantity: i64,
    ) {
        let mut added = 0usize;

        for item_id in universe {
            if self.index.contains_key(item_id) {
                continue;
            }
            if catalog::is_deny_listed(item_id) {
                continue;
            }
            let Some((category, base_price)) = catalog::classify(item_id) else {
                continue;
            };

            self.insert(Listing::new(item_id, category, base_price, starting_quantity));
            info!(item_id, ?category, %base_price, starting_quantity, "listed item");
            added += 1;
        }

        info!(added, "catalog initialized");
    }

    fn insert(&mut self, listing: Listing) {
        self.index
            .insert(listing.item_id().to_string(), self.listings.len());
        self.listings.push(listing);
    }

    /// Re-insert a listing during state load
    pub(crate) fn restore(&mut self, listing: Listing) {
        match self.index.get(listing.item_id()) {
            Some(&position) => self.listings[position] = listing,
            None => self.insert(listing),
        }
    }

    /// Look up a listing by exact identifier
    pub fn get_listing(&self, item: &str) -> Option<&Listing> {
        self.index.get(item).map(|&position| &self.listings[position])
    }

    pub(crate) fn get_listing_mut(&mut self, item: &str) -> Option<&mut Listing> {
        self.index
            .get(item)
            .map(|&position| &mut self.listings[position])
    }

    /// Look up a listing, attaching a fuzzy suggestion on a miss
    ///
    /// # Errors
    ///
    /// Returns `UnknownItem` carrying the nearest listed identifier by
    /// edit distance (if the catalog is non-empty).
    pub fn resolve(&self, item: &str) -> Result<&Listing, MarketError> {
        match self.get_listing(item) {
            Some(listing) => Ok(listing),
            None => {
                let suggestion =
                    resolver::closest(item, self.item_ids()).map(|s| s.to_string());
                Err(MarketError::unknown_item(item, suggestion))
            }
        }
    }

    /// Whether the identifier may be listed on the market
    pub fn can_sell(&self, item: &str) -> bool {
        catalog::can_sell(item)
    }

    /// All listed identifiers in catalog insertion order
    pub fn item_ids(&self) -> impl Iterator<Item = &str> {
        self.listings.iter().map(|listing| listing.item_id())
    }

    /// All listings in catalog insertion order
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Commit a buy: units leave the market, one trade is recorded
    ///
    /// The total price is computed through the pricing engine before any
    /// mutation and returned to the caller for the account-side debit.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` when the quantity exceeds what is on
    /// the market. The workflow clamps quantities before its confirm
    /// screen, so this path is a ledger-level backstop.
    pub fn commit_buy(
        &mut self,
        item: &str,
        actor: ActorId,
        quantity: u64,
    ) -> Result<Decimal, MarketError> {
        let listing = self
            .get_listing_mut(item)
            .ok_or_else(|| MarketError::unknown_item(item, None))?;

        let available = listing.quantity_on_market();
        if available < 0 || quantity > available as u64 {
            return Err(MarketError::insufficient_stock(item, available, quantity));
        }

        let total = pricing::cumulative_price(listing, TradeKind::for_buy(quantity), quantity);
        listing.apply_buy(actor, quantity, total);

        debug!(item, actor, quantity, %total, "committed buy");
        Ok(total)
    }

    /// Commit a sell: units enter the market, one trade is recorded
    ///
    /// Returns the total price the seller is owed; the caller credits the
    /// account.
    ///
    /// # Errors
    ///
    /// Returns `QuantityOverflow` when the listed quantity cannot grow by
    /// `quantity` without leaving its representable range.
    pub fn commit_sell(
        &mut self,
        item: &str,
        actor: ActorId,
        quantity: u64,
    ) -> Result<Decimal, MarketError> {
        let listing = self
            .get_listing_mut(item)
            .ok_or_else(|| MarketError::unknown_item(item, None))?;

        let growth = i64::try_from(quantity)
            .ok()
            .and_then(|q| listing.quantity_on_market().checked_add(q));
        if growth.is_none() {
            return Err(MarketError::quantity_overflow(item, quantity));
        }

        let total = pricing::cumulative_price(listing, TradeKind::for_sell(quantity), quantity);
        listing.apply_sell(actor, quantity, total);

        debug!(item, actor, quantity, %total, "committed sell");
        Ok(total)
    }

    /// Total units currently listed across the whole market
    pub fn total_quantity(&self) -> i64 {
        self.listings
            .iter()
            .map(Listing::quantity_on_market)
            .sum()
    }

    /// Mean unit buy price across listings, 2 decimal places
    pub fn mean_buy_price(&self) -> Option<Decimal> {
        self.mean_price(pricing::unit_buy_price)
    }

    /// Mean unit sell price across listings, 2 decimal places
    pub fn mean_sell_price(&self) -> Option<Decimal> {
        self.mean_price(pricing::unit_sell_price)
    }

    fn mean_price(&self, unit_price: fn(&Listing) -> Decimal) -> Option<Decimal> {
        if self.listings.is_empty() {
            return None;
        }

        let sum: Decimal = self.listings.iter().map(unit_price).sum();
        Some(pricing::round_money(sum / Decimal::from(self.listings.len())))
    }
}

impl Default for Market {
    fn default() -> Self {
        Self::new()
    }
}
