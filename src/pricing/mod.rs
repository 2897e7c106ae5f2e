//! Pricing engine
//!
//! Pure, deterministic price computation for catalog listings. No I/O, no
//! mutation: quoting a price for any quantity leaves the listing untouched.
//!
//! # Price model
//!
//! The sell price responds to market depth through the elasticity
//! denominator `1 + quantity/100`: the more units of an item already on the
//! market, the less a further unit sells for. The buy price carries a fixed
//! 25% margin over the current sell price and is recomputed on every call,
//! never cached.
//!
//! # Path dependence
//!
//! A cumulative price for `n` units is **not** `n * unit_price`. Each unit
//! of a multi-unit trade moves the market the next unit is priced against,
//! so the cumulative price simulates `n` sequential single-unit trades
//! against a working copy of the listed quantity and sums the per-step unit
//! prices.
//!
//! # Rounding
//!
//! Half-up to 2 decimal places: after each unit computation for unit
//! prices, after summation for cumulative quotes. Replicating this order is
//! what makes independently computed quotes agree to the cent.

use crate::types::{Listing, TradeKind};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a currency value half-up to 2 decimal places
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Unit sell price for a base price at a hypothetical market quantity
fn unit_sell_at(base_price: Decimal, quantity_on_market: i64) -> Decimal {
    // base / (1 + q/100), computed as base * 100 / (100 + q).
    // The denominator floors at 1: buy simulations past available stock are
    // clamped upstream, and the quote must stay total regardless.
    let denominator = Decimal::from((100 + quantity_on_market).max(1));
    round_money(base_price * Decimal::ONE_HUNDRED / denominator)
}

/// Unit buy price: sell price plus the fixed 25% margin
fn unit_buy_at(base_price: Decimal, quantity_on_market: i64) -> Decimal {
    let margin = Decimal::new(125, 2);
    round_money(unit_sell_at(base_price, quantity_on_market) * margin)
}

/// Price one unit currently sells for on this listing
pub fn unit_sell_price(listing: &Listing) -> Decimal {
    unit_sell_at(listing.base_price(), listing.quantity_on_market())
}

/// Price one unit currently costs to buy from this listing
pub fn unit_buy_price(listing: &Listing) -> Decimal {
    unit_buy_at(listing.base_price(), listing.quantity_on_market())
}

/// Cumulative price for `quantity` sequential single-unit trades
///
/// Simulates the trades against a working copy of the listed quantity
/// (buys decrement it step by step, sells increment it), sums each step's
/// unit price, and rounds the sum. The listing itself is never mutated.
pub fn cumulative_price(listing: &Listing, kind: TradeKind, quantity: u64) -> Decimal {
    let base = listing.base_price();
    let mut working = listing.quantity_on_market();
    let mut total = Decimal::ZERO;

    for _ in 0..quantity {
        if kind.is_buy() {
            total += unit_buy_at(base, working);
            working -= 1;
        } else {
            total += unit_sell_at(base, working);
            working += 1;
        }
    }

    round_money(total)
}
