//! Trade intent flowing through the transaction workflow
//!
//! An intent is the in-progress, user-editable description of a trade. It
//! has value semantics on purpose: every quantity revision produces a new
//! intent value instead of mutating a shared one, so concurrent sessions
//! can never alias each other's in-flight trades.

use super::account::ActorId;
use super::listing::TradeKind;
use rust_decimal::Decimal;

/// The in-progress description of a trade the workflow is building toward
/// commit
///
/// `quoted_price` is always the cumulative price for `quantity` units at the
/// moment the intent was (re-)quoted; screen transitions replace both fields
/// together rather than accumulating.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeIntent {
    /// Kind of trade being prepared (buy/sell, single/multi)
    pub kind: TradeKind,

    /// Number of units the actor currently has selected
    pub quantity: u64,

    /// The actor preparing the trade
    pub actor: ActorId,

    /// Cumulative price quoted for `quantity` units
    pub quoted_price: Decimal,
}

impl TradeIntent {
    /// Create a buy intent
    pub fn buy(actor: ActorId, quantity: u64, quoted_price: Decimal) -> Self {
        TradeIntent {
            kind: TradeKind::for_buy(quantity),
            quantity,
            actor,
            quoted_price,
        }
    }

    /// Create a sell intent
    pub fn sell(actor: ActorId, quantity: u64, quoted_price: Decimal) -> Self {
        TradeIntent {
            kind: TradeKind::for_sell(quantity),
            quantity,
            actor,
            quoted_price,
        }
    }

    /// Whether this intent takes units off the market
    pub fn is_buy(&self) -> bool {
        self.kind.is_buy()
    }

    /// A new intent value with a revised quantity and fresh quote
    ///
    /// The single/multi flavor of the kind is recomputed from the new
    /// quantity; the side (buy/sell) is preserved.
    pub fn with_quantity(&self, quantity: u64, quoted_price: Decimal) -> Self {
        let kind = if self.is_buy() {
            TradeKind::for_buy(quantity)
        } else {
            TradeKind::for_sell(quantity)
        };

        TradeIntent {
            kind,
            quantity,
            actor: self.actor,
            quoted_price,
        }
    }
}
