//! Transaction workflow
//!
//! The quote -> confirm -> execute/cancel state machine an actor navigates
//! to trade against the market, plus the one-shot execute helpers shared
//! with the legacy commands.
//!
//! Screens form the flow `Browsing -> ItemDetail -> AmountSelect ->
//! Confirm -> {Committed | Cancelled} -> ItemDetail`. Every quantity change
//! re-quotes through the pricing engine without touching a ledger; ledgers
//! are mutated exactly once, inside [`TradeSession::execute`]. Each screen
//! records a single return screen, so cancel always steps back to the
//! immediately preceding logical screen.

use crate::core::accounts::AccountRegistry;
use crate::core::market::Market;
use crate::core::traits::Holdings;
use crate::pricing;
use crate::types::{ActorId, ItemBatch, ItemId, MarketError, TradeIntent, TradeKind};
use rust_decimal::Decimal;

/// Units selected by the fixed bulk preset
pub const BULK_QUANTITY: u64 = 64;

/// The screens of the transaction workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Outside the session; catalog browsing is the host's concern
    Browsing,
    /// Item overview with buy/sell entry points
    ItemDetail,
    /// Quantity selection with live re-quoting
    AmountSelect,
    /// Final intent display with a single execute action
    Confirm,
    /// Terminal: the trade committed
    Committed,
    /// Terminal: the session was cancelled
    Cancelled,
}

/// Quantity presets offered on the amount-select screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityPreset {
    /// A single unit
    One,
    /// The fixed bulk size ([`BULK_QUANTITY`])
    Bulk,
    /// Everything available: market stock for buys, held units for sells
    All,
    /// A custom value from the free-text input collaborator
    Custom(u64),
}

/// A render request emitted toward the display boundary
///
/// Describes everything the host needs to draw the current screen; how it
/// is drawn is out of scope.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// The screen to draw
    pub screen: Screen,
    /// The item the session is about
    pub item_id: ItemId,
    /// The current intent (quantity + quoted total)
    pub intent: TradeIntent,
    /// Current per-unit price for the intent's side
    pub unit_price: Decimal,
    /// Upper bound the quantity is clamped to
    pub max_quantity: u64,
}

/// Receipt for a committed trade
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    /// The traded item
    pub item_id: ItemId,
    /// Kind of the committed trade
    pub kind: TradeKind,
    /// Units moved
    pub quantity: u64,
    /// Total paid or received
    pub total_price: Decimal,
    /// Units routed to the overflow stash because storage was full
    pub stashed: u64,
}

/// One actor's in-progress trade session
///
/// The session holds the intent by value; revising the quantity replaces
/// the intent rather than mutating a shared object, so concurrent sessions
/// never alias.
#[derive(Debug)]
pub struct TradeSession {
    item_id: ItemId,
    actor: ActorId,
    intent: TradeIntent,
    screen: Screen,
    return_screen: Screen,
    consumed: bool,
}

impl TradeSession {
    /// Open a buy session on the item-detail screen
    ///
    /// # Errors
    ///
    /// `UnknownItem` (with a fuzzy suggestion) when the identifier does not
    /// resolve, `ItemNotSellable` when it is deny-listed or unclassified.
    pub fn open_buy(market: &Market, actor: ActorId, item: &str) -> Result<Self, MarketError> {
        let listing = market.resolve(item)?;
        if !market.can_sell(item) {
            return Err(MarketError::item_not_sellable(item));
        }

        let quote = pricing::cumulative_price(listing, TradeKind::BuyOne, 1);
        Ok(TradeSession {
            item_id: listing.item_id().to_string(),
            actor,
            intent: TradeIntent::buy(actor, 1, quote),
            screen: Screen::ItemDetail,
            return_screen: Screen::Browsing,
            consumed: false,
        })
    }

    /// Open a sell session on the item-detail screen
    ///
    /// # Errors
    ///
    /// In addition to the buy-side errors, `InsufficientHoldings` when the
    /// actor holds none of the item.
    pub fn open_sell(
        market: &Market,
        holdings: &dyn Holdings,
        actor: ActorId,
        item: &str,
    ) -> Result<Self, MarketError> {
        let listing = market.resolve(item)?;
        if !market.can_sell(item) {
            return Err(MarketError::item_not_sellable(item));
        }
        if holdings.held_quantity(actor, listing.item_id()) == 0 {
            return Err(MarketError::insufficient_holdings(item, 0, 1));
        }

        let quote = pricing::cumulative_price(listing, TradeKind::SellOne, 1);
        Ok(TradeSession {
            item_id: listing.item_id().to_string(),
            actor,
            intent: TradeIntent::sell(actor, 1, quote),
            screen: Screen::ItemDetail,
            return_screen: Screen::Browsing,
            consumed: false,
        })
    }

    /// The screen the session currently shows
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The current intent value
    pub fn intent(&self) -> &TradeIntent {
        &self.intent
    }

    /// The item the session is about
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Upper quantity bound: market stock for buys, held units for sells
    fn max_quantity(&self, market: &Market, holdings: &dyn Holdings) -> u64 {
        if self.intent.is_buy() {
            market
                .get_listing(&self.item_id)
                .map(|listing| listing.quantity_on_market().max(0) as u64)
                .unwrap_or(0)
        } else {
            holdings.held_quantity(self.actor, &self.item_id)
        }
    }

    /// Build the render request for the current screen
    pub fn render(&self, market: &Market, holdings: &dyn Holdings) -> RenderRequest {
        let unit_price = market
            .get_listing(&self.item_id)
            .map(|listing| {
                if self.intent.is_buy() {
                    pricing::unit_buy_price(listing)
                } else {
                    pricing::unit_sell_price(listing)
                }
            })
            .unwrap_or(Decimal::ZERO);

        RenderRequest {
            screen: self.screen,
            item_id: self.item_id.clone(),
            intent: self.intent.clone(),
            unit_price,
            max_quantity: self.max_quantity(market, holdings),
        }
    }

    /// Move from the item-detail screen to amount selection
    pub fn choose_amount(
        &mut self,
        market: &Market,
        holdings: &dyn Holdings,
    ) -> RenderRequest {
        self.screen = Screen::AmountSelect;
        self.return_screen = Screen::ItemDetail;
        self.requote(market, self.intent.quantity, holdings)
    }

    /// Apply a quantity preset and re-quote
    ///
    /// Quantities above the current maximum are clamped before quoting, so
    /// an over-quantity intent can never reach the confirm screen.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for a zero custom quantity. No ledger is touched on
    /// any path.
    pub fn select_preset(
        &mut self,
        market: &Market,
        holdings: &dyn Holdings,
        preset: QuantityPreset,
    ) -> Result<RenderRequest, MarketError> {
        let requested = match preset {
            QuantityPreset::One => 1,
            QuantityPreset::Bulk => BULK_QUANTITY,
            QuantityPreset::All => self.max_quantity(market, holdings),
            QuantityPreset::Custom(0) => {
                return Err(MarketError::invalid_amount("0"));
            }
            QuantityPreset::Custom(n) => n,
        };

        Ok(self.requote(market, requested, holdings))
    }

    /// Clamp `requested` to the current maximum and replace the intent
    fn requote(
        &mut self,
        market: &Market,
        requested: u64,
        holdings: &dyn Holdings,
    ) -> RenderRequest {
        let quantity = requested.min(self.max_quantity(market, holdings)).max(1);
        let quote = market
            .get_listing(&self.item_id)
            .map(|listing| {
                let kind = if self.intent.is_buy() {
                    TradeKind::for_buy(quantity)
                } else {
                    TradeKind::for_sell(quantity)
                };
                pricing::cumulative_price(listing, kind, quantity)
            })
            .unwrap_or(Decimal::ZERO);

        self.intent = self.intent.with_quantity(quantity, quote);
        self.render(market, holdings)
    }

    /// Move from amount selection to the confirm screen
    ///
    /// Re-clamps and re-quotes one final time; the intent shown on the
    /// confirm screen is always within the available maximum.
    ///
    /// # Errors
    ///
    /// `InsufficientStock` / `InsufficientHoldings` when nothing at all is
    /// available for the intent's side.
    pub fn confirm(
        &mut self,
        market: &Market,
        holdings: &dyn Holdings,
    ) -> Result<RenderRequest, MarketError> {
        let max = self.max_quantity(market, holdings);
        if max == 0 {
            return Err(if self.intent.is_buy() {
                MarketError::insufficient_stock(&self.item_id, 0, self.intent.quantity)
            } else {
                MarketError::insufficient_holdings(&self.item_id, 0, self.intent.quantity)
            });
        }

        self.requote(market, self.intent.quantity, holdings);
        self.screen = Screen::Confirm;
        self.return_screen = Screen::AmountSelect;
        Ok(self.render(market, holdings))
    }

    /// Cancel the current screen, stepping back to its return screen
    ///
    /// No ledger is mutated on any cancel path; cancelling the item-detail
    /// screen ends the session.
    pub fn cancel(&mut self) -> Screen {
        match self.screen {
            Screen::Confirm => {
                self.screen = Screen::AmountSelect;
                self.return_screen = Screen::ItemDetail;
            }
            Screen::AmountSelect => {
                self.screen = Screen::ItemDetail;
                self.return_screen = Screen::Browsing;
            }
            _ => {
                self.screen = Screen::Cancelled;
            }
        }
        self.screen
    }

    /// Execute the confirmed intent, committing it to both ledgers
    ///
    /// Consuming the intent makes a duplicated execute (a double click on
    /// the confirm button) a recoverable error with no ledger effect.
    ///
    /// # Errors
    ///
    /// `IntentNotConfirmed` outside the confirm screen, `IntentConsumed` on
    /// replay, plus the commit errors of the one-shot helpers.
    pub fn execute(
        &mut self,
        market: &mut Market,
        accounts: &mut AccountRegistry,
        holdings: &mut dyn Holdings,
    ) -> Result<TradeReceipt, MarketError> {
        if self.consumed {
            return Err(MarketError::IntentConsumed { actor: self.actor });
        }
        if self.screen != Screen::Confirm {
            return Err(MarketError::IntentNotConfirmed { actor: self.actor });
        }

        let receipt = if self.intent.is_buy() {
            execute_buy(
                market,
                accounts,
                holdings,
                self.actor,
                &self.item_id,
                self.intent.quantity,
            )?
        } else {
            execute_sell(
                market,
                accounts,
                holdings,
                self.actor,
                &self.item_id,
                self.intent.quantity,
            )?
        };

        self.consumed = true;
        self.screen = Screen::Committed;
        self.return_screen = Screen::ItemDetail;
        Ok(receipt)
    }

    /// Leave a terminal screen, returning to the item detail
    pub fn acknowledge(&mut self) -> Screen {
        if matches!(self.screen, Screen::Committed | Screen::Cancelled) {
            self.screen = Screen::ItemDetail;
            self.return_screen = Screen::Browsing;
        }
        self.screen
    }
}

/// One-shot buy commit: debit, deliver, record
///
/// Performs, in order: funds-guarded debit of the cumulative price (abort
/// with no effect on failure), delivery into the actor's storage with the
/// undeliverable remainder stashed, then the market-side commit.
pub fn execute_buy(
    market: &mut Market,
    accounts: &mut AccountRegistry,
    holdings: &mut dyn Holdings,
    actor: ActorId,
    item: &str,
    quantity: u64,
) -> Result<TradeReceipt, MarketError> {
    let listing = market
        .get_listing(item)
        .ok_or_else(|| MarketError::unknown_item(item, None))?;

    let available = listing.quantity_on_market();
    if available < 0 || quantity > available as u64 {
        return Err(MarketError::insufficient_stock(item, available, quantity));
    }

    let total = pricing::cumulative_price(listing, TradeKind::for_buy(quantity), quantity);
    accounts.secure_debit(actor, total)?;

    let delivered = holdings.deliver(actor, item, quantity);
    let stashed = quantity - delivered;
    if stashed > 0 {
        accounts.stash(
            actor,
            ItemBatch {
                item_id: item.to_string(),
                quantity: stashed,
            },
        );
    }

    let committed = market.commit_buy(item, actor, quantity)?;

    Ok(TradeReceipt {
        item_id: item.to_string(),
        kind: TradeKind::for_buy(quantity),
        quantity,
        total_price: committed,
        stashed,
    })
}

/// One-shot sell commit: verify, remove, record, credit
pub fn execute_sell(
    market: &mut Market,
    accounts: &mut AccountRegistry,
    holdings: &mut dyn Holdings,
    actor: ActorId,
    item: &str,
    quantity: u64,
) -> Result<TradeReceipt, MarketError> {
    let listing = market
        .get_listing(item)
        .ok_or_else(|| MarketError::unknown_item(item, None))?;

    // Validate the market-side growth before touching the actor's storage
    if i64::try_from(quantity)
        .ok()
        .and_then(|q| listing.quantity_on_market().checked_add(q))
        .is_none()
    {
        return Err(MarketError::quantity_overflow(item, quantity));
    }

    let held = holdings.held_quantity(actor, item);
    if held < quantity {
        return Err(MarketError::insufficient_holdings(item, held, quantity));
    }

    holdings.remove(actor, item, quantity);
    let total = market.commit_sell(item, actor, quantity)?;
    accounts.credit(actor, total)?;

    Ok(TradeReceipt {
        item_id: item.to_string(),
        kind: TradeKind::for_sell(quantity),
        quantity,
        total_price: total,
        stashed: 0,
    })
}
