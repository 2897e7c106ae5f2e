//! Textual command surface
//!
//! Entry point for the host's command dispatcher. Each command resolves to
//! a trade intent and either commits directly (the legacy one-shot
//! commands) or opens the interactive workflow:
//!
//! - `buy <item> [quantity]` — one-shot buy, quantity defaults to 1
//! - `sell [quantity]` — one-shot sell of the item held in hand; without a
//!   quantity the whole held amount is sold
//! - `sell-custom <quantity>` — one-shot sell of a chosen quantity of the
//!   hand item
//! - `browse <item>` — open the buy workflow on the item-detail screen
//!
//! All errors are recoverable and meant to be rendered to the actor.

use crate::core::accounts::AccountRegistry;
use crate::core::market::Market;
use crate::core::traits::Holdings;
use crate::core::workflow::{execute_buy, execute_sell, TradeReceipt, TradeSession};
use crate::types::{ActorId, MarketError};

/// The result of a dispatched command
#[derive(Debug)]
pub enum CommandOutcome {
    /// A one-shot buy committed
    Bought(TradeReceipt),
    /// A one-shot sell committed
    Sold(TradeReceipt),
    /// The interactive workflow was opened
    SessionOpened(TradeSession),
}

/// Dispatch one command line for an actor
///
/// `hand_item` is the identifier of whatever the actor currently holds in
/// hand; the sell commands trade that item.
///
/// # Errors
///
/// Every error of the trade taxonomy, all recoverable: the caller surfaces
/// the message and carries on.
pub fn dispatch(
    market: &mut Market,
    accounts: &mut AccountRegistry,
    holdings: &mut dyn Holdings,
    actor: ActorId,
    hand_item: Option<&str>,
    input: &str,
) -> Result<CommandOutcome, MarketError> {
    let mut tokens = input.split_whitespace();
    let command = tokens.next().unwrap_or_default();
    let arguments: Vec<&str> = tokens.collect();

    match command {
        "buy" => {
            let item = arguments
                .first()
                .ok_or_else(|| MarketError::unknown_item("", None))?;
            let quantity = match arguments.get(1) {
                Some(raw) => parse_quantity(raw)?,
                None => 1,
            };

            let item = resolve_sellable(market, item)?;
            let receipt = execute_buy(market, accounts, holdings, actor, &item, quantity)?;
            Ok(CommandOutcome::Bought(receipt))
        }

        "sell" => {
            let item = hand_item.ok_or(MarketError::EmptyHand { actor })?.to_string();
            if !market.can_sell(&item) {
                return Err(MarketError::item_not_sellable(&item));
            }

            let quantity = match arguments.first() {
                Some(raw) => parse_quantity(raw)?,
                None => holdings.held_quantity(actor, &item),
            };
            if quantity == 0 {
                return Err(MarketError::insufficient_holdings(&item, 0, 1));
            }

            let receipt = execute_sell(market, accounts, holdings, actor, &item, quantity)?;
            Ok(CommandOutcome::Sold(receipt))
        }

        "sell-custom" => {
            let raw = arguments
                .first()
                .ok_or_else(|| MarketError::invalid_amount(""))?;
            let quantity = parse_quantity(raw)?;

            let item = hand_item.ok_or(MarketError::EmptyHand { actor })?.to_string();
            if !market.can_sell(&item) {
                return Err(MarketError::item_not_sellable(&item));
            }

            let receipt = execute_sell(market, accounts, holdings, actor, &item, quantity)?;
            Ok(CommandOutcome::Sold(receipt))
        }

        "browse" => {
            let item = arguments
                .first()
                .ok_or_else(|| MarketError::unknown_item("", None))?;
            let item = resolve_sellable(market, item)?;
            let session = TradeSession::open_buy(market, actor, &item)?;
            Ok(CommandOutcome::SessionOpened(session))
        }

        other => Err(MarketError::UnknownCommand {
            command: other.to_string(),
        }),
    }
}

/// Resolve an identifier against the catalog and the sellability policy
fn resolve_sellable(market: &Market, item: &str) -> Result<String, MarketError> {
    let listing = market.resolve(item)?;
    if !market.can_sell(listing.item_id()) {
        return Err(MarketError::item_not_sellable(listing.item_id()));
    }
    Ok(listing.item_id().to_string())
}

/// Parse a strictly positive quantity
fn parse_quantity(raw: &str) -> Result<u64, MarketError> {
    match raw.parse::<u64>() {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(MarketError::invalid_amount(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::holdings::MemoryHoldings;
    use crate::types::{starting_balance, TradeKind};
    use rstest::rstest;

    fn fixture() -> (Market, AccountRegistry, MemoryHoldings) {
        let mut market = Market::new();
        market.initialize_catalog(["stone", "dirt", "bread"], 200);
        (market, AccountRegistry::new(), MemoryHoldings::new())
    }

    #[test]
    fn test_buy_defaults_to_one_unit() {
        let (mut market, mut accounts, mut holdings) = fixture();

        let outcome =
            dispatch(&mut market, &mut accounts, &mut holdings, 1, None, "buy stone").unwrap();

        let CommandOutcome::Bought(receipt) = outcome else {
            panic!("expected a buy");
        };
        assert_eq!(receipt.quantity, 1);
        assert_eq!(receipt.kind, TradeKind::BuyOne);
        assert_eq!(holdings.held_quantity(1, "stone"), 1);
        assert_eq!(
            market.get_listing("stone").unwrap().quantity_on_market(),
            199
        );
    }

    #[test]
    fn test_buy_with_quantity() {
        let (mut market, mut accounts, mut holdings) = fixture();

        let outcome =
            dispatch(&mut market, &mut accounts, &mut holdings, 1, None, "buy stone 5").unwrap();

        let CommandOutcome::Bought(receipt) = outcome else {
            panic!("expected a buy");
        };
        assert_eq!(receipt.quantity, 5);
        assert!(accounts.balance(1) < starting_balance());
    }

    #[test]
    fn test_buy_misspelled_item_suggests_nearest() {
        let (mut market, mut accounts, mut holdings) = fixture();

        let error =
            dispatch(&mut market, &mut accounts, &mut holdings, 1, None, "buy stonn").unwrap_err();

        assert_eq!(
            error,
            MarketError::unknown_item("stonn", Some("stone".to_string()))
        );
    }

    #[rstest]
    #[case::non_numeric("buy stone abc")]
    #[case::zero("buy stone 0")]
    #[case::negative("buy stone -3")]
    fn test_invalid_quantities_are_rejected(#[case] input: &str) {
        let (mut market, mut accounts, mut holdings) = fixture();

        let error =
            dispatch(&mut market, &mut accounts, &mut holdings, 1, None, input).unwrap_err();

        assert!(matches!(error, MarketError::InvalidAmount { .. }));
    }

    #[test]
    fn test_sell_without_quantity_sells_everything_held() {
        let (mut market, mut accounts, mut holdings) = fixture();
        holdings.grant(1, "stone", 12);

        let outcome = dispatch(
            &mut market,
            &mut accounts,
            &mut holdings,
            1,
            Some("stone"),
            "sell",
        )
        .unwrap();

        let CommandOutcome::Sold(receipt) = outcome else {
            panic!("expected a sell");
        };
        assert_eq!(receipt.quantity, 12);
        assert_eq!(holdings.held_quantity(1, "stone"), 0);
    }

    #[test]
    fn test_sell_with_empty_hand_is_rejected() {
        let (mut market, mut accounts, mut holdings) = fixture();

        let error =
            dispatch(&mut market, &mut accounts, &mut holdings, 1, None, "sell").unwrap_err();

        assert!(matches!(error, MarketError::EmptyHand { .. }));
    }

    #[test]
    fn test_sell_custom_rejects_more_than_held() {
        let (mut market, mut accounts, mut holdings) = fixture();
        holdings.grant(1, "stone", 3);

        let error = dispatch(
            &mut market,
            &mut accounts,
            &mut holdings,
            1,
            Some("stone"),
            "sell-custom 10",
        )
        .unwrap_err();

        assert!(matches!(
            error,
            MarketError::InsufficientHoldings {
                held: 3,
                requested: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_sell_of_unsellable_hand_item_is_rejected() {
        let (mut market, mut accounts, mut holdings) = fixture();
        holdings.grant(1, "diamond_sword", 1);

        let error = dispatch(
            &mut market,
            &mut accounts,
            &mut holdings,
            1,
            Some("diamond_sword"),
            "sell",
        )
        .unwrap_err();

        assert!(matches!(error, MarketError::ItemNotSellable { .. }));
    }

    #[test]
    fn test_browse_opens_a_session() {
        let (mut market, mut accounts, mut holdings) = fixture();

        let outcome = dispatch(
            &mut market,
            &mut accounts,
            &mut holdings,
            1,
            None,
            "browse bread",
        )
        .unwrap();

        let CommandOutcome::SessionOpened(session) = outcome else {
            panic!("expected a session");
        };
        assert_eq!(session.item_id(), "bread");
        // Opening the workflow commits nothing
        assert_eq!(
            market.get_listing("bread").unwrap().quantity_on_market(),
            200
        );
    }

    #[test]
    fn test_unknown_command() {
        let (mut market, mut accounts, mut holdings) = fixture();

        let error =
            dispatch(&mut market, &mut accounts, &mut holdings, 1, None, "fly").unwrap_err();

        assert!(matches!(error, MarketError::UnknownCommand { .. }));
    }
}
