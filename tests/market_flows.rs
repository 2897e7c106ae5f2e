//! End-to-end integration tests
//!
//! These tests exercise the full economic core through its public surface:
//! catalog initialization, the command surface, the interactive workflow
//! driven over the UI event queue, and persistence across a simulated
//! process restart.

use marketplace_engine::commands::{dispatch, CommandOutcome};
use marketplace_engine::core::{
    drive_session, AccountRegistry, Holdings, Market, MemoryHoldings, QuantityPreset,
    SessionUpdate, TradeSession, UiEvent,
};
use marketplace_engine::io::StateStore;
use marketplace_engine::types::{starting_balance, MarketError, TradeKind};
use marketplace_engine::{catalog, pricing};
use rust_decimal::Decimal;
use tempfile::tempdir;
use tokio::sync::mpsc;

fn fresh_economy() -> (Market, AccountRegistry, MemoryHoldings) {
    let mut market = Market::new();
    market.initialize_catalog(catalog::default_universe().iter().copied(), 200);
    (market, AccountRegistry::new(), MemoryHoldings::new())
}

#[test]
fn one_shot_buy_and_sell_round_trip() {
    let (mut market, mut accounts, mut holdings) = fresh_economy();

    // coal: base price 30, quantity 200 -> sells at 10.00, buys at 12.50
    let listing = market.get_listing("coal").unwrap();
    assert_eq!(pricing::unit_sell_price(listing), Decimal::new(1000, 2));
    assert_eq!(pricing::unit_buy_price(listing), Decimal::new(1250, 2));

    let outcome = dispatch(&mut market, &mut accounts, &mut holdings, 1, None, "buy coal")
        .expect("buy should commit");
    let CommandOutcome::Bought(receipt) = outcome else {
        panic!("expected a buy receipt");
    };
    assert_eq!(receipt.total_price, Decimal::new(1250, 2));
    assert_eq!(market.get_listing("coal").unwrap().quantity_on_market(), 199);

    let outcome = dispatch(
        &mut market,
        &mut accounts,
        &mut holdings,
        1,
        Some("coal"),
        "sell 1",
    )
    .expect("sell should commit");
    let CommandOutcome::Sold(receipt) = outcome else {
        panic!("expected a sell receipt");
    };
    // Selling at quantity 199: 30 / (1 + 199/100) = 10.03
    assert_eq!(receipt.total_price, Decimal::new(1003, 2));

    // Quantities are symmetric even though the prices are not
    assert_eq!(market.get_listing("coal").unwrap().quantity_on_market(), 200);
    assert_eq!(
        accounts.balance(1),
        starting_balance() - Decimal::new(1250, 2) + Decimal::new(1003, 2)
    );
    assert_eq!(holdings.held_quantity(1, "coal"), 0);
}

#[test]
fn buy_rejections_leave_the_economy_untouched() {
    let (mut market, mut accounts, mut holdings) = fresh_economy();
    let balance = accounts.balance(1);
    accounts.debit(1, balance).unwrap();

    let error = dispatch(
        &mut market,
        &mut accounts,
        &mut holdings,
        1,
        None,
        "buy diamond 3",
    )
    .unwrap_err();

    assert!(matches!(error, MarketError::InsufficientFunds { .. }));
    assert_eq!(accounts.balance(1), Decimal::ZERO);
    assert_eq!(
        market.get_listing("diamond").unwrap().quantity_on_market(),
        200
    );
    assert_eq!(market.get_listing("diamond").unwrap().history_len(), 0);
    assert_eq!(holdings.held_quantity(1, "diamond"), 0);
}

#[test]
fn deny_listed_items_never_trade() {
    let (mut market, mut accounts, mut holdings) = fresh_economy();

    let error = dispatch(
        &mut market,
        &mut accounts,
        &mut holdings,
        1,
        None,
        "buy iron_pickaxe",
    )
    .unwrap_err();

    // Not listed at all, so it resolves to the nearest listed identifier
    assert!(matches!(error, MarketError::UnknownItem { .. }));
}

#[test]
fn misspelled_identifier_gets_a_suggestion() {
    let (mut market, mut accounts, mut holdings) = fresh_economy();

    let error = dispatch(
        &mut market,
        &mut accounts,
        &mut holdings,
        1,
        None,
        "buy golden_aple 2",
    )
    .unwrap_err();

    assert_eq!(
        error,
        MarketError::unknown_item("golden_aple", Some("golden_apple".to_string()))
    );
}

#[tokio::test]
async fn workflow_session_commits_through_the_event_queue() {
    let (mut market, mut accounts, mut holdings) = fresh_economy();
    let session = TradeSession::open_buy(&market, 7, "stone").unwrap();

    let (event_tx, event_rx) = mpsc::channel(16);
    let (update_tx, mut update_rx) = mpsc::channel(64);

    for event in [
        UiEvent::Confirm,
        UiEvent::Preset(QuantityPreset::Bulk),
        UiEvent::CustomAmount("not a number".to_string()),
        UiEvent::CustomAmount("3".to_string()),
        UiEvent::Confirm,
        UiEvent::Confirm,
    ] {
        event_tx.send(event).await.unwrap();
    }
    drop(event_tx);

    let receipt = drive_session(
        session,
        &mut market,
        &mut accounts,
        &mut holdings,
        event_rx,
        update_tx,
    )
    .await
    .expect("the session should commit");

    assert_eq!(receipt.kind, TradeKind::BuyMany);
    assert_eq!(receipt.quantity, 3);
    assert_eq!(market.get_listing("stone").unwrap().quantity_on_market(), 197);
    assert_eq!(holdings.held_quantity(7, "stone"), 3);

    let mut saw_invalid_notice = false;
    while let Ok(update) = update_rx.try_recv() {
        if let SessionUpdate::Notice(notice) = &update {
            saw_invalid_notice |= notice.contains("Invalid amount");
        }
    }
    assert!(saw_invalid_notice, "the bad custom amount should be noticed");
}

#[test]
fn economy_survives_a_process_restart() {
    let dir = tempdir().unwrap();
    let store = StateStore::new(dir.path());

    // First process lifetime: trade and save
    {
        let (mut market, mut accounts, mut holdings) = fresh_economy();
        dispatch(&mut market, &mut accounts, &mut holdings, 1, None, "buy coal 4")
            .expect("buy should commit");
        store.save(&market, &accounts).expect("save should succeed");
    }

    // Second process lifetime: load and continue
    let (mut market, mut accounts) = store.load().expect("load should succeed");
    let mut holdings = MemoryHoldings::new();

    let coal = market.get_listing("coal").unwrap();
    assert_eq!(coal.quantity_on_market(), 196);
    assert_eq!(coal.history_len(), 1);
    assert!(accounts.balance(1) < starting_balance());

    // The reloaded listing prices exactly like the original would have
    let expected = pricing::unit_buy_price(coal);
    let outcome = dispatch(&mut market, &mut accounts, &mut holdings, 1, None, "buy coal")
        .expect("buy should commit");
    let CommandOutcome::Bought(receipt) = outcome else {
        panic!("expected a buy receipt");
    };
    assert_eq!(receipt.total_price, expected);
    assert_eq!(market.get_listing("coal").unwrap().quantity_on_market(), 195);
}

#[test]
fn delivery_overflow_is_stashed_not_lost() {
    let mut market = Market::new();
    market.initialize_catalog(["stone"], 200);
    let mut accounts = AccountRegistry::new();
    let mut holdings = MemoryHoldings::with_capacity(2);

    let outcome = dispatch(
        &mut market,
        &mut accounts,
        &mut holdings,
        1,
        None,
        "buy stone 6",
    )
    .expect("buy should commit");

    let CommandOutcome::Bought(receipt) = outcome else {
        panic!("expected a buy receipt");
    };
    assert_eq!(receipt.quantity, 6);
    assert_eq!(receipt.stashed, 4);
    assert_eq!(holdings.held_quantity(1, "stone"), 2);
    assert_eq!(accounts.get(1).unwrap().stash[0].quantity, 4);

    // Units come back out of the stash one at a time
    accounts.unstash(1, "stone").unwrap();
    assert_eq!(accounts.get(1).unwrap().stash[0].quantity, 3);
}
