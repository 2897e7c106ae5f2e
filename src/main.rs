//! Marketplace engine REPL
//!
//! Interactive command-line front end over the marketplace engine. Reads
//! commands from stdin, issues them as one actor, and prints outcomes.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --state-dir ./market-state
//! ```
//!
//! Commands:
//!
//! - `buy <item> [quantity]` — one-shot buy from the market
//! - `sell [quantity]` / `sell-custom <quantity>` — sell the hand item
//! - `browse <item>` — walk the quote/confirm workflow interactively
//! - `hand <item>` — pick which held item the sell commands refer to
//! - `claim <item>` — recover one stashed unit into storage
//! - `balance`, `stash`, `stats` — inspect the economy
//! - `quit` — save (when a state directory is set) and exit
//!
//! With a state directory, the economy is loaded on startup and saved on
//! quit; without one it lives for the process lifetime only.

use marketplace_engine::catalog;
use marketplace_engine::cli;
use marketplace_engine::commands::{dispatch, CommandOutcome};
use marketplace_engine::core::{
    AccountRegistry, Holdings, Market, MemoryHoldings, QuantityPreset, Screen, TradeSession,
};
use marketplace_engine::io::StateStore;
use marketplace_engine::types::ItemBatch;
use std::io::{BufRead, Write};
use std::process;
use tracing::warn;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    let store = args.state_dir.as_ref().map(StateStore::new);

    let (mut market, mut accounts) = match &store {
        Some(store) if store.has_state() => match store.load() {
            Ok(state) => state,
            Err(e) => {
                eprintln!("Error: failed to load state: {}", e);
                process::exit(1);
            }
        },
        _ => {
            let mut market = Market::new();
            market.initialize_catalog(
                catalog::default_universe().iter().copied(),
                args.starting_quantity,
            );
            (market, AccountRegistry::new())
        }
    };

    let mut holdings = MemoryHoldings::new();
    let actor = args.actor;
    let mut hand: Option<String> = None;

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    let _ = std::io::stdout().flush();

    while let Some(line) = lines.next() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        };
        let input = line.trim();

        match input.split_whitespace().next() {
            None => {}
            Some("quit") | Some("exit") => break,
            Some("hand") => {
                hand = input.split_whitespace().nth(1).map(str::to_string);
                match &hand {
                    Some(item) => println!("Holding '{}'", item),
                    None => println!("Hand is empty"),
                }
            }
            Some("balance") => {
                println!("Balance: {}$", accounts.balance(actor));
            }
            Some("claim") => match input.split_whitespace().nth(1) {
                None => println!("Usage: claim <item>"),
                Some(item) => match accounts.unstash(actor, item) {
                    Ok(()) => {
                        if holdings.deliver(actor, item, 1) == 1 {
                            println!("Recovered one '{}' from the stash", item);
                        } else {
                            // Still no space; put the unit back
                            accounts.stash(
                                actor,
                                ItemBatch {
                                    item_id: item.to_string(),
                                    quantity: 1,
                                },
                            );
                            println!("No storage space for '{}'", item);
                        }
                    }
                    Err(e) => println!("{}", e),
                },
            },
            Some("stash") => match accounts.get(actor) {
                Some(account) if !account.stash.is_empty() => {
                    for batch in &account.stash {
                        println!("{} x{}", batch.item_id, batch.quantity);
                    }
                }
                _ => println!("Stash is empty"),
            },
            Some("stats") => {
                println!("Listings: {}", market.listings().len());
                println!("Units on market: {}", market.total_quantity());
                if let (Some(buy), Some(sell)) =
                    (market.mean_buy_price(), market.mean_sell_price())
                {
                    println!("Mean buy price: {}$ / mean sell price: {}$", buy, sell);
                }
            }
            Some(_) => {
                match dispatch(
                    &mut market,
                    &mut accounts,
                    &mut holdings,
                    actor,
                    hand.as_deref(),
                    input,
                ) {
                    Ok(CommandOutcome::Bought(receipt)) => {
                        println!(
                            "Bought {} {} for {}$",
                            receipt.quantity, receipt.item_id, receipt.total_price
                        );
                        if receipt.stashed > 0 {
                            println!(
                                "{} units did not fit and went to your stash",
                                receipt.stashed
                            );
                        }
                    }
                    Ok(CommandOutcome::Sold(receipt)) => {
                        println!(
                            "Sold {} {} for {}$",
                            receipt.quantity, receipt.item_id, receipt.total_price
                        );
                    }
                    Ok(CommandOutcome::SessionOpened(session)) => {
                        run_workflow(
                            session,
                            &mut market,
                            &mut accounts,
                            &mut holdings,
                            &mut lines,
                        );
                    }
                    Err(e) => {
                        warn!(%e, "command rejected");
                        println!("{}", e);
                    }
                }
            }
        }

        print!("> ");
        let _ = std::io::stdout().flush();
    }

    if let Some(store) = &store {
        if let Err(e) = store.save(&market, &accounts) {
            eprintln!("Error: failed to save state: {}", e);
            process::exit(1);
        }
    }
}

/// Walk one workflow session interactively on stdin
fn run_workflow(
    mut session: TradeSession,
    market: &mut Market,
    accounts: &mut AccountRegistry,
    holdings: &mut MemoryHoldings,
    lines: &mut std::io::Lines<std::io::StdinLock<'_>>,
) {
    loop {
        let render = session.render(market, holdings);
        match render.screen {
            Screen::ItemDetail => {
                println!(
                    "{} - unit price {}$ ({} available)",
                    render.item_id, render.unit_price, render.max_quantity
                );
                println!("[amount/back]");
            }
            Screen::AmountSelect => {
                println!(
                    "{} x{} = {}$ (max {})",
                    render.item_id,
                    render.intent.quantity,
                    render.intent.quoted_price,
                    render.max_quantity
                );
                println!("[one/bulk/all/<number>/confirm/back]");
            }
            Screen::Confirm => {
                println!(
                    "Confirm: {} x{} for {}$",
                    render.item_id, render.intent.quantity, render.intent.quoted_price
                );
                println!("[yes/back]");
            }
            _ => return,
        }

        print!("? ");
        let _ = std::io::stdout().flush();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => return,
        };
        let choice = line.trim();

        let result = match (session.screen(), choice) {
            (_, "back") => {
                if session.cancel() == Screen::Cancelled {
                    return;
                }
                Ok(())
            }
            (Screen::ItemDetail, "amount") => {
                session.choose_amount(market, holdings);
                Ok(())
            }
            (Screen::AmountSelect, "one") => session
                .select_preset(market, holdings, QuantityPreset::One)
                .map(|_| ()),
            (Screen::AmountSelect, "bulk") => session
                .select_preset(market, holdings, QuantityPreset::Bulk)
                .map(|_| ()),
            (Screen::AmountSelect, "all") => session
                .select_preset(market, holdings, QuantityPreset::All)
                .map(|_| ()),
            (Screen::AmountSelect, "confirm") => {
                session.confirm(market, holdings).map(|_| ())
            }
            (Screen::AmountSelect, raw) => match raw.parse::<u64>() {
                Ok(n) if n > 0 => session
                    .select_preset(market, holdings, QuantityPreset::Custom(n))
                    .map(|_| ()),
                _ => {
                    println!("Invalid amount '{}'", raw);
                    Ok(())
                }
            },
            (Screen::Confirm, "yes") => match session.execute(market, accounts, holdings) {
                Ok(receipt) => {
                    println!(
                        "Committed: {} x{} for {}$",
                        receipt.item_id, receipt.quantity, receipt.total_price
                    );
                    if receipt.stashed > 0 {
                        println!("{} units went to your stash", receipt.stashed);
                    }
                    return;
                }
                Err(e) => Err(e),
            },
            _ => {
                println!("Unknown choice '{}'", choice);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{}", e);
        }
    }
}
