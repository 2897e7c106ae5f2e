//! Single-writer session event loop
//!
//! UI events — preset clicks, the free-text custom amount, confirm, close —
//! arrive on their own execution contexts. None of them may touch a ledger
//! from there: they are marshaled through one `tokio::sync::mpsc` channel,
//! and the loop below is the only place that holds the market and account
//! ledgers mutably while a session runs. Quote operations stay pure, so
//! everything up to the confirm click is side-effect free by construction.

use crate::core::accounts::AccountRegistry;
use crate::core::market::Market;
use crate::core::traits::Holdings;
use crate::core::workflow::{QuantityPreset, RenderRequest, Screen, TradeReceipt, TradeSession};
use tokio::sync::mpsc;
use tracing::warn;

/// A UI event delivered from the display boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A quantity preset was selected
    Preset(QuantityPreset),
    /// The free-text input collaborator delivered a custom amount
    ///
    /// Raw text on purpose: parsing happens on the single-writer side.
    CustomAmount(String),
    /// The primary action was clicked (advance / execute)
    Confirm,
    /// The current screen was closed
    Close,
}

/// An update emitted toward the display boundary
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// Redraw the given screen
    Render(RenderRequest),
    /// Show a recoverable error to the actor
    Notice(String),
    /// The session ended, with a receipt when a trade committed
    Finished(Option<TradeReceipt>),
}

/// Drive one session to completion over a UI event stream
///
/// Owns all ledger mutation for the session's lifetime. Recoverable errors
/// are surfaced as [`SessionUpdate::Notice`] and the loop continues; the
/// loop ends when the session reaches a terminal screen or either channel
/// closes. Returns the receipt when a trade committed.
pub async fn drive_session(
    mut session: TradeSession,
    market: &mut Market,
    accounts: &mut AccountRegistry,
    holdings: &mut dyn Holdings,
    mut events: mpsc::Receiver<UiEvent>,
    updates: mpsc::Sender<SessionUpdate>,
) -> Option<TradeReceipt> {
    if updates
        .send(SessionUpdate::Render(session.render(market, holdings)))
        .await
        .is_err()
    {
        return None;
    }

    while let Some(event) = events.recv().await {
        match event {
            UiEvent::Preset(preset) => {
                if session.screen() == Screen::ItemDetail {
                    session.choose_amount(market, holdings);
                }
                match session.select_preset(market, holdings, preset) {
                    Ok(render) => send_render(&updates, render).await?,
                    Err(error) => {
                        send_notice(&updates, error.to_string()).await?;
                        send_render(&updates, session.render(market, holdings)).await?;
                    }
                }
            }

            UiEvent::CustomAmount(raw) => {
                if session.screen() == Screen::ItemDetail {
                    session.choose_amount(market, holdings);
                }
                match raw.trim().parse::<u64>() {
                    Ok(amount) if amount > 0 => {
                        match session.select_preset(
                            market,
                            holdings,
                            QuantityPreset::Custom(amount),
                        ) {
                            Ok(render) => send_render(&updates, render).await?,
                            Err(error) => {
                                send_notice(&updates, error.to_string()).await?;
                            }
                        }
                    }
                    _ => {
                        warn!(input = %raw, "rejected custom amount");
                        send_notice(
                            &updates,
                            crate::types::MarketError::invalid_amount(raw.trim()).to_string(),
                        )
                        .await?;
                        send_render(&updates, session.render(market, holdings)).await?;
                    }
                }
            }

            UiEvent::Confirm => match session.screen() {
                Screen::ItemDetail => {
                    let render = session.choose_amount(market, holdings);
                    send_render(&updates, render).await?;
                }
                Screen::AmountSelect => match session.confirm(market, holdings) {
                    Ok(render) => send_render(&updates, render).await?,
                    Err(error) => {
                        send_notice(&updates, error.to_string()).await?;
                        send_render(&updates, session.render(market, holdings)).await?;
                    }
                },
                Screen::Confirm => match session.execute(market, accounts, holdings) {
                    Ok(receipt) => {
                        let _ = updates
                            .send(SessionUpdate::Finished(Some(receipt.clone())))
                            .await;
                        return Some(receipt);
                    }
                    Err(error) => {
                        send_notice(&updates, error.to_string()).await?;
                        send_render(&updates, session.render(market, holdings)).await?;
                    }
                },
                _ => {}
            },

            UiEvent::Close => {
                let screen = session.cancel();
                if screen == Screen::Cancelled {
                    let _ = updates.send(SessionUpdate::Finished(None)).await;
                    return None;
                }
                send_render(&updates, session.render(market, holdings)).await?;
            }
        }
    }

    None
}

async fn send_render(
    updates: &mpsc::Sender<SessionUpdate>,
    render: RenderRequest,
) -> Option<()> {
    updates.send(SessionUpdate::Render(render)).await.ok()
}

async fn send_notice(updates: &mpsc::Sender<SessionUpdate>, notice: String) -> Option<()> {
    updates.send(SessionUpdate::Notice(notice)).await.ok()
}
