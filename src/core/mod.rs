//! Core business logic module
//!
//! This module contains the core marketplace components:
//! - `traits` - Collaborator traits at the engine's external boundaries
//! - `market` - The market ledger (catalog, commits, resolution)
//! - `accounts` - The account ledger (balances, guarded debits, stash)
//! - `workflow` - The quote/confirm/execute/cancel state machine
//! - `session` - The single-writer UI event loop
//! - `resolver` - Fuzzy identifier matching
//! - `stall` - Player-owned fixed-price stalls
//! - `holdings` - In-memory holdings for the REPL and tests

pub mod accounts;
pub mod holdings;
pub mod market;
pub mod resolver;
pub mod session;
pub mod stall;
pub mod traits;
pub mod workflow;

pub use accounts::AccountRegistry;
pub use holdings::MemoryHoldings;
pub use market::Market;
pub use session::{drive_session, SessionUpdate, UiEvent};
pub use stall::{PlayerStall, StallRegistry};
pub use traits::{BalanceListener, Holdings, StallContainer};
pub use workflow::{
    execute_buy, execute_sell, QuantityPreset, RenderRequest, Screen, TradeReceipt, TradeSession,
    BULK_QUANTITY,
};
