//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `listing`: Catalog listings, trades, and item categories
//! - `account`: Per-actor accounts and the overflow stash
//! - `intent`: The value-semantics trade intent of the workflow
//! - `error`: Error types for the marketplace engine

pub mod account;
pub mod error;
pub mod intent;
pub mod listing;

pub use account::{starting_balance, Account, ActorId, ItemBatch};
pub use error::MarketError;
pub use intent::TradeIntent;
pub use listing::{ItemCategory, ItemId, Listing, Trade, TradeKind, HISTORY_CAP};
