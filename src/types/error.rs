//! Error types for the marketplace engine
//!
//! This module defines all error types that can occur while resolving,
//! quoting, and committing trades, plus the I/O errors of the persistence
//! boundary.
//!
//! # Error Categories
//!
//! - **Input Errors**: invalid amounts, unresolvable item identifiers
//! - **Trade Errors**: insufficient funds, stock, or holdings
//! - **Workflow Errors**: duplicate execution of a consumed intent
//! - **Persistence Errors**: file I/O and CSV parsing failures
//!
//! Every trade-path error is recoverable: it is surfaced to the actor as a
//! message and never aborts the process. Only persistence errors are fatal
//! to the binary.

use super::account::ActorId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the marketplace engine
///
/// Each variant carries the context needed to render a user-visible
/// message at the command or workflow boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarketError {
    /// Quantity input was non-numeric or non-positive
    #[error("Invalid amount '{input}'")]
    InvalidAmount {
        /// The raw input that failed to parse as a positive quantity
        input: String,
    },

    /// Item identifier unresolvable, with an optional fuzzy suggestion
    #[error("Unknown item '{item}'{}", suggestion.as_deref().map(|s| format!(" - did you mean '{}'?", s)).unwrap_or_default())]
    UnknownItem {
        /// The identifier that did not resolve
        item: String,
        /// Nearest known identifier by edit distance, if any
        suggestion: Option<String>,
    },

    /// Identifier resolvable but deny-listed or unclassifiable
    #[error("Item '{item}' cannot be traded on the market")]
    ItemNotSellable {
        /// The identifier that is not tradeable
        item: String,
    },

    /// The actor tried to sell without holding anything
    #[error("Actor {actor} is not holding an item to sell")]
    EmptyHand {
        /// The actor with the empty hand
        actor: ActorId,
    },

    /// Buy total exceeds the actor's balance
    ///
    /// Raised by the funds-guarded debit; the balance is never mutated on
    /// this path.
    #[error("Insufficient funds for actor {actor}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The actor whose balance fell short
        actor: ActorId,
        /// Balance at the time of the attempt
        balance: Decimal,
        /// Amount the debit asked for
        requested: Decimal,
    },

    /// Buy quantity exceeds what the market holds
    ///
    /// The workflow clamps quantities before the confirm screen, so this is
    /// a ledger-level backstop.
    #[error("Insufficient stock of '{item}': available {available}, requested {requested}")]
    InsufficientStock {
        /// The listed item
        item: String,
        /// Units currently on the market
        available: i64,
        /// Units the buy asked for
        requested: u64,
    },

    /// Sell quantity exceeds what the actor holds
    #[error("Insufficient holdings of '{item}': held {held}, requested {requested}")]
    InsufficientHoldings {
        /// The item being sold
        item: String,
        /// Units the actor holds
        held: u64,
        /// Units the sell asked for
        requested: u64,
    },

    /// A confirmed intent was executed twice
    ///
    /// The first execute consumed the intent; the duplicate has no ledger
    /// effect.
    #[error("Trade intent for actor {actor} was already executed")]
    IntentConsumed {
        /// The actor whose intent was replayed
        actor: ActorId,
    },

    /// Execute was requested outside the confirm screen
    #[error("No confirmed trade intent for actor {actor}")]
    IntentNotConfirmed {
        /// The actor whose session is not on the confirm screen
        actor: ActorId,
    },

    /// A sell would push the listed quantity past its representable bound
    #[error("Market quantity of '{item}' cannot grow by {requested}")]
    QuantityOverflow {
        /// The listed item
        item: String,
        /// Units the sell asked to add
        requested: u64,
    },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for actor {actor}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// The affected actor
        actor: ActorId,
    },

    /// No stash batch of the requested item exists for the actor
    #[error("Actor {actor} has no stashed '{item}'")]
    StashMiss {
        /// The actor whose stash was searched
        actor: ActorId,
        /// The item that was not found
        item: String,
    },

    /// No stall matches the given serial code or location
    #[error("No stall found for '{handle}'")]
    UnknownStall {
        /// The serial code or location key that did not resolve
        handle: String,
    },

    /// The actor tried to remove a stall they do not own
    #[error("Actor {actor} does not own the stall at '{location}'")]
    NotStallOwner {
        /// The actor attempting the removal
        actor: ActorId,
        /// The stall's location key
        location: String,
    },

    /// The command dispatcher received a command it does not know
    #[error("Unknown command '{command}'")]
    UnknownCommand {
        /// The command word that did not match
        command: String,
    },

    /// I/O error while reading or writing state files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error in a state file
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

// Conversion from io::Error to MarketError
impl From<std::io::Error> for MarketError {
    fn from(error: std::io::Error) -> Self {
        MarketError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to MarketError
impl From<csv::Error> for MarketError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        MarketError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl MarketError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(input: &str) -> Self {
        MarketError::InvalidAmount {
            input: input.to_string(),
        }
    }

    /// Create an UnknownItem error
    pub fn unknown_item(item: &str, suggestion: Option<String>) -> Self {
        MarketError::UnknownItem {
            item: item.to_string(),
            suggestion,
        }
    }

    /// Create an ItemNotSellable error
    pub fn item_not_sellable(item: &str) -> Self {
        MarketError::ItemNotSellable {
            item: item.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(actor: ActorId, balance: Decimal, requested: Decimal) -> Self {
        MarketError::InsufficientFunds {
            actor,
            balance,
            requested,
        }
    }

    /// Create an InsufficientStock error
    pub fn insufficient_stock(item: &str, available: i64, requested: u64) -> Self {
        MarketError::InsufficientStock {
            item: item.to_string(),
            available,
            requested,
        }
    }

    /// Create an InsufficientHoldings error
    pub fn insufficient_holdings(item: &str, held: u64, requested: u64) -> Self {
        MarketError::InsufficientHoldings {
            item: item.to_string(),
            held,
            requested,
        }
    }

    /// Create a QuantityOverflow error
    pub fn quantity_overflow(item: &str, requested: u64) -> Self {
        MarketError::QuantityOverflow {
            item: item.to_string(),
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, actor: ActorId) -> Self {
        MarketError::ArithmeticOverflow {
            operation: operation.to_string(),
            actor,
        }
    }

    /// Create a StashMiss error
    pub fn stash_miss(actor: ActorId, item: &str) -> Self {
        MarketError::StashMiss {
            actor,
            item: item.to_string(),
        }
    }

    /// Create an UnknownStall error
    pub fn unknown_stall(handle: &str) -> Self {
        MarketError::UnknownStall {
            handle: handle.to_string(),
        }
    }
}
