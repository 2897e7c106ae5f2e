//! Player stalls
//!
//! Player-owned, fixed-price trading points, distinct from the shared
//! elastic-price catalog. A stall is created when an actor places a stall
//! marker in the world and removed when its owner breaks it; the items it
//! sells live in a backing container owned by the host world.

use crate::core::accounts::AccountRegistry;
use crate::core::traits::StallContainer;
use crate::pricing;
use crate::types::{ActorId, MarketError};
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashSet;

const SERIAL_SECTIONS: usize = 4;
const SERIAL_SECTION_LENGTH: usize = 4;
const SERIAL_CHAR_POOL: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A player-owned, fixed-price trading point
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStall {
    /// Key of the world location the stall marker occupies
    pub location: String,

    /// Fixed price per unit, set by the owner; not market-elastic
    pub price_per_unit: Decimal,

    /// The actor that placed the stall and receives its profit
    pub owner: ActorId,

    /// Unique, externally visible handle
    pub serial: String,

    /// Whether other actors may see the stall's location
    pub public_location: bool,
}

/// Registry of all placed stalls
pub struct StallRegistry {
    stalls: Vec<PlayerStall>,
    serials: HashSet<String>,
}

impl StallRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        StallRegistry {
            stalls: Vec::new(),
            serials: HashSet::new(),
        }
    }

    /// Place a stall, generating its unique serial code
    ///
    /// Returns a copy of the placed stall so the caller can show the actor
    /// their new serial.
    pub fn place(
        &mut self,
        location: impl Into<String>,
        price_per_unit: Decimal,
        owner: ActorId,
        public_location: bool,
    ) -> PlayerStall {
        let serial = self.generate_serial();
        self.serials.insert(serial.clone());

        let stall = PlayerStall {
            location: location.into(),
            price_per_unit,
            owner,
            serial,
            public_location,
        };
        self.stalls.push(stall.clone());
        stall
    }

    /// The stall occupying the given location, if any
    pub fn by_location(&self, location: &str) -> Option<&PlayerStall> {
        self.stalls.iter().find(|stall| stall.location == location)
    }

    /// The stall carrying the given serial code, if any
    pub fn by_serial(&self, serial: &str) -> Option<&PlayerStall> {
        self.stalls.iter().find(|stall| stall.serial == serial)
    }

    /// All stalls owned by the actor
    pub fn owned_by(&self, owner: ActorId) -> Vec<&PlayerStall> {
        self.stalls
            .iter()
            .filter(|stall| stall.owner == owner)
            .collect()
    }

    /// Remove the stall at `location`, which only its owner may do
    ///
    /// # Errors
    ///
    /// `UnknownStall` when no stall occupies the location, `NotStallOwner`
    /// when someone else's marker is broken.
    pub fn remove(&mut self, location: &str, actor: ActorId) -> Result<PlayerStall, MarketError> {
        let position = self
            .stalls
            .iter()
            .position(|stall| stall.location == location)
            .ok_or_else(|| MarketError::unknown_stall(location))?;

        if self.stalls[position].owner != actor {
            return Err(MarketError::NotStallOwner {
                actor,
                location: location.to_string(),
            });
        }

        Ok(self.stalls.remove(position))
    }

    /// Buy `quantity` units of `item` from the stall at `location`
    ///
    /// The fixed price is not market-elastic: the total is simply
    /// `price_per_unit * quantity`. Funds move buyer -> owner through the
    /// account ledger; items come out of the backing container.
    ///
    /// # Errors
    ///
    /// `UnknownStall`, `InsufficientStock` when the container holds fewer
    /// units, `InsufficientFunds` from the funds-guarded debit.
    pub fn purchase(
        &self,
        location: &str,
        buyer: ActorId,
        item: &str,
        quantity: u64,
        accounts: &mut AccountRegistry,
        container: &mut dyn StallContainer,
    ) -> Result<Decimal, MarketError> {
        let stall = self
            .by_location(location)
            .ok_or_else(|| MarketError::unknown_stall(location))?;

        let available = container.available(item);
        if available < quantity {
            return Err(MarketError::insufficient_stock(
                item,
                available as i64,
                quantity,
            ));
        }

        let total = pricing::round_money(stall.price_per_unit * Decimal::from(quantity));
        accounts.secure_debit(buyer, total)?;
        container.take(item, quantity);
        accounts.credit(stall.owner, total)?;

        Ok(total)
    }

    fn generate_serial(&self) -> String {
        let mut rng = rand::thread_rng();

        loop {
            let serial = (0..SERIAL_SECTIONS)
                .map(|_| {
                    (0..SERIAL_SECTION_LENGTH)
                        .map(|_| {
                            let index = rng.gen_range(0..SERIAL_CHAR_POOL.len());
                            SERIAL_CHAR_POOL[index] as char
                        })
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join("-");

            // Collisions are close to impossible; re-rolling makes them so
            if !self.serials.contains(&serial) {
                return serial;
            }
        }
    }
}

impl Default for StallRegistry {
    fn default() -> Self {
        Self::new()
    }
}
