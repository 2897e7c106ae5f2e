//! State directory persistence
//!
//! Saves and loads the whole economy — every listing with its bounded
//! trade history, every account with its stash — as CSV files in one state
//! directory. The binary loads on startup when the directory holds a
//! previous save and writes a fresh save on exit.

use crate::core::accounts::AccountRegistry;
use crate::core::market::Market;
use crate::io::state_format::{
    account_from_row, account_rows, apply_trade_row, listing_from_row, listing_rows, trade_rows,
    AccountRow, ListingRow, StashRow, TradeRow,
};
use crate::types::{ItemBatch, MarketError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

const LISTINGS_FILE: &str = "listings.csv";
const TRADES_FILE: &str = "trades.csv";
const ACCOUNTS_FILE: &str = "accounts.csv";
const STASH_FILE: &str = "stash.csv";

/// Persistence handle over one state directory
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Create a handle for the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        StateStore { dir: dir.into() }
    }

    /// Whether the directory holds a previous save
    pub fn has_state(&self) -> bool {
        self.dir.join(LISTINGS_FILE).exists()
    }

    /// Save the whole economy to the state directory
    ///
    /// # Errors
    ///
    /// Fatal I/O or CSV errors; partial writes leave the directory in a
    /// mixed state, so callers treat any error as "do not trust the save".
    pub fn save(&self, market: &Market, accounts: &AccountRegistry) -> Result<(), MarketError> {
        std::fs::create_dir_all(&self.dir)?;

        write_rows(&self.dir.join(LISTINGS_FILE), &listing_rows(market))?;
        write_rows(&self.dir.join(TRADES_FILE), &trade_rows(market))?;

        let (account_rows, stash_rows) = account_rows(accounts);
        write_rows(&self.dir.join(ACCOUNTS_FILE), &account_rows)?;
        write_rows(&self.dir.join(STASH_FILE), &stash_rows)?;

        info!(dir = %self.dir.display(), "saved market state");
        Ok(())
    }

    /// Load the whole economy from the state directory
    ///
    /// # Errors
    ///
    /// Fatal I/O or CSV errors, including a missing directory; check
    /// [`has_state`](Self::has_state) first on startup.
    pub fn load(&self) -> Result<(Market, AccountRegistry), MarketError> {
        let mut market = Market::new();
        for row in read_rows::<ListingRow>(&self.dir.join(LISTINGS_FILE))? {
            market.restore(listing_from_row(row));
        }
        for row in read_rows::<TradeRow>(&self.dir.join(TRADES_FILE))? {
            apply_trade_row(&mut market, row);
        }

        let mut accounts = AccountRegistry::new();
        for row in read_rows::<AccountRow>(&self.dir.join(ACCOUNTS_FILE))? {
            accounts.restore(account_from_row(row));
        }
        for row in read_rows::<StashRow>(&self.dir.join(STASH_FILE))? {
            accounts.stash(
                row.actor,
                ItemBatch {
                    item_id: row.item_id,
                    quantity: row.quantity,
                },
            );
        }

        info!(dir = %self.dir.display(), "loaded market state");
        Ok((market, accounts))
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), MarketError> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, MarketError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }

    Ok(rows)
}
