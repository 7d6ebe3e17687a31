//! Database models for ledger rows and their holdings.
//!
//! Business dates are stored as `YYYY-MM-DD` text so the unique
//! (user, date) index and date-ordered queries compare correctly.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use foliosnap_core::errors::Error;
use foliosnap_core::snapshot::{HoldingInput, HoldingPosition, PortfolioSnapshot, SnapshotStatus};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Database model for ledger rows
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::portfolio_snapshots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioSnapshotDB {
    pub id: String,
    pub user_id: String,
    pub snapshot_date: String,
    pub captured_at: NaiveDateTime,
    pub total_value: f64,
    pub day_profit: f64,
    pub total_profit: f64,
    pub status: String,
}

impl PortfolioSnapshotDB {
    /// Builds a new row for (user, date) with zeroed profit fields.
    pub fn fresh(user_id: &str, date: NaiveDate, total_value: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            snapshot_date: date.format(DATE_FORMAT).to_string(),
            captured_at: chrono::Utc::now().naive_utc(),
            total_value,
            day_profit: 0.0,
            total_profit: 0.0,
            status: SnapshotStatus::default().as_str().to_string(),
        }
    }
}

impl TryFrom<PortfolioSnapshotDB> for PortfolioSnapshot {
    type Error = Error;

    fn try_from(db: PortfolioSnapshotDB) -> Result<Self, Error> {
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            snapshot_date: NaiveDate::parse_from_str(&db.snapshot_date, DATE_FORMAT)?,
            captured_at: db.captured_at,
            total_value: db.total_value,
            day_profit: db.day_profit,
            total_profit: db.total_profit,
            status: db.status.parse()?,
        })
    }
}

/// Database model for holdings
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::holding_positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingPositionDB {
    pub id: String,
    pub snapshot_id: String,
    pub account_id: String,
    pub symbol: String,
    pub name: Option<String>,
    pub quantity: f64,
    pub price: f64,
    pub cost_price: f64,
    pub market_value: f64,
    pub day_profit: f64,
    pub currency: String,
}

impl HoldingPositionDB {
    /// Materializes an input holding under its parent snapshot, assigning a
    /// fresh row id.
    pub fn from_input(snapshot_id: &str, input: HoldingInput) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            snapshot_id: snapshot_id.to_string(),
            account_id: input.account_id,
            symbol: input.symbol,
            name: input.name,
            quantity: input.quantity,
            price: input.price,
            cost_price: input.cost_price,
            market_value: input.market_value,
            day_profit: input.day_profit,
            currency: input.currency,
        }
    }
}

impl From<HoldingPositionDB> for HoldingPosition {
    fn from(db: HoldingPositionDB) -> Self {
        Self {
            id: db.id,
            snapshot_id: db.snapshot_id,
            account_id: db.account_id,
            symbol: db.symbol,
            name: db.name,
            quantity: db.quantity,
            price: db.price,
            cost_price: db.cost_price,
            market_value: db.market_value,
            day_profit: db.day_profit,
            currency: db.currency,
        }
    }
}
