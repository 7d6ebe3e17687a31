//! Ledger domain models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::adapters::FetchedHolding;
use crate::constants::{ADAPTER_TIMEOUT_SECS, BACKFILL_BATCH_SIZE};
use crate::errors::ValidationError;

/// Write status of a ledger row. Only one success state is modeled today;
/// the schema anticipates others (partial fetches, stale data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SnapshotStatus {
    #[default]
    #[serde(rename = "OK")]
    Ok,
}

impl SnapshotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotStatus::Ok => "OK",
        }
    }
}

impl std::fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SnapshotStatus {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> crate::errors::Result<Self> {
        match s {
            "OK" => Ok(SnapshotStatus::Ok),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown snapshot status '{other}'"
            ))
            .into()),
        }
    }
}

/// One ledger row: a user's aggregated portfolio on one business date.
///
/// At most one row exists per (user, date); the store enforces this with a
/// unique constraint. `captured_at` records the last write, which is distinct
/// from the business date the row is keyed by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub id: String,
    pub user_id: String,
    pub snapshot_date: NaiveDate,
    pub captured_at: NaiveDateTime,
    pub total_value: f64,
    /// Derived by recalculation from the total-value series; zero until the
    /// first recalculation pass after a write.
    pub day_profit: f64,
    /// Cumulative profit since the earliest ledger row. Derived, like
    /// `day_profit`.
    pub total_profit: f64,
    pub status: SnapshotStatus,
}

/// One (account, symbol) position within a ledger row, owned by its parent
/// snapshot and cascade-deleted with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingPosition {
    pub id: String,
    pub snapshot_id: String,
    pub account_id: String,
    pub symbol: String,
    pub name: Option<String>,
    pub quantity: f64,
    pub price: f64,
    pub cost_price: f64,
    /// Trusted as reported by the adapter; never re-derived.
    pub market_value: f64,
    pub day_profit: f64,
    pub currency: String,
}

/// Input model for writing holdings; the repository assigns row ids and the
/// parent snapshot id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingInput {
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

impl HoldingInput {
    /// Tags an adapter-reported holding with the account it came from.
    pub fn from_fetched(account_id: &str, fetched: FetchedHolding) -> Self {
        Self {
            account_id: account_id.to_string(),
            symbol: fetched.symbol,
            name: fetched.name,
            quantity: fetched.quantity,
            price: fetched.price,
            cost_price: fetched.cost_price,
            market_value: fetched.market_value,
            day_profit: fetched.day_profit,
            currency: fetched.currency,
        }
    }
}

/// Derived profit fields for one ledger row, produced by recalculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitUpdate {
    pub snapshot_id: String,
    pub day_profit: f64,
    pub total_profit: f64,
}

/// Outcome of one backfill invocation. Days that failed to merge are
/// reported rather than silently dropped; the caller decides whether to
/// retry them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillReport {
    pub days_applied: usize,
    pub failed_dates: Vec<NaiveDate>,
}

/// Tuning knobs for the snapshot engine.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Upper bound on one adapter call; an unresponsive platform degrades to
    /// an `Error` status instead of stalling the run.
    pub adapter_timeout: Duration,
    /// Days written concurrently per backfill batch.
    pub backfill_batch_size: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            adapter_timeout: Duration::from_secs(ADAPTER_TIMEOUT_SECS),
            backfill_batch_size: BACKFILL_BATCH_SIZE,
        }
    }
}
