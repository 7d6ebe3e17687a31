//! Ledger repository and service traits.
//!
//! The repository contract is database-agnostic; the two write operations
//! (`replace_snapshot_for_date`, `merge_account_day`) must each be atomic so
//! a concurrent reader never observes holdings from two different
//! generations mixed together.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::snapshot_model::{
    BackfillReport, HoldingInput, HoldingPosition, PortfolioSnapshot, ProfitUpdate,
};
use crate::adapters::DailyHoldings;
use crate::errors::Result;

/// Contract for ledger persistence.
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Loads a user's entire ledger, ordered by date ascending.
    fn get_snapshots_by_user(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>>;

    /// Looks up the ledger row for one business date.
    fn get_snapshot_on_date(&self, user_id: &str, date: NaiveDate)
        -> Result<Option<PortfolioSnapshot>>;

    /// Loads the holdings belonging to one ledger row.
    fn get_holdings_for_snapshot(&self, snapshot_id: &str) -> Result<Vec<HoldingPosition>>;

    /// Upserts the ledger row for (user, date) with a full aggregation:
    /// existing holdings are wholesale deleted and recreated, totals and the
    /// capture timestamp overwritten, profit fields zeroed. Inserts a fresh
    /// row when none exists. Must run as a single transaction.
    async fn replace_snapshot_for_date(
        &self,
        user_id: &str,
        date: NaiveDate,
        total_value: f64,
        holdings: Vec<HoldingInput>,
    ) -> Result<()>;

    /// Merges one account's holdings into the ledger row for (user, date):
    /// deletes only that account's holdings on the row, inserts the new ones,
    /// and recomputes the row total as the other accounts' stored sum plus
    /// `account_total`. Inserts a fresh row (total = `account_total`, zero
    /// profits) when none exists. Must run as a single transaction.
    async fn merge_account_day(
        &self,
        user_id: &str,
        account_id: &str,
        date: NaiveDate,
        holdings: Vec<HoldingInput>,
        account_total: f64,
    ) -> Result<()>;

    /// Rewrites the derived profit fields for the given rows.
    async fn update_profits(&self, updates: Vec<ProfitUpdate>) -> Result<()>;
}

/// Contract for the snapshot engine.
#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    /// Produces today's ledger row for one user by fetching every connected
    /// account, then recalculates profits over the full history. A silent
    /// no-op when the user does not exist. One account's adapter failure
    /// never aborts the other accounts or the write.
    async fn generate_for_user(&self, user_id: &str) -> Result<()>;

    /// Runs generation for every active user, isolating per-user failures.
    /// Returns the number of users whose generation failed.
    async fn generate_for_all_users(&self) -> Result<usize>;

    /// Merges a per-account daily history into the user's ledger in
    /// bounded-size concurrent batches, then recalculates profits once.
    /// Per-day failures are isolated and reported.
    async fn backfill_account(
        &self,
        user_id: &str,
        account_id: &str,
        history: Vec<DailyHoldings>,
    ) -> Result<BackfillReport>;

    /// Fetches an account's history from its platform adapter (when
    /// supported) and backfills it. The on-demand path after a new account
    /// first authenticates.
    async fn backfill_account_from_platform(&self, account_id: &str) -> Result<BackfillReport>;

    /// Full-history derivation of day/cumulative profit from total-value
    /// deltas. Never mutates totals.
    async fn recalculate_profits(&self, user_id: &str) -> Result<()>;

    /// Read access to a user's ledger, date ascending.
    fn get_snapshots(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>>;
}
