//! The snapshot engine: generation, backfill, and profit recalculation.

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, error, info, warn};
use std::sync::Arc;

use super::recalculation::recalculate_profit_series;
use super::snapshot_model::{
    BackfillReport, HoldingInput, PortfolioSnapshot, ProfitUpdate, SnapshotConfig,
};
use super::snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
use crate::accounts::{AccountServiceTrait, AccountStatus, PlatformAccount};
use crate::adapters::{AdapterRegistry, DailyHoldings, FetchError, FetchedHolding};
use crate::credentials::CredentialCodec;
use crate::errors::Result;
use crate::users::UserRepositoryTrait;
use crate::utils::time_utils;

pub struct SnapshotService {
    users: Arc<dyn UserRepositoryTrait>,
    accounts: Arc<dyn AccountServiceTrait>,
    repository: Arc<dyn SnapshotRepositoryTrait>,
    adapters: AdapterRegistry,
    codec: CredentialCodec,
    config: SnapshotConfig,
}

impl SnapshotService {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        accounts: Arc<dyn AccountServiceTrait>,
        repository: Arc<dyn SnapshotRepositoryTrait>,
        adapters: AdapterRegistry,
        codec: CredentialCodec,
        config: SnapshotConfig,
    ) -> Self {
        Self {
            users,
            accounts,
            repository,
            adapters,
            codec,
            config,
        }
    }

    /// Fetches one account's current holdings through its adapter.
    ///
    /// Every failure mode collapses into `FetchError` so the caller can
    /// classify it into an account status: a missing adapter registration and
    /// an elapsed timeout are indistinguishable from any other platform
    /// error as far as the state machine is concerned.
    async fn fetch_account_holdings(
        &self,
        account: &PlatformAccount,
    ) -> std::result::Result<Vec<FetchedHolding>, FetchError> {
        let adapter = self
            .adapters
            .get(&account.platform)
            .map_err(|e| FetchError::other(e.to_string()))?;
        let credentials = self.codec.decode(account.credentials.as_deref());

        match tokio::time::timeout(
            self.config.adapter_timeout,
            adapter.fetch_current(&credentials),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::other(format!(
                "adapter '{}' timed out after {:?}",
                account.platform, self.config.adapter_timeout
            ))),
        }
    }

    /// Applies the adapter outcome to the account status state machine and
    /// returns the holdings an account contributes to the aggregation
    /// (nothing on failure).
    async fn collect_account(&self, account: &PlatformAccount) -> Result<Vec<HoldingInput>> {
        match self.fetch_account_holdings(account).await {
            Ok(fetched) => {
                if account.status != AccountStatus::Connected {
                    self.accounts
                        .transition_status(account, AccountStatus::Connected)
                        .await?;
                }
                Ok(fetched
                    .into_iter()
                    .map(|holding| HoldingInput::from_fetched(&account.id, holding))
                    .collect())
            }
            Err(fetch_error) => {
                let next = AccountStatus::from_failure(&fetch_error.reason);
                warn!(
                    "Fetch failed for account '{}' ({}): {} -> status {}",
                    account.id, account.platform, fetch_error, next
                );
                self.accounts.transition_status(account, next).await?;
                Ok(Vec::new())
            }
        }
    }

    async fn merge_backfill_day(
        &self,
        user_id: &str,
        account_id: &str,
        day: DailyHoldings,
    ) -> (NaiveDate, Result<()>) {
        let date = day.date;
        let holdings: Vec<HoldingInput> = day
            .holdings
            .into_iter()
            .map(|holding| HoldingInput::from_fetched(account_id, holding))
            .collect();
        let account_total: f64 = holdings.iter().map(|h| h.market_value).sum();

        let result = self
            .repository
            .merge_account_day(user_id, account_id, date, holdings, account_total)
            .await;
        (date, result)
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    async fn generate_for_user(&self, user_id: &str) -> Result<()> {
        let user = match self.users.get_by_id(user_id)? {
            Some(user) => user,
            None => {
                debug!("Skipping snapshot generation for unknown user '{user_id}'");
                return Ok(());
            }
        };

        let accounts = self.accounts.list_accounts(user_id)?;
        let mut holdings: Vec<HoldingInput> = Vec::new();
        for account in &accounts {
            holdings.extend(self.collect_account(account).await?);
        }

        let date = time_utils::resolve_business_date(user.timezone.as_deref());
        let total_value: f64 = holdings.iter().map(|h| h.market_value).sum();
        debug!(
            "Writing snapshot for user '{}' on {}: {} holdings, total {}",
            user_id,
            date,
            holdings.len(),
            total_value
        );

        // Profits are written as zero here; a single-day write cannot know
        // the prior day's total without the full-history pass below.
        self.repository
            .replace_snapshot_for_date(user_id, date, total_value, holdings)
            .await?;

        self.recalculate_profits(user_id).await
    }

    async fn generate_for_all_users(&self) -> Result<usize> {
        let users = self.users.list_active()?;
        info!("Running scheduled snapshot generation for {} users", users.len());

        let mut failed = 0usize;
        for user in users {
            if let Err(err) = self.generate_for_user(&user.id).await {
                error!("Snapshot generation failed for user '{}': {err}", user.id);
                failed += 1;
            }
        }
        Ok(failed)
    }

    async fn backfill_account(
        &self,
        user_id: &str,
        account_id: &str,
        mut history: Vec<DailyHoldings>,
    ) -> Result<BackfillReport> {
        history.sort_by_key(|day| day.date);
        info!(
            "Backfilling {} days for account '{}' (user '{}')",
            history.len(),
            account_id,
            user_id
        );

        let mut report = BackfillReport::default();
        // Days within a batch write concurrently; batches are strictly
        // sequential, so batch k is durably committed before k+1 starts.
        for batch in history.chunks(self.config.backfill_batch_size.max(1)) {
            let merges = batch
                .iter()
                .cloned()
                .map(|day| self.merge_backfill_day(user_id, account_id, day));
            for (date, result) in join_all(merges).await {
                match result {
                    Ok(()) => report.days_applied += 1,
                    Err(err) => {
                        warn!(
                            "Backfill day {date} failed for account '{account_id}': {err}"
                        );
                        report.failed_dates.push(date);
                    }
                }
            }
        }

        // One pass for the whole merged series, even when some days failed:
        // the rows that did land must still carry consistent profits.
        self.recalculate_profits(user_id).await?;
        Ok(report)
    }

    async fn backfill_account_from_platform(&self, account_id: &str) -> Result<BackfillReport> {
        let account = self.accounts.get_account(account_id)?;
        let adapter = self.adapters.get(&account.platform)?;
        if !adapter.supports_history() {
            debug!(
                "Platform '{}' does not support history; nothing to backfill",
                account.platform
            );
            return Ok(BackfillReport::default());
        }

        let credentials = self.codec.decode(account.credentials.as_deref());
        let history = adapter.fetch_history(&credentials).await?;
        self.backfill_account(&account.user_id, &account.id, history)
            .await
    }

    async fn recalculate_profits(&self, user_id: &str) -> Result<()> {
        let snapshots = self.repository.get_snapshots_by_user(user_id)?;
        if snapshots.is_empty() {
            return Ok(());
        }

        let totals: Vec<f64> = snapshots.iter().map(|s| s.total_value).collect();
        let updates: Vec<ProfitUpdate> = snapshots
            .iter()
            .zip(recalculate_profit_series(&totals))
            .map(|(snapshot, (day_profit, total_profit))| ProfitUpdate {
                snapshot_id: snapshot.id.clone(),
                day_profit,
                total_profit,
            })
            .collect();

        self.repository.update_profits(updates).await
    }

    fn get_snapshots(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>> {
        self.repository.get_snapshots_by_user(user_id)
    }
}
