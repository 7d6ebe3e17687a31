use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{holding_positions, portfolio_snapshots};

use super::model::{HoldingPositionDB, PortfolioSnapshotDB, DATE_FORMAT};
use foliosnap_core::errors::Result;
use foliosnap_core::snapshot::{
    HoldingInput, HoldingPosition, PortfolioSnapshot, ProfitUpdate, SnapshotRepositoryTrait,
};

/// Repository for the daily ledger.
///
/// The two write operations each run as one job on the writer actor, so the
/// delete/insert/update sequences inside them commit atomically.
pub struct SnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Looks up the row id for (user, date), if one exists.
    fn find_row_id(
        conn: &mut SqliteConnection,
        for_user: &str,
        date_str: &str,
    ) -> Result<Option<String>> {
        portfolio_snapshots::table
            .filter(portfolio_snapshots::user_id.eq(for_user))
            .filter(portfolio_snapshots::snapshot_date.eq(date_str))
            .select(portfolio_snapshots::id)
            .first::<String>(conn)
            .optional()
            .into_core()
    }

    fn insert_holdings(
        conn: &mut SqliteConnection,
        snapshot_id: &str,
        holdings: Vec<HoldingInput>,
    ) -> Result<()> {
        let rows: Vec<HoldingPositionDB> = holdings
            .into_iter()
            .map(|h| HoldingPositionDB::from_input(snapshot_id, h))
            .collect();
        if rows.is_empty() {
            return Ok(());
        }
        diesel::insert_into(holding_positions::table)
            .values(&rows)
            .execute(conn)
            .into_core()?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    fn get_snapshots_by_user(&self, user_id: &str) -> Result<Vec<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let results = portfolio_snapshots::table
            .select(PortfolioSnapshotDB::as_select())
            .filter(portfolio_snapshots::user_id.eq(user_id))
            .order(portfolio_snapshots::snapshot_date.asc())
            .load::<PortfolioSnapshotDB>(&mut conn)
            .into_core()?;

        results
            .into_iter()
            .map(PortfolioSnapshot::try_from)
            .collect()
    }

    fn get_snapshot_on_date(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<PortfolioSnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let row = portfolio_snapshots::table
            .select(PortfolioSnapshotDB::as_select())
            .filter(portfolio_snapshots::user_id.eq(user_id))
            .filter(portfolio_snapshots::snapshot_date.eq(date.format(DATE_FORMAT).to_string()))
            .first::<PortfolioSnapshotDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(PortfolioSnapshot::try_from).transpose()
    }

    fn get_holdings_for_snapshot(&self, snapshot_id: &str) -> Result<Vec<HoldingPosition>> {
        let mut conn = get_connection(&self.pool)?;

        let results = holding_positions::table
            .select(HoldingPositionDB::as_select())
            .filter(holding_positions::snapshot_id.eq(snapshot_id))
            .order((
                holding_positions::account_id.asc(),
                holding_positions::symbol.asc(),
            ))
            .load::<HoldingPositionDB>(&mut conn)
            .into_core()?;

        Ok(results.into_iter().map(HoldingPosition::from).collect())
    }

    async fn replace_snapshot_for_date(
        &self,
        user_id: &str,
        date: NaiveDate,
        total_value: f64,
        holdings: Vec<HoldingInput>,
    ) -> Result<()> {
        let for_user = user_id.to_string();
        self.writer
            .exec(move |conn| {
                let date_str = date.format(DATE_FORMAT).to_string();

                let row_id = match Self::find_row_id(conn, &for_user, &date_str)? {
                    Some(existing_id) => {
                        // Wholesale delete-then-recreate of the row's holdings.
                        diesel::delete(
                            holding_positions::table
                                .filter(holding_positions::snapshot_id.eq(&existing_id)),
                        )
                        .execute(conn)
                        .into_core()?;

                        diesel::update(portfolio_snapshots::table.find(&existing_id))
                            .set((
                                portfolio_snapshots::total_value.eq(total_value),
                                portfolio_snapshots::day_profit.eq(0.0),
                                portfolio_snapshots::total_profit.eq(0.0),
                                portfolio_snapshots::captured_at
                                    .eq(chrono::Utc::now().naive_utc()),
                            ))
                            .execute(conn)
                            .into_core()?;
                        existing_id
                    }
                    None => {
                        let row = PortfolioSnapshotDB::fresh(&for_user, date, total_value);
                        diesel::insert_into(portfolio_snapshots::table)
                            .values(&row)
                            .execute(conn)
                            .into_core()?;
                        row.id
                    }
                };

                debug!(
                    "Replacing ledger row {} for user {} on {} with {} holdings",
                    row_id,
                    for_user,
                    date_str,
                    holdings.len()
                );
                Self::insert_holdings(conn, &row_id, holdings)
            })
            .await
    }

    async fn merge_account_day(
        &self,
        user_id: &str,
        account_id: &str,
        date: NaiveDate,
        holdings: Vec<HoldingInput>,
        account_total: f64,
    ) -> Result<()> {
        let for_user = user_id.to_string();
        let for_account = account_id.to_string();
        self.writer
            .exec(move |conn| {
                let date_str = date.format(DATE_FORMAT).to_string();

                let row_id = match Self::find_row_id(conn, &for_user, &date_str)? {
                    Some(existing_id) => existing_id,
                    None => {
                        let row = PortfolioSnapshotDB::fresh(&for_user, date, account_total);
                        diesel::insert_into(portfolio_snapshots::table)
                            .values(&row)
                            .execute(conn)
                            .into_core()?;
                        row.id
                    }
                };

                // Only this account's holdings on the row are replaced.
                diesel::delete(
                    holding_positions::table
                        .filter(holding_positions::snapshot_id.eq(&row_id))
                        .filter(holding_positions::account_id.eq(&for_account)),
                )
                .execute(conn)
                .into_core()?;

                let other_total: f64 = holding_positions::table
                    .filter(holding_positions::snapshot_id.eq(&row_id))
                    .select(sum(holding_positions::market_value))
                    .first::<Option<f64>>(conn)
                    .into_core()?
                    .unwrap_or(0.0);

                Self::insert_holdings(conn, &row_id, holdings)?;

                diesel::update(portfolio_snapshots::table.find(&row_id))
                    .set((
                        portfolio_snapshots::total_value.eq(other_total + account_total),
                        portfolio_snapshots::captured_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    async fn update_profits(&self, updates: Vec<ProfitUpdate>) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }
        self.writer
            .exec(move |conn| {
                for update in updates {
                    diesel::update(portfolio_snapshots::table.find(&update.snapshot_id))
                        .set((
                            portfolio_snapshots::day_profit.eq(update.day_profit),
                            portfolio_snapshots::total_profit.eq(update.total_profit),
                        ))
                        .execute(conn)
                        .into_core()?;
                }
                Ok(())
            })
            .await
    }
}
