//! Snapshot module - the daily ledger and the engines that maintain it.

pub mod recalculation;
mod snapshot_model;
pub mod snapshot_service;
mod snapshot_traits;

pub use recalculation::recalculate_profit_series;
pub use snapshot_model::*;
pub use snapshot_service::SnapshotService;
pub use snapshot_traits::*;


#[cfg(test)]
mod backfill_tests;
