//! SQLite storage implementation for the portfolio ledger.

mod model;
mod repository;

pub use model::{HoldingPositionDB, PortfolioSnapshotDB};
pub use repository::SnapshotRepository;
