//! SQLite storage implementation for platform accounts.

mod model;
mod repository;

pub use model::PlatformAccountDB;
pub use repository::AccountRepository;
