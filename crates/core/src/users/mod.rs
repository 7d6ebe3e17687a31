//! Users module - read-only user lookups consumed by the snapshot engine.

mod users_model;
mod users_traits;

pub use users_model::AppUser;
pub use users_traits::UserRepositoryTrait;
