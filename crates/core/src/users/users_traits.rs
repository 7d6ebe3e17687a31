use super::users_model::AppUser;
use crate::errors::Result;

/// Contract for user lookups.
///
/// The engine never mutates users; account and snapshot writes are the only
/// mutations it makes.
pub trait UserRepositoryTrait: Send + Sync {
    /// Fetches a user by id. `Ok(None)` when the user does not exist.
    fn get_by_id(&self, user_id: &str) -> Result<Option<AppUser>>;

    /// Lists users eligible for the scheduled snapshot run.
    fn list_active(&self) -> Result<Vec<AppUser>>;
}
