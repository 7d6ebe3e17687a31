//! Account repository and service traits.
//!
//! These traits define the contract for platform-account operations without
//! any database-specific types, allowing for different storage
//! implementations.

use async_trait::async_trait;

use super::accounts_model::{AccountStatus, NewPlatformAccount, PlatformAccount};
use crate::adapters::FetchedHolding;
use crate::errors::Result;

/// Contract for PlatformAccount persistence.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Creates a new platform account. New accounts start `Connected`.
    async fn create(&self, new_account: NewPlatformAccount) -> Result<PlatformAccount>;

    /// Retrieves an account by its ID.
    fn get_by_id(&self, account_id: &str) -> Result<PlatformAccount>;

    /// Lists every account belonging to a user.
    fn list_by_user(&self, user_id: &str) -> Result<Vec<PlatformAccount>>;

    /// Persists a status transition. The status is the only account field the
    /// engine ever mutates.
    async fn update_status(&self, account_id: &str, status: AccountStatus) -> Result<()>;
}

/// Contract for account-level operations the engine and callers share.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Connects a new platform account.
    async fn create_account(&self, new_account: NewPlatformAccount) -> Result<PlatformAccount>;

    /// Retrieves an account by ID.
    fn get_account(&self, account_id: &str) -> Result<PlatformAccount>;

    /// Lists a user's accounts.
    fn list_accounts(&self, user_id: &str) -> Result<Vec<PlatformAccount>>;

    /// Transitions an account's stored status, skipping the write when the
    /// status is unchanged. Returns the status now on record.
    async fn transition_status(
        &self,
        account: &PlatformAccount,
        next: AccountStatus,
    ) -> Result<AccountStatus>;

    /// Submits a 2FA/captcha code for a `NeedVerify` account. On adapter
    /// success the account transitions to `Connected` and the fetched
    /// holdings are returned; on failure the status is left unchanged.
    async fn submit_challenge(
        &self,
        account_id: &str,
        session_id: &str,
        code: &str,
    ) -> Result<Vec<FetchedHolding>>;
}
