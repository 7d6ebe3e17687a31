use log::{debug, info};
use std::sync::Arc;

use async_trait::async_trait;

use super::accounts_model::{AccountStatus, NewPlatformAccount, PlatformAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::adapters::{AdapterRegistry, FetchedHolding};
use crate::errors::Result;

/// Service for managing platform accounts and their status state machine.
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
    adapters: AdapterRegistry,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>, adapters: AdapterRegistry) -> Self {
        Self {
            repository,
            adapters,
        }
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, new_account: NewPlatformAccount) -> Result<PlatformAccount> {
        new_account.validate()?;
        // Fail fast on platforms nothing is registered for.
        self.adapters.get(&new_account.platform)?;
        self.repository.create(new_account).await
    }

    fn get_account(&self, account_id: &str) -> Result<PlatformAccount> {
        self.repository.get_by_id(account_id)
    }

    fn list_accounts(&self, user_id: &str) -> Result<Vec<PlatformAccount>> {
        self.repository.list_by_user(user_id)
    }

    async fn transition_status(
        &self,
        account: &PlatformAccount,
        next: AccountStatus,
    ) -> Result<AccountStatus> {
        if account.status == next {
            return Ok(next);
        }
        debug!(
            "Account '{}' status transition {} -> {}",
            account.id, account.status, next
        );
        self.repository.update_status(&account.id, next).await?;
        Ok(next)
    }

    async fn submit_challenge(
        &self,
        account_id: &str,
        session_id: &str,
        code: &str,
    ) -> Result<Vec<FetchedHolding>> {
        let account = self.repository.get_by_id(account_id)?;
        let adapter = self.adapters.get(&account.platform)?;

        // A failed challenge propagates the adapter error and leaves the
        // stored status untouched; the user may simply retry the code.
        let holdings = adapter.submit_challenge(session_id, code).await?;

        info!(
            "Challenge accepted for account '{}', marking Connected",
            account.id
        );
        self.transition_status(&account, AccountStatus::Connected)
            .await?;
        Ok(holdings)
    }
}
