use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::platform_accounts;

use super::model::PlatformAccountDB;
use foliosnap_core::accounts::{
    AccountRepositoryTrait, AccountStatus, NewPlatformAccount, PlatformAccount,
};
use foliosnap_core::errors::Result;

/// Repository for managing platform account data in the database
pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    /// Creates a new AccountRepository instance
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewPlatformAccount) -> Result<PlatformAccount> {
        new_account.validate()?;

        let mut account_db: PlatformAccountDB = new_account.into();
        if account_db.id.is_empty() {
            account_db.id = uuid::Uuid::new_v4().to_string();
        }

        self.writer
            .exec(move |conn| {
                diesel::insert_into(platform_accounts::table)
                    .values(&account_db)
                    .execute(conn)
                    .into_core()?;

                account_db.try_into()
            })
            .await
    }

    /// Retrieves an account by its ID
    fn get_by_id(&self, account_id: &str) -> Result<PlatformAccount> {
        let mut conn = get_connection(&self.pool)?;

        let account = platform_accounts::table
            .select(PlatformAccountDB::as_select())
            .find(account_id)
            .first::<PlatformAccountDB>(&mut conn)
            .into_core()?;

        account.try_into()
    }

    /// Lists a user's accounts, ordered by creation time.
    fn list_by_user(&self, user_id: &str) -> Result<Vec<PlatformAccount>> {
        let mut conn = get_connection(&self.pool)?;

        let results = platform_accounts::table
            .select(PlatformAccountDB::as_select())
            .filter(platform_accounts::user_id.eq(user_id))
            .order((
                platform_accounts::created_at.asc(),
                platform_accounts::id.asc(),
            ))
            .load::<PlatformAccountDB>(&mut conn)
            .into_core()?;

        results.into_iter().map(PlatformAccount::try_from).collect()
    }

    async fn update_status(&self, account_id: &str, status: AccountStatus) -> Result<()> {
        let id_owned = account_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(platform_accounts::table.find(&id_owned))
                    .set((
                        platform_accounts::status.eq(status.as_str()),
                        platform_accounts::updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}
