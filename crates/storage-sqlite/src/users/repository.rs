use std::sync::Arc;

use diesel::prelude::*;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::users;

use super::model::UserDB;
use foliosnap_core::errors::Result;
use foliosnap_core::users::{AppUser, UserRepositoryTrait};

/// Repository for user lookups.
///
/// The snapshot engine only reads users; `upsert` exists for provisioning
/// and test fixtures.
pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Inserts or replaces a user row.
    pub async fn upsert(&self, user: AppUser) -> Result<AppUser> {
        let user_db = UserDB::from(user);
        self.writer
            .exec(move |conn| {
                diesel::replace_into(users::table)
                    .values(&user_db)
                    .execute(conn)
                    .into_core()?;
                Ok(user_db.into())
            })
            .await
    }
}

impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<Option<AppUser>> {
        let mut conn = get_connection(&self.pool)?;

        let user = users::table
            .select(UserDB::as_select())
            .find(user_id)
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;

        Ok(user.map(AppUser::from))
    }

    fn list_active(&self) -> Result<Vec<AppUser>> {
        let mut conn = get_connection(&self.pool)?;

        let results = users::table
            .select(UserDB::as_select())
            .filter(users::is_active.eq(true))
            .order(users::id.asc())
            .load::<UserDB>(&mut conn)
            .into_core()?;

        Ok(results.into_iter().map(AppUser::from).collect())
    }
}
