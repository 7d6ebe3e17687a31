//! Database model for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use foliosnap_core::users::AppUser;

/// Database model for users
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub name: String,
    pub timezone: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<UserDB> for AppUser {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            timezone: db.timezone,
            is_active: db.is_active,
            created_at: db.created_at,
        }
    }
}

impl From<AppUser> for UserDB {
    fn from(domain: AppUser) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            timezone: domain.timezone,
            is_active: domain.is_active,
            created_at: domain.created_at,
        }
    }
}
