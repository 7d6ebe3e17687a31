//! Database model for platform accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use foliosnap_core::accounts::{NewPlatformAccount, PlatformAccount};
use foliosnap_core::errors::Error;

/// Database model for platform accounts
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Serialize,
    Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::platform_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlatformAccountDB {
    pub id: String,
    pub user_id: String,
    pub platform: String,
    pub name: String,
    pub credentials: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations

impl TryFrom<PlatformAccountDB> for PlatformAccount {
    type Error = Error;

    fn try_from(db: PlatformAccountDB) -> Result<Self, Error> {
        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            platform: db.platform,
            name: db.name,
            credentials: db.credentials,
            status: db.status.parse()?,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<PlatformAccount> for PlatformAccountDB {
    fn from(domain: PlatformAccount) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            platform: domain.platform,
            name: domain.name,
            credentials: domain.credentials,
            status: domain.status.as_str().to_string(),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

impl From<NewPlatformAccount> for PlatformAccountDB {
    fn from(domain: NewPlatformAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_default(),
            user_id: domain.user_id,
            platform: domain.platform,
            name: domain.name,
            credentials: domain.credentials,
            status: foliosnap_core::accounts::AccountStatus::default()
                .as_str()
                .to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
