use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A user of the system, as far as the snapshot engine cares: an id to key
/// the ledger by, a time zone for business-date resolution, and an active
/// flag for the scheduled run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    pub id: String,
    pub name: String,
    pub timezone: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}
