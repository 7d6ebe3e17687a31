//! Business-date resolution.
//!
//! The ledger is keyed by calendar date in the user's configured time zone,
//! so all same-day refreshes for one user collapse into one row.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use log::warn;

/// Converts a UTC instant to a business date in the given zone name.
///
/// An unknown or missing zone falls back to the UTC calendar date rather than
/// failing; a user with a bad timezone setting still gets snapshots.
pub fn business_date_at(instant: DateTime<Utc>, timezone: Option<&str>) -> NaiveDate {
    match timezone {
        Some(name) => match name.parse::<Tz>() {
            Ok(tz) => instant.with_timezone(&tz).date_naive(),
            Err(_) => {
                warn!("Unknown timezone '{name}', falling back to UTC");
                instant.date_naive()
            }
        },
        None => instant.date_naive(),
    }
}

/// Today's business date for a user's configured time zone.
pub fn resolve_business_date(timezone: Option<&str>) -> NaiveDate {
    business_date_at(Utc::now(), timezone)
}
