//! In-memory mock platform.
//!
//! Serves a configured per-symbol daily close series, simulating a brokerage
//! that can answer both current and historical holdings. Also models the 2FA
//! handshake: a configured username is refused with `NEED_2FA` plus a session
//! id until the matching code is submitted.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::json;

use super::adapter_model::{DailyHoldings, FailureReason, FetchError, FetchedHolding};
use super::adapter_traits::PlatformAdapter;
use crate::credentials::CredentialMap;

pub const MOCK_PLATFORM: &str = "MOCK";
pub const MOCK_SESSION_ID: &str = "mock-session-id";
pub const MOCK_CHALLENGE_CODE: &str = "123456";
const MOCK_2FA_USERNAME: &str = "2fa_user";
const MOCK_QUANTITY: f64 = 10_000.0;
const MOCK_CURRENCY: &str = "CNY";

/// One symbol's daily close series. Records must be date-ascending.
#[derive(Debug, Clone)]
pub struct MockSeries {
    pub symbol: String,
    pub name: String,
    pub records: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct MockAdapter {
    series: Vec<MockSeries>,
}

impl MockAdapter {
    pub fn new(mut series: Vec<MockSeries>) -> Self {
        for asset in &mut series {
            asset.records.sort_by_key(|(date, _)| *date);
        }
        Self { series }
    }

    fn requires_challenge(credentials: &CredentialMap) -> bool {
        credentials
            .get("username")
            .and_then(|v| v.as_str())
            .map(|u| u == MOCK_2FA_USERNAME)
            .unwrap_or(false)
            && !credentials
                .get("_2fa_verified")
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
    }

    /// Holdings as of `date`: each symbol held from its first record onward,
    /// priced at the last close on or before the date. The cost basis is the
    /// first available close.
    fn holdings_on(&self, date: NaiveDate) -> Vec<FetchedHolding> {
        self.series
            .iter()
            .filter_map(|asset| {
                let (first_date, first_close) = *asset.records.first()?;
                if date < first_date {
                    // Not held yet.
                    return None;
                }
                let price = asset
                    .records
                    .iter()
                    .rev()
                    .find(|(d, _)| *d <= date)
                    .map(|(_, close)| *close)?;
                Some(FetchedHolding {
                    symbol: asset.symbol.clone(),
                    name: Some(asset.name.clone()),
                    quantity: MOCK_QUANTITY,
                    price,
                    cost_price: first_close,
                    market_value: price * MOCK_QUANTITY,
                    day_profit: 0.0,
                    currency: MOCK_CURRENCY.to_string(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl PlatformAdapter for MockAdapter {
    fn platform(&self) -> &str {
        MOCK_PLATFORM
    }

    fn display_name(&self) -> &str {
        "Mock Broker"
    }

    async fn fetch_current(
        &self,
        credentials: &CredentialMap,
    ) -> Result<Vec<FetchedHolding>, FetchError> {
        if Self::requires_challenge(credentials) {
            return Err(FetchError::with_metadata(
                FailureReason::NeedsTwoFactor,
                json!({ "sessionId": MOCK_SESSION_ID }),
            ));
        }

        // An explicit date in the credentials overrides "today" so tests can
        // pin the series position.
        let target_date = credentials
            .get("date")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<NaiveDate>().ok())
            .unwrap_or_else(|| Utc::now().date_naive());

        Ok(self.holdings_on(target_date))
    }

    fn supports_history(&self) -> bool {
        true
    }

    async fn fetch_history(
        &self,
        credentials: &CredentialMap,
    ) -> Result<Vec<DailyHoldings>, FetchError> {
        if Self::requires_challenge(credentials) {
            return Err(FetchError::new(FailureReason::NeedsTwoFactor));
        }

        let mut dates: Vec<NaiveDate> = self
            .series
            .iter()
            .flat_map(|asset| asset.records.iter().map(|(date, _)| *date))
            .collect();
        dates.sort();
        dates.dedup();

        Ok(dates
            .into_iter()
            .filter_map(|date| {
                let holdings = self.holdings_on(date);
                if holdings.is_empty() {
                    None
                } else {
                    Some(DailyHoldings { date, holdings })
                }
            })
            .collect())
    }

    async fn submit_challenge(
        &self,
        session_id: &str,
        code: &str,
    ) -> Result<Vec<FetchedHolding>, FetchError> {
        if session_id == MOCK_SESSION_ID && code == MOCK_CHALLENGE_CODE {
            let mut credentials = CredentialMap::new();
            credentials.insert("username".to_string(), json!(MOCK_2FA_USERNAME));
            credentials.insert("_2fa_verified".to_string(), json!(true));
            return self.fetch_current(&credentials).await;
        }
        Err(FetchError::new(FailureReason::InvalidCredentials))
    }
}
