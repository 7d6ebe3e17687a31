//! Mock adapter and registry behavior tests.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use super::mock_adapter::{MOCK_CHALLENGE_CODE, MOCK_SESSION_ID};
use super::{AdapterRegistry, FailureReason, MockAdapter, MockSeries, PlatformAdapter};
use crate::credentials::CredentialMap;

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn adapter() -> MockAdapter {
    MockAdapter::new(vec![
        MockSeries {
            symbol: "600000".to_string(),
            name: "Alpha".to_string(),
            records: vec![(d("2026-01-02"), 10.0), (d("2026-01-05"), 12.0)],
        },
        MockSeries {
            symbol: "000001".to_string(),
            name: "Beta".to_string(),
            records: vec![(d("2026-01-05"), 5.0)],
        },
    ])
}

fn credentials_on(date: &str) -> CredentialMap {
    let mut creds = CredentialMap::new();
    creds.insert("date".to_string(), json!(date));
    creds
}

#[tokio::test]
async fn prices_holdings_at_last_close_on_or_before_date() {
    let adapter = adapter();

    // Before Beta's first record: only Alpha is held, at its first close.
    let holdings = adapter
        .fetch_current(&credentials_on("2026-01-03"))
        .await
        .unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].symbol, "600000");
    assert_eq!(holdings[0].price, 10.0);
    assert_eq!(holdings[0].market_value, 100_000.0);

    // After both series begin, both are held and Alpha is repriced.
    let holdings = adapter
        .fetch_current(&credentials_on("2026-01-06"))
        .await
        .unwrap();
    assert_eq!(holdings.len(), 2);
    let alpha = holdings.iter().find(|h| h.symbol == "600000").unwrap();
    assert_eq!(alpha.price, 12.0);
    assert_eq!(alpha.cost_price, 10.0);
}

#[tokio::test]
async fn date_before_all_series_yields_no_holdings() {
    let holdings = adapter()
        .fetch_current(&credentials_on("2025-12-31"))
        .await
        .unwrap();
    assert!(holdings.is_empty());
}

#[tokio::test]
async fn history_covers_every_series_date() {
    let history = adapter().fetch_history(&CredentialMap::new()).await.unwrap();
    let dates: Vec<NaiveDate> = history.iter().map(|day| day.date).collect();
    assert_eq!(dates, vec![d("2026-01-02"), d("2026-01-05")]);
    assert_eq!(history[0].holdings.len(), 1);
    assert_eq!(history[1].holdings.len(), 2);
}

#[tokio::test]
async fn two_factor_user_is_challenged_until_verified() {
    let adapter = adapter();
    let mut creds = CredentialMap::new();
    creds.insert("username".to_string(), json!("2fa_user"));

    let err = adapter.fetch_current(&creds).await.unwrap_err();
    assert_eq!(err.reason, FailureReason::NeedsTwoFactor);
    let session = err
        .metadata
        .as_ref()
        .and_then(|m| m.get("sessionId"))
        .and_then(|v| v.as_str())
        .unwrap();

    let holdings = adapter
        .submit_challenge(session, MOCK_CHALLENGE_CODE)
        .await
        .unwrap();
    assert!(!holdings.is_empty());
}

#[tokio::test]
async fn wrong_challenge_code_is_rejected() {
    let err = adapter()
        .submit_challenge(MOCK_SESSION_ID, "999999")
        .await
        .unwrap_err();
    assert_eq!(err.reason, FailureReason::InvalidCredentials);
}

#[test]
fn registry_resolves_registered_platforms_only() {
    let registry = AdapterRegistry::from_adapters([Arc::new(adapter()) as _]);
    assert!(registry.get("MOCK").is_ok());
    assert!(registry.get("GHOST").is_err());
}

#[test]
fn failure_reasons_serialize_to_wire_names() {
    assert_eq!(
        serde_json::to_value(FailureReason::NeedsTwoFactor).unwrap(),
        json!("NEED_2FA")
    );
    assert_eq!(
        serde_json::to_value(FailureReason::InvalidCredentials).unwrap(),
        json!("INVALID_CREDENTIALS")
    );
    assert_eq!(
        serde_json::to_value(FailureReason::Other("RATE_LIMITED".to_string())).unwrap(),
        json!("RATE_LIMITED")
    );
}
