//! The platform adapter contract.
//!
//! An adapter wraps one brokerage platform's fetch logic. The engine never
//! sees platform specifics; it hands an adapter decoded credentials and gets
//! back holdings or a classified failure.

use async_trait::async_trait;

use super::adapter_model::{DailyHoldings, FetchError, FetchedHolding};
use crate::credentials::CredentialMap;

/// Pluggable integration returning holdings for one platform account.
///
/// `fetch_current` is mandatory; history and challenge submission are
/// optional capabilities that default to `NOT_SUPPORTED`.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Stable platform identifier used as the registry key (e.g. "IBKR").
    fn platform(&self) -> &str;

    /// Human-readable platform name.
    fn display_name(&self) -> &str;

    /// Fetches the account's current holdings.
    async fn fetch_current(
        &self,
        credentials: &CredentialMap,
    ) -> Result<Vec<FetchedHolding>, FetchError>;

    /// Whether `fetch_history` is implemented for this platform.
    fn supports_history(&self) -> bool {
        false
    }

    /// Fetches the account's full per-day holdings history.
    async fn fetch_history(
        &self,
        _credentials: &CredentialMap,
    ) -> Result<Vec<DailyHoldings>, FetchError> {
        Err(FetchError::not_supported())
    }

    /// Submits a verification code for a pending 2FA/captcha challenge.
    /// On success the adapter re-runs the equivalent of a fetch.
    async fn submit_challenge(
        &self,
        _session_id: &str,
        _code: &str,
    ) -> Result<Vec<FetchedHolding>, FetchError> {
        Err(FetchError::not_supported())
    }
}
