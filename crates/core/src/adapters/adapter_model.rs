//! Wire models for the platform adapter contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One position as reported by a platform adapter.
///
/// `market_value` is trusted as reported; the engine never re-derives it from
/// `quantity * price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedHolding {
    pub symbol: String,
    pub name: Option<String>,
    pub quantity: f64,
    pub price: f64,
    pub cost_price: f64,
    pub market_value: f64,
    /// Per-position day profit as reported by the platform. Usually zero and
    /// never used in portfolio-level profit math.
    #[serde(default)]
    pub day_profit: f64,
    pub currency: String,
}

/// One day of an account's holdings history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHoldings {
    pub date: NaiveDate,
    pub holdings: Vec<FetchedHolding>,
}

/// Why an adapter call failed.
///
/// The string forms mirror the reasons platforms put on the wire
/// (`NEED_2FA`, `NEED_CAPTCHA`, ...), so they survive serialization to the UI
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    #[serde(rename = "NEED_2FA")]
    NeedsTwoFactor,
    #[serde(rename = "NEED_CAPTCHA")]
    NeedsCaptcha,
    #[serde(rename = "INVALID_CREDENTIALS")]
    InvalidCredentials,
    #[serde(rename = "PLATFORM_CHANGED")]
    PlatformChanged,
    #[serde(rename = "NOT_SUPPORTED")]
    NotSupported,
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::NeedsTwoFactor => write!(f, "NEED_2FA"),
            FailureReason::NeedsCaptcha => write!(f, "NEED_CAPTCHA"),
            FailureReason::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            FailureReason::PlatformChanged => write!(f, "PLATFORM_CHANGED"),
            FailureReason::NotSupported => write!(f, "NOT_SUPPORTED"),
            FailureReason::Other(reason) => write!(f, "{}", reason),
        }
    }
}

/// Adapter call failure: a classified reason plus optional metadata
/// (e.g. the session id a platform hands out with a 2FA challenge).
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct FetchError {
    pub reason: FailureReason,
    pub metadata: Option<Value>,
}

impl FetchError {
    pub fn new(reason: FailureReason) -> Self {
        Self {
            reason,
            metadata: None,
        }
    }

    pub fn with_metadata(reason: FailureReason, metadata: Value) -> Self {
        Self {
            reason,
            metadata: Some(metadata),
        }
    }

    pub fn not_supported() -> Self {
        Self::new(FailureReason::NotSupported)
    }

    pub fn other(reason: impl Into<String>) -> Self {
        Self::new(FailureReason::Other(reason.into()))
    }
}
