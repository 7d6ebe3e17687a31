//! Platform account domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::adapters::FailureReason;
use crate::errors::{Result, ValidationError};

/// Connection status of a platform account.
///
/// Driven exclusively by adapter result classification and the challenge
/// side channel; there is no explicit disable/reconnect operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    /// The account is assumed reachable until proven otherwise.
    #[default]
    Connected,
    /// The last fetch failed for a reason the user cannot fix directly.
    Error,
    /// The platform demands a 2FA code or captcha before it will talk to us.
    NeedVerify,
    /// The stored credentials were rejected.
    Unauthorized,
}

impl AccountStatus {
    /// Classifies an adapter failure reason into the status the account
    /// should transition to.
    pub fn from_failure(reason: &FailureReason) -> Self {
        match reason {
            FailureReason::NeedsTwoFactor | FailureReason::NeedsCaptcha => {
                AccountStatus::NeedVerify
            }
            FailureReason::InvalidCredentials => AccountStatus::Unauthorized,
            _ => AccountStatus::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Connected => "Connected",
            AccountStatus::Error => "Error",
            AccountStatus::NeedVerify => "NeedVerify",
            AccountStatus::Unauthorized => "Unauthorized",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Connected" => Ok(AccountStatus::Connected),
            "Error" => Ok(AccountStatus::Error),
            "NeedVerify" => Ok(AccountStatus::NeedVerify),
            "Unauthorized" => Ok(AccountStatus::Unauthorized),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown account status '{other}'"
            ))
            .into()),
        }
    }
}

/// One (user, platform, credential set) connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAccount {
    pub id: String,
    pub user_id: String,
    /// Adapter registry key (e.g. "IBKR", "XUEQIU").
    pub platform: String,
    pub name: String,
    /// At-rest encrypted credential blob; opaque to this crate except through
    /// the credential codec.
    pub credentials: Option<String>,
    pub status: AccountStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for connecting a new platform account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlatformAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub platform: String,
    pub name: String,
    pub credentials: Option<String>,
}

impl NewPlatformAccount {
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("userId".to_string()).into());
        }
        if self.platform.trim().is_empty() {
            return Err(ValidationError::MissingField("platform".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        Ok(())
    }
}
