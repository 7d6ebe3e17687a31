//! Account status state machine and challenge-submission tests.

use std::sync::Arc;

use super::{
    AccountRepositoryTrait, AccountService, AccountServiceTrait, AccountStatus, NewPlatformAccount,
};
use crate::adapters::mock_adapter::{MOCK_CHALLENGE_CODE, MOCK_SESSION_ID};
use crate::adapters::{AdapterRegistry, FailureReason, MockAdapter, MockSeries};
use crate::snapshot::snapshot_service_tests::MockAccountRepository;

fn mock_registry() -> AdapterRegistry {
    let series = vec![MockSeries {
        symbol: "600000".to_string(),
        name: "Test Asset".to_string(),
        records: vec![
            ("2026-01-02".parse().unwrap(), 10.0),
            ("2026-01-03".parse().unwrap(), 12.0),
        ],
    }];
    AdapterRegistry::from_adapters([Arc::new(MockAdapter::new(series)) as _])
}

fn service_with_account(status: AccountStatus) -> (Arc<MockAccountRepository>, AccountService) {
    let repository = Arc::new(MockAccountRepository::default());
    repository.add_account("acc-1", "u1", "MOCK", status);
    let service = AccountService::new(repository.clone(), mock_registry());
    (repository, service)
}

#[test]
fn failure_reasons_classify_to_expected_statuses() {
    let cases = [
        (FailureReason::NeedsTwoFactor, AccountStatus::NeedVerify),
        (FailureReason::NeedsCaptcha, AccountStatus::NeedVerify),
        (FailureReason::InvalidCredentials, AccountStatus::Unauthorized),
        (FailureReason::PlatformChanged, AccountStatus::Error),
        (FailureReason::NotSupported, AccountStatus::Error),
        (
            FailureReason::Other("connection reset".to_string()),
            AccountStatus::Error,
        ),
    ];
    for (reason, expected) in cases {
        assert_eq!(AccountStatus::from_failure(&reason), expected, "{reason}");
    }
}

#[test]
fn status_text_round_trips() {
    for status in [
        AccountStatus::Connected,
        AccountStatus::Error,
        AccountStatus::NeedVerify,
        AccountStatus::Unauthorized,
    ] {
        assert_eq!(status.as_str().parse::<AccountStatus>().unwrap(), status);
    }
    assert!("Disabled".parse::<AccountStatus>().is_err());
}

#[tokio::test]
async fn transition_skips_write_when_status_unchanged() {
    let (repository, service) = service_with_account(AccountStatus::Connected);
    let account = service.get_account("acc-1").unwrap();
    let before = repository.get_by_id("acc-1").unwrap().updated_at;

    service
        .transition_status(&account, AccountStatus::Connected)
        .await
        .unwrap();
    assert_eq!(repository.get_by_id("acc-1").unwrap().updated_at, before);

    service
        .transition_status(&account, AccountStatus::Error)
        .await
        .unwrap();
    assert_eq!(repository.status_of("acc-1"), AccountStatus::Error);
}

#[tokio::test]
async fn successful_challenge_connects_the_account() {
    let (repository, service) = service_with_account(AccountStatus::NeedVerify);

    let holdings = service
        .submit_challenge("acc-1", MOCK_SESSION_ID, MOCK_CHALLENGE_CODE)
        .await
        .unwrap();
    assert!(!holdings.is_empty());
    assert_eq!(repository.status_of("acc-1"), AccountStatus::Connected);
}

#[tokio::test]
async fn failed_challenge_leaves_status_unchanged() {
    let (repository, service) = service_with_account(AccountStatus::NeedVerify);

    let result = service
        .submit_challenge("acc-1", MOCK_SESSION_ID, "000000")
        .await;
    assert!(result.is_err());
    assert_eq!(repository.status_of("acc-1"), AccountStatus::NeedVerify);
}

#[tokio::test]
async fn create_account_rejects_unknown_platform() {
    let repository = Arc::new(MockAccountRepository::default());
    let service = AccountService::new(repository, mock_registry());

    let result = service
        .create_account(NewPlatformAccount {
            id: None,
            user_id: "u1".to_string(),
            platform: "GHOST".to_string(),
            name: "nope".to_string(),
            credentials: None,
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn create_account_starts_connected() {
    let repository = Arc::new(MockAccountRepository::default());
    let service = AccountService::new(repository, mock_registry());

    let account = service
        .create_account(NewPlatformAccount {
            id: None,
            user_id: "u1".to_string(),
            platform: "MOCK".to_string(),
            name: "my broker".to_string(),
            credentials: None,
        })
        .await
        .unwrap();
    assert_eq!(account.status, AccountStatus::Connected);
}
