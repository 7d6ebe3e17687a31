//! Backfill-engine and recalculation tests.

use super::snapshot_service_tests::{build_service, date, holding, TestHarness};
use crate::accounts::AccountStatus;
use crate::adapters::{AdapterRegistry, DailyHoldings};
use crate::snapshot::{SnapshotRepositoryTrait, SnapshotServiceTrait};

fn day(d: &str, values: &[(&str, f64)]) -> DailyHoldings {
    DailyHoldings {
        date: date(d),
        holdings: values
            .iter()
            .map(|(symbol, value)| holding(symbol, *value))
            .collect(),
    }
}

fn assert_profit_invariant(harness: &TestHarness, user_id: &str) {
    let snapshots = harness.snapshots.get_snapshots_by_user(user_id).unwrap();
    let mut running = 0.0;
    for (index, snapshot) in snapshots.iter().enumerate() {
        running += snapshot.day_profit;
        assert!(
            (snapshot.total_profit - running).abs() < 1e-9,
            "row {index}: total_profit {} != running day sum {running}",
            snapshot.total_profit
        );
    }
    if let Some(first) = snapshots.first() {
        assert_eq!(first.day_profit, 0.0);
        assert_eq!(first.total_profit, 0.0);
    }
}

#[tokio::test]
async fn backfill_sorts_unordered_history_and_recalculates() {
    let harness = build_service("u1", AdapterRegistry::new());

    // Deliberately unordered input.
    let history = vec![
        day("2026-01-03", &[("AAA", 1500.0)]),
        day("2026-01-01", &[("AAA", 1500.0)]),
        day("2026-01-02", &[("AAA", 1700.0)]),
    ];
    let report = harness
        .service
        .backfill_account("u1", "acc-a", history)
        .await
        .unwrap();
    assert_eq!(report.days_applied, 3);
    assert!(report.failed_dates.is_empty());

    let snapshots = harness.snapshots.get_snapshots_by_user("u1").unwrap();
    assert_eq!(snapshots.len(), 3);
    assert_eq!(snapshots[0].snapshot_date, date("2026-01-01"));
    assert_eq!(snapshots[1].day_profit, 200.0);
    assert_eq!(snapshots[1].total_profit, 200.0);
    assert_eq!(snapshots[2].day_profit, -200.0);
    assert_eq!(snapshots[2].total_profit, 0.0);
    assert_profit_invariant(&harness, "u1");
}

#[tokio::test]
async fn backfill_preserves_other_accounts_holdings() {
    let harness = build_service("u1", AdapterRegistry::new());

    // Account Y already has holdings on both days.
    harness
        .service
        .backfill_account(
            "u1",
            "acc-y",
            vec![day("2026-02-01", &[("YYY", 500.0)]), day("2026-02-02", &[("YYY", 500.0)])],
        )
        .await
        .unwrap();

    // Backfilling X must keep Y's holdings and add X's value to the totals.
    harness
        .service
        .backfill_account(
            "u1",
            "acc-x",
            vec![
                day("2026-02-01", &[("XXX", 1000.0)]),
                day("2026-02-02", &[("XXX", 1200.0)]),
            ],
        )
        .await
        .unwrap();

    let snapshots = harness.snapshots.get_snapshots_by_user("u1").unwrap();
    assert_eq!(snapshots[0].total_value, 1500.0);
    assert_eq!(snapshots[1].total_value, 1700.0);

    let day_one = harness.snapshots.holdings_of(&snapshots[0].id);
    assert!(day_one.iter().any(|h| h.account_id == "acc-y"));
    assert!(day_one.iter().any(|h| h.account_id == "acc-x"));
    assert_profit_invariant(&harness, "u1");
}

#[tokio::test]
async fn rebackfilling_same_account_replaces_only_its_holdings() {
    let harness = build_service("u1", AdapterRegistry::new());

    harness
        .service
        .backfill_account("u1", "acc-y", vec![day("2026-02-01", &[("YYY", 500.0)])])
        .await
        .unwrap();
    harness
        .service
        .backfill_account("u1", "acc-x", vec![day("2026-02-01", &[("XXX", 1000.0)])])
        .await
        .unwrap();
    // Corrected history for X on the same date.
    harness
        .service
        .backfill_account("u1", "acc-x", vec![day("2026-02-01", &[("XXX", 800.0)])])
        .await
        .unwrap();

    let snapshots = harness.snapshots.get_snapshots_by_user("u1").unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].total_value, 1300.0);

    let holdings = harness.snapshots.holdings_of(&snapshots[0].id);
    assert_eq!(holdings.len(), 2);
    let x_holding = holdings.iter().find(|h| h.account_id == "acc-x").unwrap();
    assert_eq!(x_holding.market_value, 800.0);
}

#[tokio::test]
async fn forty_five_days_in_batches_of_ten() {
    let harness = build_service("u1", AdapterRegistry::new());

    let start = date("2026-03-01");
    let history: Vec<DailyHoldings> = (0..45)
        .map(|offset| DailyHoldings {
            date: start + chrono::Days::new(offset),
            holdings: vec![holding("AAA", 1000.0 + offset as f64 * 10.0)],
        })
        .collect();

    let report = harness
        .service
        .backfill_account("u1", "acc-a", history)
        .await
        .unwrap();
    assert_eq!(report.days_applied, 45);

    let snapshots = harness.snapshots.get_snapshots_by_user("u1").unwrap();
    assert_eq!(snapshots.len(), 45);
    assert_profit_invariant(&harness, "u1");
    // Monotone series: every post-first day gains 10.
    assert!(snapshots.iter().skip(1).all(|s| s.day_profit == 10.0));
    assert_eq!(snapshots.last().unwrap().total_profit, 440.0);
}

#[tokio::test]
async fn failed_days_are_isolated_and_reported() {
    let harness = build_service("u1", AdapterRegistry::new());
    harness
        .snapshots
        .fail_dates
        .write()
        .unwrap()
        .push(date("2026-04-02"));

    let report = harness
        .service
        .backfill_account(
            "u1",
            "acc-a",
            vec![
                day("2026-04-01", &[("AAA", 100.0)]),
                day("2026-04-02", &[("AAA", 110.0)]),
                day("2026-04-03", &[("AAA", 120.0)]),
            ],
        )
        .await
        .unwrap();

    assert_eq!(report.days_applied, 2);
    assert_eq!(report.failed_dates, vec![date("2026-04-02")]);

    // The surviving rows still recalculated cleanly.
    let snapshots = harness.snapshots.get_snapshots_by_user("u1").unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_profit_invariant(&harness, "u1");
}

#[tokio::test]
async fn backfill_from_platform_uses_adapter_history() {
    use super::snapshot_service_tests::FixedAdapter;

    let mut registry = AdapterRegistry::new();
    registry.register(FixedAdapter::with_history(
        "PLAT_H",
        vec![
            day("2026-05-01", &[("HHH", 100.0)]),
            day("2026-05-02", &[("HHH", 150.0)]),
        ],
    ));

    let harness = build_service("u1", registry);
    harness
        .accounts
        .add_account("acc-h", "u1", "PLAT_H", AccountStatus::Connected);

    let report = harness
        .service
        .backfill_account_from_platform("acc-h")
        .await
        .unwrap();
    assert_eq!(report.days_applied, 2);

    let snapshots = harness.snapshots.get_snapshots_by_user("u1").unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[1].day_profit, 50.0);
}

#[tokio::test]
async fn backfill_from_platform_without_history_support_is_empty() {
    use super::snapshot_service_tests::FixedAdapter;

    let mut registry = AdapterRegistry::new();
    registry.register(FixedAdapter::ok("PLAT_A", vec![]));

    let harness = build_service("u1", registry);
    harness
        .accounts
        .add_account("acc-a", "u1", "PLAT_A", AccountStatus::Connected);

    let report = harness
        .service
        .backfill_account_from_platform("acc-a")
        .await
        .unwrap();
    assert_eq!(report.days_applied, 0);
    assert!(report.failed_dates.is_empty());
}
