//! Pure profit derivation over a total-value series.

/// Derives `(day_profit, total_profit)` for every row of a date-ordered
/// total-value series.
///
/// The walk keeps the earliest total and the previous total: the first row
/// gets `(0, 0)` ("day zero" has no profit by definition); every later row
/// gets `day = total - prev` and `cumulative = total - first`. Deposits and
/// withdrawals are not modeled, so profit is purely the value delta.
///
/// The invariant this establishes: `total_profit[i]` equals the sum of
/// `day_profit[0..=i]`, regardless of how many generation/backfill writes
/// produced the series.
pub fn recalculate_profit_series(totals: &[f64]) -> Vec<(f64, f64)> {
    let mut profits = Vec::with_capacity(totals.len());
    let mut first_total = 0.0;
    let mut prev_total = 0.0;

    for (index, &total) in totals.iter().enumerate() {
        if index == 0 {
            first_total = total;
            prev_total = total;
            profits.push((0.0, 0.0));
            continue;
        }
        profits.push((total - prev_total, total - first_total));
        prev_total = total;
    }

    profits
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_series_yields_nothing() {
        assert!(recalculate_profit_series(&[]).is_empty());
    }

    #[test]
    fn single_row_has_zero_profit() {
        assert_eq!(recalculate_profit_series(&[1234.5]), vec![(0.0, 0.0)]);
    }

    #[test]
    fn three_day_scenario() {
        // Day 1: A=1000 + B=500. Day 2: A=1200 + B=500. Day 3: A=1200 + B=300.
        let profits = recalculate_profit_series(&[1500.0, 1700.0, 1500.0]);
        assert_eq!(profits, vec![(0.0, 0.0), (200.0, 200.0), (-200.0, 0.0)]);
    }

    #[test]
    fn losses_propagate_into_cumulative_profit() {
        let profits = recalculate_profit_series(&[1000.0, 900.0, 950.0]);
        assert_eq!(profits, vec![(0.0, 0.0), (-100.0, -100.0), (50.0, -50.0)]);
    }

    proptest! {
        /// total_profit[i] == sum(day_profit[0..=i]) for any series.
        #[test]
        fn cumulative_equals_running_day_sum(totals in prop::collection::vec(-1e9f64..1e9, 0..200)) {
            let profits = recalculate_profit_series(&totals);
            prop_assert_eq!(profits.len(), totals.len());

            let mut running = 0.0;
            for (index, (day, total)) in profits.iter().enumerate() {
                running += day;
                // Float sums drift; compare within a tolerance scaled to the
                // magnitude of the inputs.
                prop_assert!((running - total).abs() <= 1e-6 * (1.0 + total.abs()),
                    "row {}: running day sum {} != total profit {}", index, running, total);
            }
            if let Some((first_day, first_total)) = profits.first() {
                prop_assert_eq!(*first_day, 0.0);
                prop_assert_eq!(*first_total, 0.0);
            }
        }

        /// Derived profits depend only on the series values, so re-running the
        /// pass is idempotent.
        #[test]
        fn recalculation_is_idempotent(totals in prop::collection::vec(-1e9f64..1e9, 0..50)) {
            prop_assert_eq!(
                recalculate_profit_series(&totals),
                recalculate_profit_series(&totals)
            );
        }
    }
}
