// Property-based tests for DAS due dates
//
// Due on day 20 of the month following the period; December rolls into
// January of the next year.

use chrono::{Datelike, NaiveDate};
use mei_ledger::core::TaxPeriod;
use mei_ledger::taxes::services::TaxCalculator;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_due_date_is_day_20_of_next_month(year in 2000i32..2200i32, month in 1u32..=11u32) {
        let calculator = TaxCalculator::default();
        let period = TaxPeriod::new(year, month).unwrap();

        let due = calculator.compute_due_date(period).unwrap();

        prop_assert_eq!(due, NaiveDate::from_ymd_opt(year, month + 1, 20).unwrap());
    }

    #[test]
    fn test_december_rolls_to_january(year in 2000i32..2200i32) {
        let calculator = TaxCalculator::default();
        let period = TaxPeriod::new(year, 12).unwrap();

        let due = calculator.compute_due_date(period).unwrap();

        prop_assert_eq!(due, NaiveDate::from_ymd_opt(year + 1, 1, 20).unwrap());
    }

    #[test]
    fn test_due_date_always_after_period(year in 2000i32..2200i32, month in 1u32..=12u32) {
        let calculator = TaxCalculator::default();
        let period = TaxPeriod::new(year, month).unwrap();
        let last_day_of_period = period.next().day(1).unwrap().pred_opt().unwrap();

        let due = calculator.compute_due_date(period).unwrap();

        prop_assert!(due > last_day_of_period);
        prop_assert_eq!(due.day(), 20);
    }

    #[test]
    fn test_invalid_month_rejected(year in 2000i32..2200i32, month in 13u32..100u32) {
        prop_assert!(TaxPeriod::new(year, month).is_err());
    }
}

#[test]
fn test_documented_scenario() {
    let calculator = TaxCalculator::default();
    let period = TaxPeriod::new(2024, 12).unwrap();

    assert_eq!(
        calculator.compute_due_date(period).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
    );
}
