// Property-based tests for the monthly DAS amount
//
// tax = max(round2(gross × rate), min_amount)

use mei_ledger::config::TaxConfig;
use mei_ledger::core::AppError;
use mei_ledger::taxes::services::TaxCalculator;
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Revenue in centavos up to R$ 10 million
fn revenue() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #[test]
    fn test_tax_never_below_floor(gross in revenue()) {
        let calculator = TaxCalculator::default();
        let tax = calculator.compute_tax(gross).unwrap();

        prop_assert!(tax >= calculator.min_amount(), "tax {} below floor for {}", tax, gross);
    }

    #[test]
    fn test_tax_is_proportional_above_floor(gross in revenue()) {
        let calculator = TaxCalculator::default();
        let tax = calculator.compute_tax(gross).unwrap();
        let proportional = (gross * calculator.rate())
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        if proportional > calculator.min_amount() {
            prop_assert_eq!(tax, proportional);
        } else {
            prop_assert_eq!(tax, calculator.min_amount());
        }
    }

    #[test]
    fn test_tax_is_monotonic(a in revenue(), b in revenue()) {
        let calculator = TaxCalculator::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        prop_assert!(calculator.compute_tax(low).unwrap() <= calculator.compute_tax(high).unwrap());
    }

    #[test]
    fn test_tax_is_deterministic(gross in revenue()) {
        let calculator = TaxCalculator::default();
        prop_assert_eq!(calculator.compute_tax(gross).unwrap(), calculator.compute_tax(gross).unwrap());
    }

    #[test]
    fn test_tax_has_centavo_precision(gross in revenue()) {
        let tax = TaxCalculator::default().compute_tax(gross).unwrap();
        prop_assert!(tax.round_dp(2) == tax, "tax {} has more than 2 decimal places", tax);
    }

    #[test]
    fn test_negative_revenue_always_rejected(cents in 1i64..1_000_000_000i64) {
        let result = TaxCalculator::default().compute_tax(Decimal::new(-cents, 2));
        prop_assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}

#[test]
fn test_documented_scenarios() {
    let calculator = TaxCalculator::default();

    // 1000 × 0.06 = 60 < 66.60
    assert_eq!(calculator.compute_tax(dec!(1000)).unwrap(), dec!(66.60));
    // 2000 × 0.06 = 120
    assert_eq!(calculator.compute_tax(dec!(2000)).unwrap(), dec!(120.00));
    // Exactly at the floor: 1110 × 0.06 = 66.60
    assert_eq!(calculator.compute_tax(dec!(1110)).unwrap(), dec!(66.60));
}

#[test]
fn test_configured_rate_and_floor() {
    let calculator = TaxCalculator::new(&TaxConfig {
        rate: dec!(0.05),
        min_amount: dec!(75.90),
        ..TaxConfig::default()
    });

    assert_eq!(calculator.compute_tax(dec!(1000)).unwrap(), dec!(75.90));
    assert_eq!(calculator.compute_tax(dec!(4000)).unwrap(), dec!(200.00));
}
