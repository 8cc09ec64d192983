// Integration tests for the DAS obligation lifecycle
//
// Drives TaxService over the in-memory repository through create,
// recompute, settle, reverse and concurrent access.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use mei_ledger::config::TaxConfig;
use mei_ledger::core::{AppError, TaxPeriod};
use mei_ledger::taxes::repositories::InMemoryTaxObligationRepository;
use mei_ledger::taxes::services::{TaxCalculator, TaxService};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn setup() -> (Arc<TaxService>, Arc<InMemoryTaxObligationRepository>) {
    let repository = Arc::new(InMemoryTaxObligationRepository::new());
    let service = TaxService::new(
        repository.clone(),
        TaxCalculator::new(&TaxConfig::default()),
    );
    (Arc::new(service), repository)
}

fn period(year: i32, month: u32) -> TaxPeriod {
    TaxPeriod::new(year, month).unwrap()
}

#[tokio::test]
async fn test_full_lifecycle_create_pay_revert_recompute() {
    let (service, repository) = setup();

    // Collector reports low revenue: floor applies
    let created = service
        .upsert_obligation("company-1", period(2024, 12), dec!(1000))
        .await
        .unwrap();
    assert_eq!(created.tax_amount, dec!(66.60));
    assert_eq!(created.due_date, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());

    // Corrected revenue before payment is recomputed in place
    let recomputed = service
        .upsert_obligation("company-1", period(2024, 12), dec!(2000))
        .await
        .unwrap();
    assert_eq!(recomputed.id, created.id);
    assert_eq!(recomputed.tax_amount, dec!(120.00));

    let paid_at = Utc.with_ymd_and_hms(2025, 1, 15, 3, 0, 0).unwrap();
    let paid = service
        .mark_paid(&created.id, Some(paid_at))
        .await
        .unwrap();
    assert!(paid.paid);
    assert_eq!(paid.paid_at, Some(paid_at));

    // Late revenue change after payment does not touch the settled figures
    let protected = service
        .upsert_obligation("company-1", period(2024, 12), dec!(9000))
        .await
        .unwrap();
    assert!(protected.paid);
    assert_eq!(protected.gross_revenue, dec!(2000));
    assert_eq!(protected.tax_amount, dec!(120.00));

    let pending = service.mark_pending(&created.id).await.unwrap();
    assert!(!pending.paid);
    assert!(pending.paid_at.is_none());

    // Once pending again, recompute applies
    let reopened = service
        .upsert_obligation("company-1", period(2024, 12), dec!(9000))
        .await
        .unwrap();
    assert_eq!(reopened.id, created.id);
    assert_eq!(reopened.tax_amount, dec!(540.00));

    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn test_double_payment_is_rejected_without_changing_paid_at() {
    let (service, _) = setup();
    let obligation = service
        .upsert_obligation("company-1", period(2024, 5), dec!(1500))
        .await
        .unwrap();

    let first_paid_at = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
    service
        .mark_paid(&obligation.id, Some(first_paid_at))
        .await
        .unwrap();

    let err = service
        .mark_paid(&obligation.id, Some(Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyPaid(_)));

    let stored = service.get_obligation(&obligation.id).await.unwrap();
    assert_eq!(stored.paid_at, Some(first_paid_at));
}

#[tokio::test]
async fn test_unknown_obligation_is_not_found() {
    let (service, _) = setup();

    assert!(matches!(
        service.mark_paid("missing", None).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        service.mark_pending("missing").await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        service.get_obligation("missing").await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_invalid_input_writes_nothing() {
    let (service, repository) = setup();

    let err = service
        .upsert_obligation("company-1", period(2024, 5), dec!(-0.01))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = service
        .upsert_obligation("  ", period(2024, 5), dec!(100))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    // Not representable in DECIMAL(15,2)
    for gross_revenue in [dec!(1000.005), dec!(10000000000000)] {
        let err = service
            .upsert_obligation("company-1", period(2024, 5), gross_revenue)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "revenue: {}", gross_revenue);
    }

    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_companies_and_periods_are_isolated() {
    let (service, _) = setup();

    for month in 1..=3 {
        service
            .upsert_obligation("company-1", period(2024, month), dec!(2000))
            .await
            .unwrap();
    }
    service
        .upsert_obligation("company-1", period(2023, 12), dec!(2000))
        .await
        .unwrap();
    service
        .upsert_obligation("company-2", period(2024, 1), dec!(5000))
        .await
        .unwrap();

    let all = service.list_obligations("company-1", None).await.unwrap();
    assert_eq!(all.len(), 4);
    // Newest period first
    assert_eq!(all[0].period, period(2024, 3));
    assert_eq!(all[3].period, period(2023, 12));

    let only_2024 = service
        .list_obligations("company-1", Some(2024))
        .await
        .unwrap();
    assert_eq!(only_2024.len(), 3);

    let other = service.list_obligations("company-2", None).await.unwrap();
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].tax_amount, dec!(300.00));
}

#[tokio::test]
async fn test_concurrent_upserts_keep_one_row_per_period() {
    let (service, repository) = setup();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                let gross_revenue = dec!(1000) * Decimal::from(i + 1);
                service
                    .upsert_obligation("company-1", period(2024, 8), gross_revenue)
                    .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(obligation) => ids.push(obligation.id),
            Err(e) => assert!(e.is_retryable(), "unexpected error: {}", e),
        }
    }

    assert!(!ids.is_empty());
    assert!(ids.iter().all(|id| id == &ids[0]));
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn test_concurrent_payments_settle_exactly_once() {
    let (service, _) = setup();
    let obligation = service
        .upsert_obligation("company-1", period(2024, 9), dec!(2000))
        .await
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            let id = obligation.id.clone();
            tokio::spawn(async move { service.mark_paid(&id, None).await })
        })
        .collect();

    let mut settled = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => settled += 1,
            Err(AppError::AlreadyPaid(_)) => rejected += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(settled, 1);
    assert_eq!(rejected, 7);
}
