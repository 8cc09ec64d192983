use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::money::{ensure_storable, format_brl};
use crate::core::{AppError, Money, Result, TaxPeriod};
use crate::modules::taxes::models::{TaxAssessment, TaxObligation};
use crate::modules::taxes::repositories::TaxObligationRepository;
use crate::modules::taxes::services::TaxCalculator;

/// Tax service for obligation lifecycle
///
/// Orchestrates recomputation, settlement and reversal of monthly DAS
/// obligations. Settled obligations are never recomputed.
pub struct TaxService {
    repository: Arc<dyn TaxObligationRepository>,
    calculator: TaxCalculator,
}

impl TaxService {
    /// Create a new TaxService
    ///
    /// # Arguments
    /// * `repository` - Obligation storage
    /// * `calculator` - Configured DAS calculator
    pub fn new(repository: Arc<dyn TaxObligationRepository>, calculator: TaxCalculator) -> Self {
        Self {
            repository,
            calculator,
        }
    }

    pub fn calculator(&self) -> &TaxCalculator {
        &self.calculator
    }

    /// Compute amount and due date without persisting anything
    pub fn preview(&self, period: TaxPeriod, gross_revenue: Money) -> Result<TaxAssessment> {
        ensure_storable("Gross revenue", gross_revenue)?;
        self.calculator.assess(period, gross_revenue)
    }

    /// Create or recompute the obligation for `(company_id, period)`
    ///
    /// # Behavior
    /// - No obligation yet: insert a new unpaid one
    /// - Unpaid obligation: overwrite revenue, amount and due date
    /// - Paid obligation: returned unchanged, nothing is written
    ///
    /// # Errors
    /// * `InvalidInput` - empty company id, invalid period, or revenue that is
    ///   negative or not storable with centavo precision
    /// * `StorageConflict` - lost a race with a concurrent writer; retry the call
    pub async fn upsert_obligation(
        &self,
        company_id: &str,
        period: TaxPeriod,
        gross_revenue: Money,
    ) -> Result<TaxObligation> {
        if company_id.trim().is_empty() {
            return Err(AppError::invalid_input("Company ID cannot be empty"));
        }

        ensure_storable("Gross revenue", gross_revenue)?;
        let assessment = self.calculator.assess(period, gross_revenue)?;

        let existing = match self.repository.find_by_period(company_id, period).await? {
            Some(existing) => existing,
            None => {
                let obligation =
                    TaxObligation::new(company_id.to_string(), period, gross_revenue, assessment);
                let created = self.repository.insert(&obligation).await?;

                info!(
                    obligation_id = %created.id,
                    company_id = company_id,
                    period = %period,
                    tax_amount = %format_brl(created.tax_amount),
                    "Tax obligation created"
                );
                return Ok(created);
            }
        };

        if existing.paid {
            info!(
                obligation_id = %existing.id,
                company_id = company_id,
                period = %period,
                "Tax obligation already paid, recompute skipped"
            );
            return Ok(existing);
        }

        if existing.matches(gross_revenue, &assessment) {
            return Ok(existing);
        }

        let updated = self
            .repository
            .update_assessment_if_unpaid(
                &existing.id,
                gross_revenue,
                assessment.tax_amount,
                assessment.due_date,
            )
            .await?;

        let current = self
            .repository
            .find_by_id(&existing.id)
            .await?
            .ok_or_else(|| {
                AppError::StorageConflict(format!(
                    "Tax obligation '{}' was removed during recompute",
                    existing.id
                ))
            })?;

        if updated {
            info!(
                obligation_id = %current.id,
                company_id = company_id,
                period = %period,
                previous_tax_amount = %format_brl(existing.tax_amount),
                tax_amount = %format_brl(current.tax_amount),
                "Tax obligation recomputed"
            );
            return Ok(current);
        }

        if current.paid {
            warn!(
                obligation_id = %current.id,
                company_id = company_id,
                period = %period,
                "Tax obligation was settled concurrently, recompute skipped"
            );
            return Ok(current);
        }

        if current.matches(gross_revenue, &assessment) {
            return Ok(current);
        }

        Err(AppError::StorageConflict(format!(
            "Tax obligation '{}' changed during recompute",
            current.id
        )))
    }

    /// Settle an obligation
    ///
    /// # Arguments
    /// * `obligation_id` - Obligation ID
    /// * `payment_date` - When it was paid; defaults to now
    ///
    /// # Errors
    /// * `NotFound` - no such obligation
    /// * `AlreadyPaid` - obligation is already settled; reverse it with `mark_pending` first
    pub async fn mark_paid(
        &self,
        obligation_id: &str,
        payment_date: Option<DateTime<Utc>>,
    ) -> Result<TaxObligation> {
        let paid_at = payment_date.unwrap_or_else(Utc::now);

        let changed = self
            .repository
            .mark_paid_if_unpaid(obligation_id, paid_at)
            .await?;

        let obligation = self.get_obligation(obligation_id).await?;

        if !changed {
            return Err(AppError::AlreadyPaid(obligation_id.to_string()));
        }

        info!(
            obligation_id = obligation_id,
            company_id = %obligation.company_id,
            period = %obligation.period,
            paid_at = %paid_at,
            "Tax obligation marked as paid"
        );

        Ok(obligation)
    }

    /// Move an obligation back to pending. No-op when already pending.
    ///
    /// # Errors
    /// * `NotFound` - no such obligation
    pub async fn mark_pending(&self, obligation_id: &str) -> Result<TaxObligation> {
        let before = self.get_obligation(obligation_id).await?;

        self.repository.set_pending(obligation_id).await?;

        if before.paid {
            info!(
                obligation_id = obligation_id,
                company_id = %before.company_id,
                period = %before.period,
                "Tax obligation reverted to pending"
            );
        }

        self.get_obligation(obligation_id).await
    }

    /// Get obligation by ID
    pub async fn get_obligation(&self, obligation_id: &str) -> Result<TaxObligation> {
        self.repository
            .find_by_id(obligation_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Tax obligation '{}' not found", obligation_id))
            })
    }

    /// List a company's obligations, newest period first
    pub async fn list_obligations(
        &self,
        company_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<TaxObligation>> {
        self.repository.list_by_company(company_id, year).await
    }
}
