use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::core::{AppError, Money, Result, TaxPeriod};
use crate::modules::taxes::models::TaxObligation;
use crate::modules::taxes::repositories::TaxObligationRepository;

/// Process-local obligation store with the same contract as the MySQL one
///
/// Backs service tests and local runs without a database.
#[derive(Default)]
pub struct InMemoryTaxObligationRepository {
    rows: Mutex<HashMap<String, TaxObligation>>,
}

impl InMemoryTaxObligationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl TaxObligationRepository for InMemoryTaxObligationRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<TaxObligation>> {
        Ok(self.rows.lock().await.get(id).cloned())
    }

    async fn find_by_period(
        &self,
        company_id: &str,
        period: TaxPeriod,
    ) -> Result<Option<TaxObligation>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .values()
            .find(|o| o.company_id == company_id && o.period == period)
            .cloned())
    }

    async fn list_by_company(
        &self,
        company_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<TaxObligation>> {
        let rows = self.rows.lock().await;
        let mut obligations: Vec<TaxObligation> = rows
            .values()
            .filter(|o| o.company_id == company_id)
            .filter(|o| year.map_or(true, |y| o.period.year == y))
            .cloned()
            .collect();

        obligations.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(obligations)
    }

    async fn insert(&self, obligation: &TaxObligation) -> Result<TaxObligation> {
        let mut rows = self.rows.lock().await;

        let duplicate = rows
            .values()
            .any(|o| o.company_id == obligation.company_id && o.period == obligation.period);
        if duplicate || rows.contains_key(&obligation.id) {
            return Err(AppError::StorageConflict(format!(
                "Tax obligation for company '{}' and period {} already exists",
                obligation.company_id, obligation.period
            )));
        }

        rows.insert(obligation.id.clone(), obligation.clone());
        Ok(obligation.clone())
    }

    async fn update_assessment_if_unpaid(
        &self,
        id: &str,
        gross_revenue: Money,
        tax_amount: Money,
        due_date: NaiveDate,
    ) -> Result<bool> {
        let mut rows = self.rows.lock().await;

        match rows.get_mut(id) {
            Some(obligation) if !obligation.paid => {
                obligation.gross_revenue = gross_revenue;
                obligation.tax_amount = tax_amount;
                obligation.due_date = due_date;
                obligation.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_paid_if_unpaid(&self, id: &str, paid_at: DateTime<Utc>) -> Result<bool> {
        let mut rows = self.rows.lock().await;

        match rows.get_mut(id) {
            Some(obligation) if !obligation.paid => {
                obligation.paid = true;
                obligation.paid_at = Some(paid_at);
                obligation.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_pending(&self, id: &str) -> Result<()> {
        let mut rows = self.rows.lock().await;

        if let Some(obligation) = rows.get_mut(id) {
            if obligation.paid {
                obligation.updated_at = Utc::now();
            }
            obligation.paid = false;
            obligation.paid_at = None;
        }

        Ok(())
    }
}
