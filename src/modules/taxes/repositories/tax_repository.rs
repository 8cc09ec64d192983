use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;

use crate::core::{AppError, Money, Result, TaxPeriod};
use crate::modules::taxes::models::{TaxObligation, TaxObligationRow};

/// Persistence for tax obligations
///
/// Writes that depend on the `paid` flag are compare-and-swap operations so a
/// recompute can never overwrite an obligation settled concurrently.
#[async_trait]
pub trait TaxObligationRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<TaxObligation>>;

    async fn find_by_period(
        &self,
        company_id: &str,
        period: TaxPeriod,
    ) -> Result<Option<TaxObligation>>;

    /// Obligations of a company, newest period first
    async fn list_by_company(
        &self,
        company_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<TaxObligation>>;

    /// Insert a new obligation
    ///
    /// # Errors
    /// * `StorageConflict` - an obligation already exists for the same company and period
    async fn insert(&self, obligation: &TaxObligation) -> Result<TaxObligation>;

    /// Overwrite the financial fields while the obligation is unpaid
    ///
    /// Returns `false` when no unpaid row was changed.
    async fn update_assessment_if_unpaid(
        &self,
        id: &str,
        gross_revenue: Money,
        tax_amount: Money,
        due_date: NaiveDate,
    ) -> Result<bool>;

    /// Set `paid` if it is currently unset. Returns `false` when no row changed.
    async fn mark_paid_if_unpaid(&self, id: &str, paid_at: DateTime<Utc>) -> Result<bool>;

    /// Clear `paid` and `paid_at` unconditionally
    async fn set_pending(&self, id: &str) -> Result<()>;
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, company_id, period_year, period_month, gross_revenue,
        tax_amount, due_date, paid, paid_at, created_at, updated_at
    FROM tax_obligations
"#;

pub struct MySqlTaxObligationRepository {
    pool: MySqlPool,
}

impl MySqlTaxObligationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaxObligationRepository for MySqlTaxObligationRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<TaxObligation>> {
        let row = sqlx::query_as::<_, TaxObligationRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TaxObligation::try_from).transpose()
    }

    async fn find_by_period(
        &self,
        company_id: &str,
        period: TaxPeriod,
    ) -> Result<Option<TaxObligation>> {
        let row = sqlx::query_as::<_, TaxObligationRow>(&format!(
            "{} WHERE company_id = ? AND period_year = ? AND period_month = ?",
            SELECT_COLUMNS
        ))
        .bind(company_id)
        .bind(period.year)
        .bind(period.month)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TaxObligation::try_from).transpose()
    }

    async fn list_by_company(
        &self,
        company_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<TaxObligation>> {
        let rows = sqlx::query_as::<_, TaxObligationRow>(&format!(
            r#"{}
            WHERE company_id = ? AND (? IS NULL OR period_year = ?)
            ORDER BY period_year DESC, period_month DESC"#,
            SELECT_COLUMNS
        ))
        .bind(company_id)
        .bind(year)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TaxObligation::try_from).collect()
    }

    async fn insert(&self, obligation: &TaxObligation) -> Result<TaxObligation> {
        sqlx::query(
            r#"
            INSERT INTO tax_obligations (
                id, company_id, period_year, period_month, gross_revenue,
                tax_amount, due_date, paid, paid_at, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&obligation.id)
        .bind(&obligation.company_id)
        .bind(obligation.period.year)
        .bind(obligation.period.month)
        .bind(obligation.gross_revenue)
        .bind(obligation.tax_amount)
        .bind(obligation.due_date)
        .bind(obligation.paid)
        .bind(obligation.paid_at)
        .bind(obligation.created_at)
        .bind(obligation.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&obligation.id).await?.ok_or_else(|| {
            AppError::internal("Tax obligation was created but not found")
        })
    }

    async fn update_assessment_if_unpaid(
        &self,
        id: &str,
        gross_revenue: Money,
        tax_amount: Money,
        due_date: NaiveDate,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tax_obligations
            SET gross_revenue = ?, tax_amount = ?, due_date = ?
            WHERE id = ? AND paid = FALSE
            "#,
        )
        .bind(gross_revenue)
        .bind(tax_amount)
        .bind(due_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_paid_if_unpaid(&self, id: &str, paid_at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tax_obligations
            SET paid = TRUE, paid_at = ?
            WHERE id = ? AND paid = FALSE
            "#,
        )
        .bind(paid_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_pending(&self, id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE tax_obligations
            SET paid = FALSE, paid_at = NULL
            WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
