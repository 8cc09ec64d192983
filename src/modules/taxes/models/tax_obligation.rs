use crate::core::{AppError, Money, Result, TaxPeriod};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Derived figures for one month: what is owed and when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxAssessment {
    pub tax_amount: Money,
    pub due_date: NaiveDate,
}

/// Monthly DAS obligation of a company
///
/// Unique per `(company_id, period)`. Once `paid` is set the financial
/// fields are frozen until the obligation is moved back to pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxObligation {
    pub id: String,
    pub company_id: String,
    pub period: TaxPeriod,
    pub gross_revenue: Money,
    pub tax_amount: Money,
    pub due_date: NaiveDate,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaxObligation {
    /// Create a new, unpaid obligation from an assessment
    pub fn new(
        company_id: String,
        period: TaxPeriod,
        gross_revenue: Money,
        assessment: TaxAssessment,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            company_id,
            period,
            gross_revenue,
            tax_amount: assessment.tax_amount,
            due_date: assessment.due_date,
            paid: false,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the stored figures already match a recomputation
    pub fn matches(&self, gross_revenue: Money, assessment: &TaxAssessment) -> bool {
        self.gross_revenue == gross_revenue
            && self.tax_amount == assessment.tax_amount
            && self.due_date == assessment.due_date
    }
}

/// Flat `tax_obligations` row as stored in MySQL
#[derive(Debug, Clone, FromRow)]
pub struct TaxObligationRow {
    pub id: String,
    pub company_id: String,
    pub period_year: i32,
    pub period_month: u8,
    pub gross_revenue: Money,
    pub tax_amount: Money,
    pub due_date: NaiveDate,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TaxObligationRow> for TaxObligation {
    type Error = AppError;

    fn try_from(row: TaxObligationRow) -> Result<Self> {
        let period = TaxPeriod::new(row.period_year, u32::from(row.period_month)).map_err(|e| {
            AppError::internal(format!("Corrupt period on obligation '{}': {}", row.id, e))
        })?;

        Ok(Self {
            id: row.id,
            company_id: row.company_id,
            period,
            gross_revenue: row.gross_revenue,
            tax_amount: row.tax_amount,
            due_date: row.due_date,
            paid: row.paid,
            paid_at: row.paid_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
