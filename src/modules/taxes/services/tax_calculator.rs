use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::TaxConfig;
use crate::core::money::round_centavos;
use crate::core::{AppError, Money, Result, TaxPeriod};
use crate::modules::taxes::models::TaxAssessment;

/// TaxCalculator derives the monthly DAS amount and its due date
///
/// `tax_amount = max(gross_revenue × rate, min_amount)`, rounded to centavos.
/// The due date is a fixed day of the month following the period.
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    rate: Decimal,
    min_amount: Money,
    due_day: u32,
}

impl TaxCalculator {
    pub fn new(config: &TaxConfig) -> Self {
        Self {
            rate: config.rate,
            min_amount: round_centavos(config.min_amount),
            due_day: config.due_day,
        }
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn min_amount(&self) -> Money {
        self.min_amount
    }

    /// Compute the DAS owed for a month's gross revenue
    ///
    /// # Errors
    /// * `InvalidInput` - gross revenue is negative
    pub fn compute_tax(&self, gross_revenue: Money) -> Result<Money> {
        if gross_revenue < Decimal::ZERO {
            return Err(AppError::invalid_input(format!(
                "Gross revenue cannot be negative, got {}",
                gross_revenue
            )));
        }

        let proportional = round_centavos(gross_revenue * self.rate);

        Ok(proportional.max(self.min_amount))
    }

    /// Due date of the DAS for `period`: the configured day of the next month
    ///
    /// # Errors
    /// * `InvalidInput` - period is not a valid calendar month
    pub fn compute_due_date(&self, period: TaxPeriod) -> Result<NaiveDate> {
        // Fields are public, so re-check before rolling over
        let period = TaxPeriod::new(period.year, period.month)?;

        period.next().day(self.due_day)
    }

    /// Compute both the amount and due date for one month
    pub fn assess(&self, period: TaxPeriod, gross_revenue: Money) -> Result<TaxAssessment> {
        Ok(TaxAssessment {
            tax_amount: self.compute_tax(gross_revenue)?,
            due_date: self.compute_due_date(period)?,
        })
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new(&TaxConfig::default())
    }
}
