use crate::core::{AppError, Money, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Default DAS rate applied to gross revenue
pub const DEFAULT_RATE: &str = "0.06";

/// Default minimum DAS amount in reais
pub const DEFAULT_MIN_AMOUNT: &str = "66.60";

/// Default day of the following month on which the DAS falls due
pub const DEFAULT_DUE_DAY: u32 = 20;

/// Tax engine parameters
#[derive(Debug, Clone, Deserialize)]
pub struct TaxConfig {
    pub rate: Decimal,
    pub min_amount: Money,
    pub due_day: u32,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            rate: Decimal::new(6, 2),
            min_amount: Decimal::new(6660, 2),
            due_day: DEFAULT_DUE_DAY,
        }
    }
}

impl TaxConfig {
    pub fn from_env() -> Result<Self> {
        let rate = Decimal::from_str(
            &env::var("TAX_RATE").unwrap_or_else(|_| DEFAULT_RATE.to_string()),
        )
        .map_err(|_| AppError::Configuration("Invalid TAX_RATE".to_string()))?;

        let min_amount = Decimal::from_str(
            &env::var("TAX_MIN_AMOUNT").unwrap_or_else(|_| DEFAULT_MIN_AMOUNT.to_string()),
        )
        .map_err(|_| AppError::Configuration("Invalid TAX_MIN_AMOUNT".to_string()))?;

        let due_day = env::var("TAX_DUE_DAY")
            .unwrap_or_else(|_| DEFAULT_DUE_DAY.to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid TAX_DUE_DAY".to_string()))?;

        Ok(Self {
            rate,
            min_amount,
            due_day,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.rate < Decimal::ZERO || self.rate > Decimal::ONE {
            return Err(AppError::Configuration(
                "TAX_RATE must be between 0 and 1".to_string(),
            ));
        }

        if self.min_amount < Decimal::ZERO {
            return Err(AppError::Configuration(
                "TAX_MIN_AMOUNT cannot be negative".to_string(),
            ));
        }

        // Every month has a day 28
        if !(1..=28).contains(&self.due_day) {
            return Err(AppError::Configuration(
                "TAX_DUE_DAY must be between 1 and 28".to_string(),
            ));
        }

        Ok(())
    }
}
