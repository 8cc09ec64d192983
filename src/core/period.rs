use crate::core::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Earliest and latest years accepted for a tax period
pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 9998;

/// Calendar month a tax obligation refers to, serialized as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxPeriod {
    pub year: i32,
    pub month: u32,
}

impl TaxPeriod {
    /// Build a validated period
    ///
    /// # Errors
    /// * `InvalidInput` - month outside 1..=12 or year outside the supported range
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::invalid_input(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }

        // MAX_YEAR leaves room for the December rollover into year + 1
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(AppError::invalid_input(format!(
                "Year must be between {} and {}, got {}",
                MIN_YEAR, MAX_YEAR, year
            )));
        }

        Ok(Self { year, month })
    }

    /// The calendar month immediately after this one
    pub fn next(&self) -> TaxPeriod {
        if self.month == 12 {
            TaxPeriod {
                year: self.year + 1,
                month: 1,
            }
        } else {
            TaxPeriod {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// A given day inside this month
    pub fn day(&self, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or_else(|| {
            AppError::invalid_input(format!("Day {} does not exist in {}", day, self))
        })
    }
}

impl fmt::Display for TaxPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for TaxPeriod {
    type Err = AppError;

    /// Parses `YYYY-MM`
    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| AppError::invalid_input(format!("Invalid period '{}', expected YYYY-MM", s)))?;

        let year = year
            .parse::<i32>()
            .map_err(|_| AppError::invalid_input(format!("Invalid year in period '{}'", s)))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| AppError::invalid_input(format!("Invalid month in period '{}'", s)))?;

        TaxPeriod::new(year, month)
    }
}

impl TryFrom<String> for TaxPeriod {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TaxPeriod> for String {
    fn from(period: TaxPeriod) -> Self {
        period.to_string()
    }
}
