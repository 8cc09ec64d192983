pub mod error;
pub mod money;
pub mod period;
pub mod timezone;

pub use error::{AppError, Result};
pub use money::Money;
pub use period::TaxPeriod;
