use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AppError, Result};

/// Monetary amount in Brazilian reais. Never a float.
pub type Money = Decimal;

/// Decimal places for BRL amounts (centavos)
pub const BRL_SCALE: u32 = 2;

/// Largest amount a `DECIMAL(15,2)` column holds: 9_999_999_999_999.99
pub const MAX_STORED_AMOUNT: Money = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// Rejects amounts that cannot be stored exactly in a `DECIMAL(15,2)` column
///
/// # Errors
/// * `InvalidInput` - more than two decimal places, or above `MAX_STORED_AMOUNT`
pub fn ensure_storable(field: &str, amount: Money) -> Result<()> {
    if amount.round_dp(BRL_SCALE) != amount {
        return Err(AppError::invalid_input(format!(
            "{} must have at most {} decimal places, got {}",
            field, BRL_SCALE, amount
        )));
    }

    if amount.abs() > MAX_STORED_AMOUNT {
        return Err(AppError::invalid_input(format!(
            "{} exceeds the maximum of {}, got {}",
            field, MAX_STORED_AMOUNT, amount
        )));
    }

    Ok(())
}

/// Rounds an amount to centavos, midpoint away from zero
pub fn round_centavos(amount: Money) -> Money {
    amount.round_dp_with_strategy(BRL_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount for display, e.g. `R$ 66.60`
pub fn format_brl(amount: Money) -> String {
    let mut rounded = round_centavos(amount);
    rounded.rescale(BRL_SCALE);
    format!("R$ {}", rounded)
}
