use crate::core::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Purchasable subscription tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price: Money,
}

impl Plan {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// Plans sold at checkout, shipped with the binary
pub fn default_catalog() -> Vec<Plan> {
    vec![
        Plan::new("mensal", "Plano Mensal", Decimal::new(2990, 2)),
        Plan::new("semestral", "Plano Semestral", Decimal::new(14990, 2)),
        Plan::new("anual", "Plano Anual", Decimal::new(26990, 2)),
    ]
}
