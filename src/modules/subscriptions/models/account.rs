use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Paying account. Managed elsewhere; only looked up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
}
