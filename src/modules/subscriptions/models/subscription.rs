use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Subscription of an account to a plan
///
/// At most one row per account is active. Replaced rows are deactivated and
/// kept as history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: String,
    pub account_id: String,
    pub plan_id: String,
    /// Gateway checkout that created this row (unique)
    pub checkout_ref: String,
    pub active: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// New active subscription starting now
    pub fn new(account_id: String, plan_id: String, checkout_ref: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            account_id,
            plan_id,
            checkout_ref,
            active: true,
            started_at: Utc::now(),
            ended_at: None,
        }
    }
}

/// Result of the atomic deactivate-then-insert step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// New row inserted; `replaced` lists the ids of rows that were deactivated
    Created {
        subscription: Subscription,
        replaced: Vec<String>,
    },
    /// The checkout was reconciled before; nothing written
    AlreadyProcessed(Subscription),
}
