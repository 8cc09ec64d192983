use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::subscriptions::models::{Activation, Subscription};

/// Persistence for subscriptions
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_by_checkout_ref(&self, checkout_ref: &str) -> Result<Option<Subscription>>;

    async fn find_active(&self, account_id: &str) -> Result<Option<Subscription>>;

    /// All subscriptions of an account, newest first
    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Subscription>>;

    /// Deactivate the account's active subscription and insert `subscription`,
    /// as one atomic unit
    ///
    /// When a row for `subscription.checkout_ref` already exists nothing is
    /// written and that row is returned as `AlreadyProcessed`.
    async fn activate(&self, subscription: &Subscription) -> Result<Activation>;
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, account_id, plan_id, checkout_ref, active, started_at, ended_at
    FROM subscriptions
"#;

pub struct MySqlSubscriptionRepository {
    pool: MySqlPool,
}

impl MySqlSubscriptionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for MySqlSubscriptionRepository {
    async fn find_by_checkout_ref(&self, checkout_ref: &str) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "{} WHERE checkout_ref = ?",
            SELECT_COLUMNS
        ))
        .bind(checkout_ref)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn find_active(&self, account_id: &str) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(&format!(
            "{} WHERE account_id = ? AND active = TRUE ORDER BY started_at DESC LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Subscription>> {
        let subscriptions = sqlx::query_as::<_, Subscription>(&format!(
            "{} WHERE account_id = ? ORDER BY started_at DESC",
            SELECT_COLUMNS
        ))
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    async fn activate(&self, subscription: &Subscription) -> Result<Activation> {
        let mut tx = self.pool.begin().await?;

        // Lock the account row so deliveries for one account run one at a time
        let locked: Option<(String,)> =
            sqlx::query_as("SELECT id FROM accounts WHERE id = ? FOR UPDATE")
                .bind(&subscription.account_id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(AppError::UnknownAccount(subscription.account_id.clone()));
        }

        let existing = sqlx::query_as::<_, Subscription>(&format!(
            "{} WHERE checkout_ref = ?",
            SELECT_COLUMNS
        ))
        .bind(&subscription.checkout_ref)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(existing) = existing {
            tx.rollback().await?;
            return Ok(Activation::AlreadyProcessed(existing));
        }

        let replaced: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM subscriptions WHERE account_id = ? AND active = TRUE FOR UPDATE",
        )
        .bind(&subscription.account_id)
        .fetch_all(&mut *tx)
        .await?;

        if !replaced.is_empty() {
            sqlx::query(
                r#"
                UPDATE subscriptions
                SET active = FALSE, ended_at = ?
                WHERE account_id = ? AND active = TRUE
                "#,
            )
            .bind(Utc::now())
            .bind(&subscription.account_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, account_id, plan_id, checkout_ref, active, started_at, ended_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&subscription.id)
        .bind(&subscription.account_id)
        .bind(&subscription.plan_id)
        .bind(&subscription.checkout_ref)
        .bind(subscription.active)
        .bind(subscription.started_at)
        .bind(subscription.ended_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Activation::Created {
            subscription: subscription.clone(),
            replaced,
        })
    }
}
