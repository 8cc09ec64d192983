//! Process-local stores with the same contracts as the MySQL repositories.
//! Back service tests and local runs without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::core::{AppError, Result};
use crate::modules::subscriptions::models::{Account, Activation, Plan, Subscription};
use crate::modules::subscriptions::repositories::{
    AccountRepository, PlanRepository, SubscriptionRepository,
};

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, account: Account) {
        self.accounts
            .lock()
            .await
            .insert(account.id.clone(), account);
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.accounts.lock().await.get(id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryPlanRepository {
    plans: Mutex<HashMap<String, Plan>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.plans.lock().await.contains_key(id)
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Plan>> {
        Ok(self.plans.lock().await.get(id).cloned())
    }

    async fn insert(&self, plan: &Plan) -> Result<Plan> {
        let mut plans = self.plans.lock().await;
        if plans.contains_key(&plan.id) {
            return Err(AppError::StorageConflict(format!(
                "Plan '{}' already exists",
                plan.id
            )));
        }
        plans.insert(plan.id.clone(), plan.clone());
        Ok(plan.clone())
    }
}

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    rows: Mutex<Vec<Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored row, in insertion order
    pub async fn all(&self) -> Vec<Subscription> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_by_checkout_ref(&self, checkout_ref: &str) -> Result<Option<Subscription>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|s| s.checkout_ref == checkout_ref).cloned())
    }

    async fn find_active(&self, account_id: &str) -> Result<Option<Subscription>> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .find(|s| s.account_id == account_id && s.active)
            .cloned())
    }

    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Subscription>> {
        let rows = self.rows.lock().await;
        // Insertion order is chronological, so reverse for newest first
        Ok(rows
            .iter()
            .rev()
            .filter(|s| s.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn activate(&self, subscription: &Subscription) -> Result<Activation> {
        // One lock for the whole check-deactivate-insert sequence
        let mut rows = self.rows.lock().await;

        if let Some(existing) = rows
            .iter()
            .find(|s| s.checkout_ref == subscription.checkout_ref)
        {
            return Ok(Activation::AlreadyProcessed(existing.clone()));
        }

        let now = Utc::now();
        let mut replaced = Vec::new();
        for row in rows
            .iter_mut()
            .filter(|s| s.account_id == subscription.account_id && s.active)
        {
            row.active = false;
            row.ended_at = Some(now);
            replaced.push(row.id.clone());
        }

        rows.push(subscription.clone());

        Ok(Activation::Created {
            subscription: subscription.clone(),
            replaced,
        })
    }
}
