use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::subscriptions::models::Plan;

/// Persisted plans
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Plan>>;

    /// Insert a plan
    ///
    /// # Errors
    /// * `StorageConflict` - a plan with the same id already exists
    async fn insert(&self, plan: &Plan) -> Result<Plan>;
}

pub struct MySqlPlanRepository {
    pool: MySqlPool,
}

impl MySqlPlanRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for MySqlPlanRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Plan>> {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            SELECT id, name, price
            FROM plans
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    async fn insert(&self, plan: &Plan) -> Result<Plan> {
        sqlx::query(
            r#"
            INSERT INTO plans (id, name, price)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.name)
        .bind(plan.price)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&plan.id)
            .await?
            .ok_or_else(|| AppError::internal("Plan was created but not found"))
    }
}
