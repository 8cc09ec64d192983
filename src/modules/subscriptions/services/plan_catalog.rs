use std::sync::Arc;
use tracing::warn;

use crate::core::{AppError, Result};
use crate::modules::subscriptions::models::{default_catalog, Plan};
use crate::modules::subscriptions::repositories::PlanRepository;

/// Resolves plan ids against storage, falling back to the static catalog
///
/// A plan sold at checkout but missing from the `plans` table is inserted on
/// first use. This papers over drift between the catalog and the database, so
/// every fallback is logged at `warn`.
pub struct PlanCatalog {
    repository: Arc<dyn PlanRepository>,
    catalog: Vec<Plan>,
}

impl PlanCatalog {
    pub fn new(repository: Arc<dyn PlanRepository>, catalog: Vec<Plan>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    pub fn with_default_catalog(repository: Arc<dyn PlanRepository>) -> Self {
        Self::new(repository, default_catalog())
    }

    /// Plans offered for sale
    pub fn plans(&self) -> &[Plan] {
        &self.catalog
    }

    /// Resolve a plan id
    ///
    /// # Errors
    /// * `UnknownPlan` - neither storage nor the catalog knows the id
    pub async fn resolve(&self, plan_id: &str) -> Result<Plan> {
        if let Some(plan) = self.repository.find_by_id(plan_id).await? {
            return Ok(plan);
        }

        let plan = self
            .catalog
            .iter()
            .find(|p| p.id == plan_id)
            .cloned()
            .ok_or_else(|| AppError::UnknownPlan(plan_id.to_string()))?;

        warn!(
            plan_id = plan_id,
            plan_name = %plan.name,
            "Plan missing from storage, materializing from static catalog"
        );

        match self.repository.insert(&plan).await {
            Ok(stored) => Ok(stored),
            // Another delivery materialized it first
            Err(AppError::StorageConflict(_)) => self
                .repository
                .find_by_id(plan_id)
                .await?
                .ok_or_else(|| AppError::UnknownPlan(plan_id.to_string())),
            Err(e) => Err(e),
        }
    }
}
