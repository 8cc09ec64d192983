use actix_web::{web, HttpResponse};

use crate::core::{AppError, Result};
use crate::modules::subscriptions::services::SubscriptionReconciler;

/// List plans offered at checkout
/// GET /plans
pub async fn list_plans(reconciler: web::Data<SubscriptionReconciler>) -> HttpResponse {
    HttpResponse::Ok().json(reconciler.plans())
}

/// Active subscription of an account
/// GET /accounts/{account_id}/subscription
pub async fn get_active_subscription(
    reconciler: web::Data<SubscriptionReconciler>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let account_id = path.into_inner();

    let subscription = reconciler
        .active_subscription(&account_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("No active subscription for account '{}'", account_id))
        })?;

    Ok(HttpResponse::Ok().json(subscription))
}

/// Subscription history of an account, newest first
/// GET /accounts/{account_id}/subscriptions
pub async fn list_subscriptions(
    reconciler: web::Data<SubscriptionReconciler>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let history = reconciler.subscription_history(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(history))
}

/// Configure plan and subscription routes
pub fn configure_subscription_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/plans", web::get().to(list_plans)).service(
        web::scope("/accounts/{account_id}")
            .route("/subscription", web::get().to(get_active_subscription))
            .route("/subscriptions", web::get().to(list_subscriptions)),
    );
}
