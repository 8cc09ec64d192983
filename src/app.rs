//! Service construction and route registration shared by `main` and tests

use actix_web::web;
use sqlx::MySqlPool;
use std::sync::Arc;

use crate::config::Config;
use crate::middleware::{json_error_handler, path_error_handler, query_error_handler};
use crate::modules::health::controllers::configure_health_routes;
use crate::modules::subscriptions::controllers::{
    configure_subscription_routes, configure_webhook_routes,
};
use crate::modules::subscriptions::repositories::{
    MySqlAccountRepository, MySqlPlanRepository, MySqlSubscriptionRepository,
};
use crate::modules::subscriptions::services::{
    PlanCatalog, SignatureVerifier, SubscriptionReconciler,
};
use crate::modules::taxes::controllers::configure_tax_routes;
use crate::modules::taxes::repositories::MySqlTaxObligationRepository;
use crate::modules::taxes::services::{TaxCalculator, TaxService};

/// Long-lived services shared by every worker
#[derive(Clone)]
pub struct AppServices {
    pub tax_service: web::Data<TaxService>,
    pub reconciler: web::Data<SubscriptionReconciler>,
    pub verifier: web::Data<SignatureVerifier>,
}

impl AppServices {
    pub fn new(
        tax_service: TaxService,
        reconciler: SubscriptionReconciler,
        verifier: SignatureVerifier,
    ) -> Self {
        Self {
            tax_service: web::Data::new(tax_service),
            reconciler: web::Data::new(reconciler),
            verifier: web::Data::new(verifier),
        }
    }

    /// Wire every service to MySQL repositories over one shared pool
    pub fn mysql(pool: &MySqlPool, config: &Config) -> Self {
        let tax_service = TaxService::new(
            Arc::new(MySqlTaxObligationRepository::new(pool.clone())),
            TaxCalculator::new(&config.tax),
        );

        let reconciler = SubscriptionReconciler::new(
            Arc::new(MySqlAccountRepository::new(pool.clone())),
            Arc::new(MySqlSubscriptionRepository::new(pool.clone())),
            PlanCatalog::with_default_catalog(Arc::new(MySqlPlanRepository::new(pool.clone()))),
        );

        let verifier = SignatureVerifier::new(&config.billing.webhook_secret);

        Self::new(tax_service, reconciler, verifier)
    }

    /// Register shared data and the `/api` routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(self.tax_service.clone())
            .app_data(self.reconciler.clone())
            .app_data(self.verifier.clone())
            .service(
                web::scope("/api")
                    .configure(configure_tax_routes)
                    .configure(configure_subscription_routes)
                    .configure(configure_webhook_routes),
            );
    }
}

/// Probes that need the database pool
pub fn configure_probes(cfg: &mut web::ServiceConfig, pool: &MySqlPool) {
    cfg.app_data(web::Data::new(pool.clone()))
        .configure(configure_health_routes);
}
