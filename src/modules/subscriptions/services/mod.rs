pub mod plan_catalog;
pub mod signature;
pub mod subscription_reconciler;

pub use plan_catalog::PlanCatalog;
pub use signature::SignatureVerifier;
pub use subscription_reconciler::{ReconcileOutcome, SubscriptionReconciler};
