pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Account, PaymentEvent, Plan, Subscription};
pub use repositories::{AccountRepository, PlanRepository, SubscriptionRepository};
pub use services::{PlanCatalog, ReconcileOutcome, SignatureVerifier, SubscriptionReconciler};
