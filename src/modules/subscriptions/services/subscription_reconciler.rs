use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::{AppError, Result};
use crate::modules::subscriptions::models::{
    Activation, CheckoutCompleted, PaymentEvent, PaymentEventKind, Plan, Subscription, WebhookAck,
};
use crate::modules::subscriptions::repositories::{AccountRepository, SubscriptionRepository};
use crate::modules::subscriptions::services::PlanCatalog;

/// What processing a payment event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// New active subscription; `replaced` holds the ids it deactivated
    Activated {
        subscription: Subscription,
        replaced: Vec<String>,
    },
    /// The checkout had already been reconciled
    AlreadyProcessed { subscription: Subscription },
    /// Event kind we do not act on
    Ignored { event_type: String },
}

impl ReconcileOutcome {
    /// The subscription created by (or for) the checkout, if any
    pub fn subscription(&self) -> Option<&Subscription> {
        match self {
            ReconcileOutcome::Activated { subscription, .. } => Some(subscription),
            ReconcileOutcome::AlreadyProcessed { subscription } => Some(subscription),
            ReconcileOutcome::Ignored { .. } => None,
        }
    }
}

/// Converges subscription state from payment confirmations
///
/// Deliveries are at-least-once. The checkout reference is the idempotency
/// key: one checkout creates at most one subscription row, and an account
/// never has more than one active row.
pub struct SubscriptionReconciler {
    accounts: Arc<dyn AccountRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: PlanCatalog,
}

impl SubscriptionReconciler {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        plans: PlanCatalog,
    ) -> Self {
        Self {
            accounts,
            subscriptions,
            plans,
        }
    }

    pub fn plans(&self) -> &[Plan] {
        self.plans.plans()
    }

    /// Activate `plan_id` for `account_id` as paid by `checkout_ref`
    ///
    /// Deactivates the account's current subscription and inserts the new
    /// one atomically. Re-delivery of a reconciled checkout returns the
    /// existing row without writing.
    ///
    /// # Errors
    /// * `InvalidInput` - empty checkout reference
    /// * `UnknownAccount` / `UnknownPlan` - unresolvable references
    /// * `StorageConflict` - concurrent write contention; safe to retry
    pub async fn confirm_payment(
        &self,
        account_id: &str,
        plan_id: &str,
        checkout_ref: &str,
    ) -> Result<ReconcileOutcome> {
        if checkout_ref.trim().is_empty() {
            return Err(AppError::invalid_input("Checkout reference cannot be empty"));
        }

        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::UnknownAccount(account_id.to_string()))?;

        if let Some(existing) = self.subscriptions.find_by_checkout_ref(checkout_ref).await? {
            info!(
                checkout_ref = checkout_ref,
                subscription_id = %existing.id,
                "Checkout already reconciled (idempotent delivery)"
            );
            return Ok(ReconcileOutcome::AlreadyProcessed {
                subscription: existing,
            });
        }

        let plan = self.plans.resolve(plan_id).await?;

        let candidate = Subscription::new(account.id.clone(), plan.id.clone(), checkout_ref.to_string());

        match self.subscriptions.activate(&candidate).await? {
            Activation::Created {
                subscription,
                replaced,
            } => {
                info!(
                    account_id = %account.id,
                    plan_id = %plan.id,
                    checkout_ref = checkout_ref,
                    subscription_id = %subscription.id,
                    replaced = ?replaced,
                    "Subscription activated"
                );
                Ok(ReconcileOutcome::Activated {
                    subscription,
                    replaced,
                })
            }
            Activation::AlreadyProcessed(existing) => {
                info!(
                    checkout_ref = checkout_ref,
                    subscription_id = %existing.id,
                    "Checkout reconciled by a concurrent delivery"
                );
                Ok(ReconcileOutcome::AlreadyProcessed {
                    subscription: existing,
                })
            }
        }
    }

    /// Dispatch a gateway event by type
    pub async fn handle_event(&self, event: &PaymentEvent) -> Result<ReconcileOutcome> {
        match event.kind() {
            PaymentEventKind::CheckoutCompleted => {
                let data: CheckoutCompleted = serde_json::from_value(event.data.clone())?;
                self.confirm_payment(&data.account_id, &data.plan_id, &data.checkout_ref)
                    .await
            }
            PaymentEventKind::Other(event_type) => {
                info!(
                    event_id = %event.id,
                    event_type = %event_type,
                    "Received unhandled payment event type, acknowledging"
                );
                Ok(ReconcileOutcome::Ignored { event_type })
            }
        }
    }

    /// Process a raw, already-authenticated delivery and acknowledge it
    ///
    /// Never fails: the gateway retries on anything but success, and
    /// processing is idempotent, so failures are logged and acknowledged.
    pub async fn acknowledge(&self, payload: &[u8]) -> WebhookAck {
        let event: PaymentEvent = match serde_json::from_slice(payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Malformed payment event payload, acknowledging");
                return WebhookAck::received();
            }
        };

        match self.handle_event(&event).await {
            Ok(outcome) => {
                if let Some(subscription) = outcome.subscription() {
                    info!(
                        event_id = %event.id,
                        subscription_id = %subscription.id,
                        "Payment event processed"
                    );
                }
            }
            Err(e) => {
                error!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Payment event processing failed"
                );
            }
        }

        WebhookAck::received()
    }

    /// Currently active subscription of an account
    pub async fn active_subscription(&self, account_id: &str) -> Result<Option<Subscription>> {
        self.subscriptions.find_active(account_id).await
    }

    /// Every subscription of an account, newest first
    pub async fn subscription_history(&self, account_id: &str) -> Result<Vec<Subscription>> {
        self.subscriptions.list_by_account(account_id).await
    }
}
