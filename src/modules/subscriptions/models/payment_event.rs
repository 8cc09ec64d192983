use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event type sent when a checkout has been paid
pub const CHECKOUT_COMPLETED: &str = "checkout.completed";

/// Envelope of an event delivered by the payment gateway
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

impl PaymentEvent {
    pub fn kind(&self) -> PaymentEventKind {
        PaymentEventKind::from(self.event_type.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEventKind {
    CheckoutCompleted,
    /// Anything we do not handle (yet); acknowledged without action
    Other(String),
}

impl From<&str> for PaymentEventKind {
    fn from(value: &str) -> Self {
        match value {
            CHECKOUT_COMPLETED => PaymentEventKind::CheckoutCompleted,
            other => PaymentEventKind::Other(other.to_string()),
        }
    }
}

/// `data` of a `checkout.completed` event
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutCompleted {
    pub checkout_ref: String,
    pub account_id: String,
    pub plan_id: String,
}

/// Body returned to the gateway for every correctly signed delivery
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}
