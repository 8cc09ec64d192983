pub mod account;
pub mod payment_event;
pub mod plan;
pub mod subscription;

pub use account::Account;
pub use payment_event::{CheckoutCompleted, PaymentEvent, PaymentEventKind, WebhookAck};
pub use plan::{default_catalog, Plan};
pub use subscription::{Activation, Subscription};
