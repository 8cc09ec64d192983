pub mod subscription_controller;
pub mod webhook_controller;

pub use subscription_controller::configure_subscription_routes;
pub use webhook_controller::configure_webhook_routes;
