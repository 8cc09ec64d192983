pub mod account_repository;
pub mod memory;
pub mod plan_repository;
pub mod subscription_repository;

pub use account_repository::{AccountRepository, MySqlAccountRepository};
pub use memory::{InMemoryAccountRepository, InMemoryPlanRepository, InMemorySubscriptionRepository};
pub use plan_repository::{MySqlPlanRepository, PlanRepository};
pub use subscription_repository::{MySqlSubscriptionRepository, SubscriptionRepository};
