//! MEI Ledger
//!
//! Monthly DAS obligations and subscription billing reconciliation for
//! Brazilian micro-entrepreneurs.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::subscriptions;
pub use modules::taxes;
