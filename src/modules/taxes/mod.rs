pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{TaxAssessment, TaxObligation};
pub use repositories::{InMemoryTaxObligationRepository, MySqlTaxObligationRepository, TaxObligationRepository};
pub use services::{TaxCalculator, TaxService};
