pub mod tax_calculator;
pub mod tax_service;

pub use tax_calculator::TaxCalculator;
pub use tax_service::TaxService;
