pub mod memory;
pub mod tax_repository;

pub use memory::InMemoryTaxObligationRepository;
pub use tax_repository::{MySqlTaxObligationRepository, TaxObligationRepository};
