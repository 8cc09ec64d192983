pub mod tax_obligation;

pub use tax_obligation::{TaxAssessment, TaxObligation, TaxObligationRow};
