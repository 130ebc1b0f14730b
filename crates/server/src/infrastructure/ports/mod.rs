//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the server. Ports exist for:
//! - Database access (sqlx repositories behind traits)
//! - Outbound email (REST relay vs. log-only)
//! - The openFDA drug-label lookup
//! - Password hashing and the clock (for testing)

mod error;
mod repos;
mod services;
mod types;

pub use error::{DrugLookupError, MailError, PasswordError, RepoError};
pub use repos::{
    ActivityRepo, InventoryRepo, LocationRepo, MedicineRepo, PharmacyRepo, TokenRepo, UserRepo,
};
pub use services::{ClockPort, DrugInfo, DrugLabelPort, MailerPort, OutboundMail, PasswordHasherPort};
pub use types::{
    MedicineFilter, MedicineSort, MedicineSortField, Page, Paged, PharmacyFilter, StockCounts,
    StockedMedicine,
};

#[cfg(test)]
pub use repos::{
    MockActivityRepo, MockInventoryRepo, MockLocationRepo, MockMedicineRepo, MockPharmacyRepo,
    MockTokenRepo, MockUserRepo,
};
#[cfg(test)]
pub use services::{MockClockPort, MockDrugLabelPort, MockMailerPort, MockPasswordHasherPort};
