//! Application use cases, one struct per operation, wired with `Arc<dyn Port>`
//! dependencies so tests can swap in mocks.

pub mod auth;
pub mod catalog;
pub mod inventory;
pub mod listing;
pub mod pharmacy;

pub use auth::AuthUseCases;
pub use catalog::CatalogUseCases;
pub use inventory::InventoryUseCases;
pub use listing::ListingUseCases;
pub use pharmacy::PharmacyUseCases;
