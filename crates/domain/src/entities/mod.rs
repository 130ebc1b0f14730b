pub mod activity;
pub mod inventory;
pub mod location;
pub mod medicine;
pub mod pharmacy;
pub mod token;
pub mod user;

pub use activity::{ActivityAction, InventoryActivity};
pub use inventory::{format_price, parse_price, InventoryItem, LOW_STOCK_THRESHOLD};
pub use location::PharmacyLocation;
pub use medicine::{CatalogStatus, Medicine};
pub use pharmacy::{Pharmacy, PharmacyRegistration, PharmacyStatus};
pub use token::{SetupToken, TokenPurpose, RESET_TOKEN_TTL_HOURS, SETUP_TOKEN_TTL_HOURS};
pub use user::{Role, User};
