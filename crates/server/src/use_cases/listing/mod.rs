pub mod error;
pub mod public_inventory;

use std::sync::Arc;

pub use error::ListingError;
pub use public_inventory::{PharmacyListing, PublicInventoryListing};

pub struct ListingUseCases {
    pub public_inventory: Arc<PublicInventoryListing>,
}

impl ListingUseCases {
    pub fn new(public_inventory: Arc<PublicInventoryListing>) -> Self {
        Self { public_inventory }
    }
}
